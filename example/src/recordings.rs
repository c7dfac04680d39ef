//! Fixture recordings simulating a JMC process being observed.

use chrono::{DateTime, Duration, Utc};
use recgen::schema::{EventSchema, FieldDescriptor, FieldKind};
use recgen::value::FieldValues;
use recgen::writer::EventLog;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub type Recording = EventLog<BufWriter<File>>;

const JVM_NAME: &str = "Java HotSpot(TM) 64-Bit Server VM";
const JVM_VERSION: &str = "Java HotSpot(TM) 64-Bit Server VM (17.0.9+11-LTS-201) for windows-amd64 JRE (17.0.9+11-LTS-201), built on Oct 10 2023 23:16:06 by \"mach5one\" with MS VC++ 17.1 (VS2022)";
const JVM_ARGUMENTS: &str = "-XX:+UseG1GC -XX:+FlightRecorder -XX:StartFlightRecording=name=JMC_Default,maxsize=100m -Djava.net.preferIPv4Stack=true -Djdk.attach.allowAttachSelf=true --add-exports=java.xml/com.sun.org.apache.xerces.internal.parsers=ALL-UNNAMED --add-exports=jdk.internal.jvmstat/sun.jvmstat.monitor=ALL-UNNAMED --add-exports=java.management/sun.management=ALL-UNNAMED --add-exports=jdk.management.agent/jdk.internal.agent=ALL-UNNAMED --add-exports=jdk.attach/sun.tools.attach=ALL-UNNAMED --add-exports=java.desktop/sun.awt.windows=ALL-UNNAMED --add-opens=java.base/java.net=ALL-UNNAMED -Dorg.eclipse.swt.internal.carbon.smallFonts -Declipse.pde.launch=true --add-modules=ALL-SYSTEM -Djava.security.manager=allow -Dfile.encoding=UTF-8 -Dstdout.encoding=UTF-8 -Dstderr.encoding=UTF-8 -XX:+ShowCodeDetailsInExceptionMessages";
const JAVA_ARGUMENTS: &str = "org.eclipse.equinox.launcher.Main -launcher C:\\Users\\Marcus\\workspaces\\2023-12\\jmc_fork\\.metadata\\.plugins\\org.eclipse.pde.core\\.bundle_pool\\eclipse.exe -name Eclipse -showsplash 600 -product org.openjdk.jmc.rcp.application.product -data C:\\Users\\Marcus\\workspaces\\2023-12\\jmc_fork/../jmc_rcp -configuration file:C:/Users/Marcus/workspaces/2023-12/jmc_fork/.metadata/.plugins/org.eclipse.pde.core/JMC-RCP/ -dev file:C:/Users/Marcus/workspaces/2023-12/jmc_fork/.metadata/.plugins/org.eclipse.pde.core/JMC-RCP/dev.properties -os win32 -ws win32 -arch x86_64 -nl en_US -consoleLog";

/// Generates one named recording into a directory.
pub trait RecordingGenerator {
    fn generate_recording(&self, dir: &Path, name: &str) -> recgen::Result<()>;
}

/// Opens a recording holding a `jdk.JVMInformation` event for `pid` and one
/// unrelated `jdk.SystemProcess` event.
pub fn create_default_recording(dir: &Path, name: &str, pid: i64) -> recgen::Result<Recording> {
    let now = Utc::now();

    let mut recording = EventLog::open(dir.join(name))?;
    let jvm_information = register_jvm_information(&mut recording)?;
    recording.write_event(
        &jvm_information,
        FieldValues::new()
            .put("startTime", now)
            .put("jvmName", JVM_NAME)
            .put("jvmVersion", JVM_VERSION)
            .put("jvmArguments", JVM_ARGUMENTS)
            .put("jvmFlags", "")
            .put("javaArguments", JAVA_ARGUMENTS)
            .put("jvmStartTime", now)
            .put("pid", pid),
    )?;

    let system_process = register_system_process(&mut recording)?;
    write_system_process_event(
        &mut recording,
        &system_process,
        "My System Process",
        now - Duration::seconds(34),
        4711,
    )?;
    Ok(recording)
}

fn register_jvm_information(recording: &mut Recording) -> recgen::Result<Arc<EventSchema>> {
    recording.register(
        "jdk.JVMInformation",
        vec![
            FieldDescriptor::new("startTime", FieldKind::Instant),
            FieldDescriptor::new("jvmName", FieldKind::String),
            FieldDescriptor::new("jvmVersion", FieldKind::String),
            FieldDescriptor::new("jvmArguments", FieldKind::String),
            FieldDescriptor::new("jvmFlags", FieldKind::String),
            FieldDescriptor::new("javaArguments", FieldKind::String),
            FieldDescriptor::new("jvmStartTime", FieldKind::Instant),
            FieldDescriptor::new("pid", FieldKind::Long),
        ],
    )
}

/// Returns the existing type if it was registered before.
pub fn register_system_process(recording: &mut Recording) -> recgen::Result<Arc<EventSchema>> {
    recording.register(
        "jdk.SystemProcess",
        vec![
            FieldDescriptor::new("startTime", FieldKind::Instant),
            FieldDescriptor::new("commandLine", FieldKind::String),
            FieldDescriptor::new("pid", FieldKind::Long),
        ],
    )
}

pub fn write_system_process_event(
    recording: &mut Recording,
    schema: &Arc<EventSchema>,
    command_line: &str,
    start_time: DateTime<Utc>,
    pid: i64,
) -> recgen::Result<()> {
    recording.write_event(
        schema,
        FieldValues::new()
            .put("startTime", start_time)
            .put("commandLine", command_line)
            .put("pid", pid),
    )
}

/// Recording with a process whose pid does not fit in 16 bits.
pub struct LargePidRecording;

impl RecordingGenerator for LargePidRecording {
    fn generate_recording(&self, dir: &Path, name: &str) -> recgen::Result<()> {
        let mut recording = create_default_recording(dir, name, 32434212)?;
        let system_process = register_system_process(&mut recording)?;
        let start_time = Utc::now() - Duration::seconds(493);
        write_system_process_event(
            &mut recording,
            &system_process,
            "Very long command line for the process running JMC...",
            start_time,
            32434212,
        )?;
        write_system_process_event(
            &mut recording,
            &system_process,
            "Large PID Process",
            start_time,
            32434213,
        )?;
        recording.close()?;
        info!(name, "Generated recording");
        Ok(())
    }
}

/// Recording with a process running as pid 1.
pub struct Pid1Recording;

impl RecordingGenerator for Pid1Recording {
    fn generate_recording(&self, dir: &Path, name: &str) -> recgen::Result<()> {
        let mut recording = create_default_recording(dir, name, 1)?;
        let system_process = register_system_process(&mut recording)?;
        write_system_process_event(
            &mut recording,
            &system_process,
            "Process with PID 1",
            Utc::now() - Duration::seconds(5),
            1,
        )?;
        recording.close()?;
        info!(name, "Generated recording");
        Ok(())
    }
}
