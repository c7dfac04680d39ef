use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

mod recordings;

use recordings::{LargePidRecording, Pid1Recording, RecordingGenerator};

/// Generates the fixture recordings into a directory.
#[derive(Parser)]
struct Args {
    /// Destination folder for the generated recordings.
    destination: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // clap exits with status 2 on a usage error
    let args = Args::parse();
    if let Some(code) = check_destination(&args.destination, &mut io::stdout()) {
        process::exit(code);
    }

    let generators: [(&dyn RecordingGenerator, &str); 2] = [
        (&LargePidRecording, "largepid.jfr"),
        (&Pid1Recording, "pid1.jfr"),
    ];
    for (generator, name) in generators {
        generator.generate_recording(&args.destination, name)?;
    }
    Ok(())
}

/// Returns the exit code to stop with if `destination` is not a directory.
fn check_destination(destination: &Path, out: &mut impl Write) -> Option<i32> {
    if destination.is_dir() {
        return None;
    }
    // best effort, the exit code carries the failure
    let _ = writeln!(out, "The provided argument must be an existing folder.\nExiting...");
    Some(3)
}
