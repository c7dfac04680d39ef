//! Write and read small self-describing event recordings.
//!
//! A recording is a single chunk: a fixed header, a metadata section declaring
//! every event type and its fields, and the events themselves.
//!
//! ```no_run
//! use recgen::schema::{FieldDescriptor, FieldKind};
//! use recgen::value::FieldValues;
//! use recgen::writer::EventLog;
//!
//! # fn main() -> recgen::Result<()> {
//! let mut log = EventLog::open("process.rec")?;
//! let process = log.register(
//!     "demo.Process",
//!     vec![
//!         FieldDescriptor::new("commandLine", FieldKind::String),
//!         FieldDescriptor::new("startTime", FieldKind::Long),
//!     ],
//! )?;
//! log.write_event(
//!     &process,
//!     FieldValues::new().put("commandLine", "init").put("startTime", 1000i64),
//! )?;
//! log.close()
//! # }
//! ```

pub mod error;
pub mod reader;
pub mod schema;
pub mod value;
pub mod writer;

pub use error::{Error, Result};

const MAGIC: [u8; 4] = [b'R', b'C', b'G', b'\0'];
const VERSION_1: Version = Version { major: 1, minor: 0 };

/// Size of the fixed chunk header in bytes.
const HEADER_SIZE: i64 = 40;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Version {
    pub major: i16,
    pub minor: i16,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
