//! Write recordings.
//!
//! An [`EventLog`] buffers everything until it is closed, because the
//! metadata section has to precede the events and is only complete once every
//! event type is known.

use crate::schema::{EventSchema, FieldDescriptor};
use crate::value::FieldValues;
use crate::{Error, Result};
use chrono::Utc;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace, warn};

mod byte_sink;
mod chunk;
pub mod encoder;
pub mod registry;

pub use encoder::{encode, EncodedEvent};
pub use registry::SchemaRegistry;

use chunk::ChunkWriter;

enum State<W> {
    Open(W),
    Closed,
}

pub struct EventLog<W: Write> {
    state: State<W>,
    registry: SchemaRegistry,
    events: Vec<EncodedEvent>,
    start_time_millis: i64,
}

impl EventLog<BufWriter<File>> {
    /// Creates or truncates the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!(path = %path.display(), "Opened event log");
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> EventLog<W> {
    pub fn new(sink: W) -> Self {
        Self {
            state: State::Open(sink),
            registry: SchemaRegistry::default(),
            events: Vec::new(),
            start_time_millis: Utc::now().timestamp_millis(),
        }
    }

    pub fn register(
        &mut self,
        type_name: &str,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Arc<EventSchema>> {
        self.ensure_open()?;
        let schema = self.registry.register(type_name, fields)?;
        debug!(type_name, id = schema.id(), "Registered event type");
        Ok(schema)
    }

    pub fn lookup(&self, type_name: &str) -> Option<Arc<EventSchema>> {
        self.registry.lookup(type_name)
    }

    pub fn write(&mut self, event: EncodedEvent) -> Result<()> {
        self.ensure_open()?;
        if !self.registry.contains(event.schema()) {
            return Err(Error::UnknownSchema(
                event.schema().type_name().to_string(),
            ));
        }
        trace!(
            type_name = event.schema().type_name(),
            size = event.payload().len(),
            "Buffered event"
        );
        self.events.push(event);
        Ok(())
    }

    pub fn write_event(&mut self, schema: &Arc<EventSchema>, values: FieldValues) -> Result<()> {
        self.ensure_open()?;
        let event = encode(schema, values)?;
        self.write(event)
    }

    /// Writes the chunk and releases the sink. Closing a closed log does
    /// nothing.
    ///
    /// If writing fails the log is still closed, and the output is left
    /// partially written.
    pub fn close(&mut self) -> Result<()> {
        let mut sink = match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(sink) => sink,
            State::Closed => return Ok(()),
        };

        let size = ChunkWriter {
            registry: &self.registry,
            events: &self.events,
            start_time_millis: self.start_time_millis,
        }
        .write_to(&mut sink)?;
        sink.flush()?;

        debug!(
            types = self.registry.len(),
            events = self.events.len(),
            size,
            "Closed event log"
        );
        self.events.clear();
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Number of events buffered so far.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            State::Open(_) => Ok(()),
            State::Closed => Err(Error::LogClosed),
        }
    }
}

impl<W: Write> Drop for EventLog<W> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "Failed to close event log on drop");
        }
    }
}
