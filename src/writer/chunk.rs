//! Serialize a complete chunk: header, metadata section, event section.

use crate::writer::byte_sink::{length_i32, ByteSink};
use crate::writer::encoder::EncodedEvent;
use crate::writer::registry::SchemaRegistry;
use crate::{Result, HEADER_SIZE, MAGIC, VERSION_1};
use std::io::Write;

// size (i32) + type id (i64)
const EVENT_RECORD_OVERHEAD: usize = 12;

pub(crate) struct ChunkWriter<'a> {
    pub registry: &'a SchemaRegistry,
    pub events: &'a [EncodedEvent],
    pub start_time_millis: i64,
}

impl<'a> ChunkWriter<'a> {
    /// Builds the whole chunk in memory, since the header records the
    /// offsets of the sections that follow it.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let metadata = self.metadata_section()?;
        let events = self.event_section()?;

        let metadata_offset = HEADER_SIZE;
        let events_offset = metadata_offset + metadata.len() as i64;
        let chunk_size = events_offset + events.len() as i64;

        let mut sink = ByteSink::new(Vec::with_capacity(chunk_size as usize));
        sink.write_bytes(&MAGIC)?;
        sink.write_i16(VERSION_1.major)?;
        sink.write_i16(VERSION_1.minor)?;
        sink.write_i64(chunk_size)?;
        sink.write_i64(metadata_offset)?;
        sink.write_i64(events_offset)?;
        sink.write_i64(self.start_time_millis)?;
        sink.write_bytes(&metadata)?;
        sink.write_bytes(&events)?;

        Ok(sink.into_inner())
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<usize> {
        let bytes = self.to_bytes()?;
        out.write_all(&bytes)?;
        Ok(bytes.len())
    }

    fn metadata_section(&self) -> Result<Vec<u8>> {
        let mut sink = ByteSink::new(Vec::new());
        sink.write_i32(length_i32(self.registry.len(), "event type count")?)?;
        for schema in self.registry.schemas() {
            sink.write_i64(schema.id())?;
            sink.write_string(schema.type_name())?;
            sink.write_i32(length_i32(schema.fields().len(), "field count")?)?;
            for field in schema.fields() {
                sink.write_string(&field.name)?;
                sink.write_i8(field.kind.tag())?;
            }
        }
        Ok(sink.into_inner())
    }

    fn event_section(&self) -> Result<Vec<u8>> {
        let mut sink = ByteSink::new(Vec::new());
        for event in self.events {
            let size = EVENT_RECORD_OVERHEAD.saturating_add(event.payload.len());
            sink.write_i32(length_i32(size, "event record")?)?;
            sink.write_i64(event.type_id())?;
            sink.write_bytes(&event.payload)?;
        }
        Ok(sink.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDescriptor, FieldKind};
    use crate::value::FieldValues;
    use crate::writer::encoder::encode;

    #[test]
    fn test_empty_chunk() {
        let registry = SchemaRegistry::default();
        let bytes = ChunkWriter {
            registry: &registry,
            events: &[],
            start_time_millis: 42,
        }
        .to_bytes()
        .unwrap();

        // header + schema count
        assert_eq!(HEADER_SIZE as usize + 4, bytes.len());
        assert_eq!(&MAGIC, &bytes[0..4]);
        assert_eq!(&(bytes.len() as i64).to_be_bytes(), &bytes[8..16]);
        assert_eq!(&HEADER_SIZE.to_be_bytes(), &bytes[16..24]);
        assert_eq!(&(HEADER_SIZE + 4).to_be_bytes(), &bytes[24..32]);
        assert_eq!(&42i64.to_be_bytes(), &bytes[32..40]);
        assert_eq!(&[0, 0, 0, 0], &bytes[40..44]);
    }

    #[test]
    fn test_event_record_layout() {
        let mut registry = SchemaRegistry::default();
        registry.register("demo.Empty", vec![]).unwrap();
        let counter = registry
            .register(
                "demo.Counter",
                vec![FieldDescriptor::new("count", FieldKind::Long)],
            )
            .unwrap();
        let event = encode(&counter, FieldValues::new().put("count", 7i64)).unwrap();

        let chunk = ChunkWriter {
            registry: &registry,
            events: &[event],
            start_time_millis: 0,
        };
        let bytes = chunk.to_bytes().unwrap();
        let record = &bytes[bytes.len() - 20..];

        assert_eq!(&20i32.to_be_bytes(), &record[0..4]);
        assert_eq!(&1i64.to_be_bytes(), &record[4..12]);
        assert_eq!(&7i64.to_be_bytes(), &record[12..20]);
    }
}
