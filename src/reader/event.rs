use crate::reader::byte_stream::ByteStream;
use crate::reader::Chunk;
use crate::schema::{EventSchema, FieldDescriptor, FieldKind};
use crate::value::Value;
use crate::{Error, Result};
use chrono::{TimeZone, Utc};
use std::io::Cursor;

pub struct Event<'a> {
    pub class: &'a EventSchema,
    pub(crate) values: Vec<Value>,
}

impl<'a> Event<'a> {
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.class
            .field(name)
            .and_then(|(idx, _)| self.values.get(idx))
    }

    /// Fields paired with their values, in declared order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &Value)> {
        self.class.fields().iter().zip(self.values.iter())
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

pub struct EventIterator<'a> {
    chunk: &'a Chunk,
    stream: ByteStream<Cursor<&'a [u8]>>,
    offset: u64,
}

impl<'a> EventIterator<'a> {
    pub(crate) fn new(chunk: &'a Chunk) -> Self {
        Self {
            chunk,
            stream: ByteStream::new(Cursor::new(chunk.body.as_slice())),
            offset: 0,
        }
    }

    fn internal_next(&mut self) -> Result<Option<Event<'a>>> {
        let end_offset = self.chunk.body.len() as u64;
        if self.offset >= end_offset {
            return Ok(None);
        }

        self.stream.seek(self.offset)?;
        let size = self.stream.read_i32()?;
        if size < 12 {
            return Err(Error::InvalidFormat);
        }
        let event_type = self.stream.read_i64()?;
        let class = self
            .chunk
            .metadata
            .type_pool
            .get(event_type)
            .ok_or(Error::ClassNotFound(event_type))?;

        let mut values = Vec::with_capacity(class.fields().len());
        for field in class.fields() {
            values.push(Self::read_value(&mut self.stream, field.kind)?);
        }

        self.offset += size as u64;
        if self.stream.position()? != self.offset {
            return Err(Error::InvalidFormat);
        }

        Ok(Some(Event { class, values }))
    }

    fn read_value(stream: &mut ByteStream<Cursor<&'a [u8]>>, kind: FieldKind) -> Result<Value> {
        let value = match kind {
            FieldKind::String => Value::String(stream.read_non_null_string()?),
            FieldKind::Long => Value::Long(stream.read_i64()?),
            FieldKind::Instant => Value::Instant(
                Utc.timestamp_millis_opt(stream.read_i64()?)
                    .single()
                    .ok_or(Error::InvalidFormat)?,
            ),
        };
        Ok(value)
    }
}

impl<'a> Iterator for EventIterator<'a> {
    type Item = Result<Event<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.internal_next() {
            Ok(Some(e)) => Some(Ok(e)),
            Ok(None) => None,
            Err(e) => {
                // a malformed record ends iteration
                self.offset = self.chunk.body.len() as u64;
                Some(Err(e))
            }
        }
    }
}
