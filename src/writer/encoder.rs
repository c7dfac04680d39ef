//! Translate field values into the wire representation of a schema.

use crate::schema::EventSchema;
use crate::value::{FieldValues, Value};
use crate::writer::byte_sink::ByteSink;
use crate::{Error, Result};
use std::sync::Arc;

/// An event ready to be appended to a log: the schema it was encoded for and
/// its field values in declared order.
#[derive(Debug, Clone)]
pub struct EncodedEvent {
    pub(crate) schema: Arc<EventSchema>,
    pub(crate) payload: Vec<u8>,
}

impl EncodedEvent {
    pub fn schema(&self) -> &Arc<EventSchema> {
        &self.schema
    }

    pub fn type_id(&self) -> i64 {
        self.schema.id()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

pub fn encode(schema: &Arc<EventSchema>, values: FieldValues) -> Result<EncodedEvent> {
    let mut slots: Vec<Option<Value>> = vec![None; schema.fields().len()];

    for (name, value) in values.entries {
        let (idx, field) = schema.field(&name).ok_or_else(|| Error::UnknownField {
            type_name: schema.type_name().to_string(),
            field: name.clone(),
        })?;
        if slots[idx].is_some() {
            return Err(Error::DuplicateField {
                type_name: schema.type_name().to_string(),
                field: name,
            });
        }
        if value.kind() != field.kind {
            return Err(Error::TypeMismatch {
                type_name: schema.type_name().to_string(),
                field: name,
                expected: field.kind,
                actual: value.kind(),
            });
        }
        slots[idx] = Some(value);
    }

    let mut sink = ByteSink::new(Vec::new());
    for (field, slot) in schema.fields().iter().zip(slots) {
        match slot {
            Some(Value::String(s)) => sink.write_string(&s)?,
            Some(Value::Long(v)) => sink.write_i64(v)?,
            Some(Value::Instant(t)) => sink.write_i64(t.timestamp_millis())?,
            None => {
                return Err(Error::FieldMismatch {
                    type_name: schema.type_name().to_string(),
                    field: field.name.clone(),
                })
            }
        }
    }

    Ok(EncodedEvent {
        schema: schema.clone(),
        payload: sink.into_inner(),
    })
}
