//! Deserialize events into user types with serde.
//!
//! Strings are borrowed from the event, longs map to `i64`, and instants are
//! handed out as `i64` milliseconds since the epoch, so a `DateTime<Utc>`
//! target field needs `#[serde(with = "chrono::serde::ts_milliseconds")]`.

use crate::reader::Event;
use crate::value::Value;
use crate::Error;
use serde::de::value::StrDeserializer;
use serde::de::{DeserializeSeed, IntoDeserializer, Visitor};
use serde::{forward_to_deserialize_any, Deserialize};
use std::fmt::Display;

pub fn from_event<'de, T>(event: &'de Event<'de>) -> Result<T, Error>
where
    T: Deserialize<'de>,
{
    T::deserialize(EventDeserializer { event })
}

impl serde::de::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Deserialize(msg.to_string())
    }
}

struct EventDeserializer<'de> {
    event: &'de Event<'de>,
}

struct FieldAccess<'de> {
    event: &'de Event<'de>,
    field_idx: usize,
}

impl<'de> serde::de::MapAccess<'de> for FieldAccess<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        match self.event.class.fields().get(self.field_idx) {
            Some(field) => {
                let key: StrDeserializer<Self::Error> = field.name.as_str().into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let value = self
            .event
            .values
            .get(self.field_idx)
            .ok_or_else(|| Error::Deserialize("value requested past last field".to_string()))?;
        self.field_idx += 1;
        seed.deserialize(ValueDeserializer { value })
    }
}

impl<'de> serde::Deserializer<'de> for EventDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(FieldAccess {
            event: self.event,
            field_idx: 0,
        })
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any struct
    }
}

struct ValueDeserializer<'de> {
    value: &'de Value,
}

impl<'de> serde::Deserializer<'de> for ValueDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(v) => visitor.visit_borrowed_str(v.as_str()),
            Value::Long(v) => visitor.visit_i64(*v),
            Value::Instant(v) => visitor.visit_i64(v.timestamp_millis()),
        }
    }

    // values are never null
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any struct
    }
}
