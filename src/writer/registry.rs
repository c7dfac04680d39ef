//! Registry of the event types declared in a log.

use crate::schema::{EventSchema, FieldDescriptor};
use crate::{Error, Result};
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    // index is the schema id
    schemas: Vec<Arc<EventSchema>>,
    by_name: FxHashMap<String, usize>,
}

impl SchemaRegistry {
    /// Registers `type_name`, or returns the schema already registered under
    /// that name if its fields are identical.
    pub fn register(
        &mut self,
        type_name: &str,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Arc<EventSchema>> {
        if let Some(existing) = self.lookup(type_name) {
            if existing.fields() != fields.as_slice() {
                return Err(Error::SchemaConflict(type_name.to_string()));
            }
            return Ok(existing);
        }

        let idx = self.schemas.len();
        let schema = Arc::new(EventSchema::try_new(idx as i64, type_name, fields)?);
        self.schemas.push(schema.clone());
        self.by_name.insert(type_name.to_string(), idx);
        Ok(schema)
    }

    pub fn lookup(&self, type_name: &str) -> Option<Arc<EventSchema>> {
        self.by_name
            .get(type_name)
            .map(|&idx| self.schemas[idx].clone())
    }

    pub fn get(&self, id: i64) -> Option<&Arc<EventSchema>> {
        usize::try_from(id).ok().and_then(|idx| self.schemas.get(idx))
    }

    /// True if `schema` is the one this registry handed out for its id.
    pub fn contains(&self, schema: &Arc<EventSchema>) -> bool {
        self.get(schema.id())
            .map_or(false, |s| Arc::ptr_eq(s, schema))
    }

    /// Schemas in registration order.
    pub fn schemas(&self) -> impl Iterator<Item = &Arc<EventSchema>> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
