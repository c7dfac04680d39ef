//! Descriptors of event types declared in a recording.
//! EventSchema defines the "schema" of an event; values are written and read
//! in the order its fields are declared.

use crate::{Error, Result};

const KIND_LONG: i8 = 1;
const KIND_STRING: i8 = 2;
const KIND_INSTANT: i8 = 3;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FieldKind {
    String,
    Long,
    /// Milliseconds since the Unix epoch.
    Instant,
}

impl FieldKind {
    pub(crate) fn tag(self) -> i8 {
        match self {
            FieldKind::Long => KIND_LONG,
            FieldKind::String => KIND_STRING,
            FieldKind::Instant => KIND_INSTANT,
        }
    }

    pub(crate) fn from_tag(tag: i8) -> Result<Self> {
        match tag {
            KIND_LONG => Ok(FieldKind::Long),
            KIND_STRING => Ok(FieldKind::String),
            KIND_INSTANT => Ok(FieldKind::Instant),
            _ => Err(Error::InvalidFormat),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
pub struct EventSchema {
    id: i64,
    type_name: String,
    fields: Vec<FieldDescriptor>,
}

impl EventSchema {
    /// Fails if two fields share a name.
    pub(crate) fn try_new(
        id: i64,
        type_name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self> {
        let type_name = type_name.into();
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(Error::DuplicateField {
                    type_name,
                    field: field.name.clone(),
                });
            }
        }
        Ok(Self {
            id,
            type_name,
            fields,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<(usize, &FieldDescriptor)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tag() {
        for kind in [FieldKind::String, FieldKind::Long, FieldKind::Instant] {
            assert_eq!(kind, FieldKind::from_tag(kind.tag()).unwrap());
        }
        assert!(matches!(FieldKind::from_tag(0), Err(Error::InvalidFormat)));
    }

    #[test]
    fn test_duplicate_field_name() {
        let result = EventSchema::try_new(
            0,
            "demo.Dup",
            vec![
                FieldDescriptor::new("pid", FieldKind::Long),
                FieldDescriptor::new("pid", FieldKind::String),
            ],
        );
        assert!(matches!(
            result,
            Err(Error::DuplicateField { field, .. }) if field == "pid"
        ));
    }

    #[test]
    fn test_field_lookup() {
        let schema = EventSchema::try_new(
            3,
            "demo.Process",
            vec![
                FieldDescriptor::new("commandLine", FieldKind::String),
                FieldDescriptor::new("pid", FieldKind::Long),
            ],
        )
        .unwrap();

        let (idx, field) = schema.field("pid").unwrap();
        assert_eq!(1, idx);
        assert_eq!(FieldKind::Long, field.kind);
        assert!(schema.field("startTime").is_none());
    }
}
