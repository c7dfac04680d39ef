use crate::schema::FieldKind;
use crate::Version;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("event type `{0}` is already registered with different fields")]
    SchemaConflict(String),

    #[error("field `{field}` given more than once for `{type_name}`")]
    DuplicateField { type_name: String, field: String },

    #[error("field `{field}` of `{type_name}` has no value")]
    FieldMismatch { type_name: String, field: String },

    #[error("`{type_name}` declares no field `{field}`")]
    UnknownField { type_name: String, field: String },

    #[error("field `{field}` of `{type_name}` expects {expected:?}, got {actual:?}")]
    TypeMismatch {
        type_name: String,
        field: String,
        expected: FieldKind,
        actual: FieldKind,
    },

    #[error("event type `{0}` is not registered with this log")]
    UnknownSchema(String),

    #[error("{0} does not fit in a 32-bit length")]
    TooLarge(&'static str),

    #[error("log is already closed")]
    LogClosed,

    #[error("invalid recording format")]
    InvalidFormat,

    #[error("invalid string")]
    InvalidString,

    #[error("unsupported version {0}")]
    UnsupportedVersion(Version),

    #[error("no event type with id {0}")]
    ClassNotFound(i64),

    #[error("deserialize error: {0}")]
    Deserialize(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
