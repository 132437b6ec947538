//! Error types for schemas, instances, and the two codecs.
//!
//! The layering mirrors where a failure originates:
//!
//! - [`FieldError`]: raised by a single [`FieldType`](crate::FieldType)
//!   implementation while encoding or decoding one value.
//! - [`SchemaError`]: a mistake in how a schema was declared.
//! - [`DocumentError`]: a JSON document did not fit the schema.
//! - [`DataError`]: the umbrella every public operation returns.

use dataforge_stream::StreamError;

use crate::ValueKind;

/// Returns the JSON type name of a document node, for error messages.
pub fn json_type_name(node: &serde_json::Value) -> &'static str {
    match node {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// FieldError
// ---------------------------------------------------------------------------

/// Errors produced by a field type's encode/decode methods.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// The underlying packet buffer failed (truncation, limits, ...).
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// A document node had the wrong JSON type.
    #[error("expected {expected}, found {found}")]
    WrongShape {
        expected: &'static str,
        found: &'static str,
    },

    /// A number did not fit the field's value range.
    #[error("{0} is out of range")]
    OutOfRange(String),

    /// A literal had the right JSON type but invalid contents.
    #[error("{0}")]
    Malformed(String),

    /// The value handed to an encoder was not the kind the type encodes.
    #[error("expected {expected} value, found {found}")]
    Mismatch { expected: ValueKind, found: ValueKind },

    /// A nested schema failed while reading or writing.
    #[error(transparent)]
    Nested(Box<DataError>),

    /// The field type does not implement this direction.
    #[error("{0} is not supported by this field type")]
    Unsupported(&'static str),
}

impl FieldError {
    /// Builds a `WrongShape` error from the node that was found.
    pub fn wrong_shape(expected: &'static str, found: &serde_json::Value) -> Self {
        Self::WrongShape {
            expected,
            found: json_type_name(found),
        }
    }

    /// Stable short name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Stream(_) => "stream",
            Self::WrongShape { .. } => "wrong_shape",
            Self::OutOfRange(_) => "out_of_range",
            Self::Malformed(_) => "malformed",
            Self::Mismatch { .. } => "mismatch",
            Self::Nested(inner) => inner.kind(),
            Self::Unsupported(_) => "unsupported",
        }
    }
}

impl From<DataError> for FieldError {
    /// Stream errors from a nested read stay stream errors so they keep
    /// propagating unmodified; everything else is wrapped.
    fn from(err: DataError) -> Self {
        match err {
            DataError::Stream(e) => Self::Stream(e),
            other => Self::Nested(Box::new(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// SchemaError
// ---------------------------------------------------------------------------

/// A schema was declared incorrectly. These are programmer errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("duplicate field `{0}` in schema")]
    DuplicateField(String),

    #[error("tried to access the default of field `{0}`, which declares none")]
    NoDefault(String),

    #[error("default for field `{field}` is {found}, but the field type produces {expected}")]
    DefaultKindMismatch {
        field: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// A static default has the right kind but contents the field type
    /// rejects, such as a list element of another kind.
    #[error("default for field `{field}` is invalid: {message}")]
    InvalidDefault { field: String, message: String },
}

// ---------------------------------------------------------------------------
// DocumentError
// ---------------------------------------------------------------------------

fn field_prefix(field: &Option<String>) -> String {
    match field {
        Some(name) => format!("field `{name}`: "),
        None => String::new(),
    }
}

/// A JSON document could not be read into an instance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// The top-level node was not a JSON object.
    #[error("document must be an object, found {0}")]
    NotAnObject(&'static str),

    /// A field without any default was absent.
    #[error("document requires field: {0}")]
    MissingField(String),

    /// Any other decode failure, normalized to one shape: which field,
    /// the original failure's kind, and its message.
    #[error("{}{}: {}", field_prefix(.field), .kind, .message)]
    Syntax {
        field: Option<String>,
        kind: &'static str,
        message: String,
    },
}

impl DocumentError {
    /// Wraps a field type's decode failure.
    pub fn syntax(field: &str, err: &FieldError) -> Self {
        Self::Syntax {
            field: Some(field.to_owned()),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// DataError
// ---------------------------------------------------------------------------

/// Errors returned by schema, instance, and codec operations.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The instance has no entry at all for this name.
    #[error("tried to get field `{0}` from data, which did not exist")]
    UnsetField(String),

    /// The entry exists but is the empty sentinel.
    #[error("field `{0}` is empty")]
    EmptyField(String),

    /// A typed accessor found a different kind of value.
    #[error("field `{field}` holds {found}, not {expected}")]
    TypeMismatch {
        field: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// A computed default read a field declared at or after its own.
    #[error("field `{0}` is not resolved yet; computed defaults may only read earlier fields")]
    ForwardReference(String),

    /// A field that is not presence-optional had no value at write time.
    #[error("field `{0}` has no resolved value")]
    Unresolved(String),

    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Packet buffer failure, passed through unchanged.
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("failed to encode field `{field}`: {source}")]
    Encode {
        field: String,
        #[source]
        source: FieldError,
    },

    #[error("failed to decode field `{field}`: {source}")]
    Decode {
        field: String,
        #[source]
        source: FieldError,
    },

    /// `from_bytes` finished with input left over.
    #[error("{0} trailing bytes after instance")]
    TrailingBytes(usize),
}

impl DataError {
    /// Stable short name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Schema(_) => "schema",
            Self::UnsetField(_) => "unset_field",
            Self::EmptyField(_) => "empty_field",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::ForwardReference(_) => "forward_reference",
            Self::Unresolved(_) => "unresolved",
            Self::Document(_) => "document",
            Self::Stream(_) => "stream",
            Self::Encode { .. } => "encode",
            Self::Decode { .. } => "decode",
            Self::TrailingBytes(_) => "trailing_bytes",
        }
    }

    /// Attaches a field name to a field type's encode failure.
    pub(crate) fn encode(field: &str, err: FieldError) -> Self {
        match err {
            FieldError::Stream(e) => Self::Stream(e),
            other => Self::Encode {
                field: field.to_owned(),
                source: other,
            },
        }
    }

    /// Attaches a field name to a field type's decode failure.
    pub(crate) fn decode(field: &str, err: FieldError) -> Self {
        match err {
            FieldError::Stream(e) => Self::Stream(e),
            other => Self::Decode {
                field: field.to_owned(),
                source: other,
            },
        }
    }
}
