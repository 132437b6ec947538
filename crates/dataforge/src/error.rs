//! Unified error type for Dataforge.

use dataforge_registry::RegistryError;
use dataforge_schema::{DataError, IdentifierError, SchemaError};
use dataforge_stream::StreamError;

/// Top-level error that wraps every crate-specific error.
///
/// `?` converts each of them automatically, so applications built on the
/// `dataforge` crate can use this single type.
#[derive(Debug, thiserror::Error)]
pub enum DataforgeError {
    /// Schema declaration, instance access, or codec failure.
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A packet buffer failure outside any schema.
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Identifier(#[from] IdentifierError),
}

impl From<SchemaError> for DataforgeError {
    fn from(err: SchemaError) -> Self {
        Self::Data(err.into())
    }
}

impl DataforgeError {
    /// Short, stable name of the failure, for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Data(e) => e.kind(),
            Self::Registry(RegistryError::Duplicate(_)) => "duplicate",
            Self::Registry(RegistryError::NotFound(_)) => "not_found",
            Self::Stream(_) => "stream",
            Self::Identifier(_) => "identifier",
        }
    }
}

#[cfg(test)]
mod tests {
    use dataforge_schema::{DocumentError, Identifier};

    use super::*;

    #[test]
    fn test_from_data_error() {
        let err = DataError::UnsetField("speed".into());
        let top: DataforgeError = err.into();
        assert!(matches!(top, DataforgeError::Data(_)));
        assert!(top.to_string().contains("speed"));
        assert_eq!(top.kind(), "unset_field");
    }

    #[test]
    fn test_from_schema_error_goes_through_data() {
        let top: DataforgeError = SchemaError::DuplicateField("a".into()).into();
        assert!(matches!(top, DataforgeError::Data(DataError::Schema(_))));
        assert_eq!(top.to_string(), "duplicate field `a` in schema");
    }

    #[test]
    fn test_from_registry_error() {
        let id: Identifier = "origins:x".parse().unwrap();
        let top: DataforgeError = RegistryError::NotFound(id).into();
        assert!(matches!(top, DataforgeError::Registry(_)));
        assert_eq!(top.kind(), "not_found");
    }

    #[test]
    fn test_from_stream_error() {
        let top: DataforgeError = StreamError::InvalidBoolean(2).into();
        assert_eq!(top.to_string(), "invalid boolean byte 0x02");
        assert_eq!(top.kind(), "stream");
    }

    #[test]
    fn test_document_error_message_passes_through() {
        let err: DataError = DocumentError::MissingField("a".into()).into();
        let top: DataforgeError = err.into();
        assert_eq!(top.to_string(), "document requires field: a");
        assert_eq!(top.kind(), "document");
    }
}
