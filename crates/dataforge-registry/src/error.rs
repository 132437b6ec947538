//! Error types for the registry.

use dataforge_schema::Identifier;

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// An entry with this identifier already exists. Use `update` to
    /// replace it.
    #[error("duplicate schema registration: {0}")]
    Duplicate(Identifier),

    #[error("schema {0} not found")]
    NotFound(Identifier),
}
