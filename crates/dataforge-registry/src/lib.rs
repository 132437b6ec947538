//! Identifier-keyed registry of shared schemas.
//!
//! Schemas are built once and handed out as `Arc<Schema>`, so every
//! consumer decoding a given kind of record holds the same declaration.
//! Instances compare equal only when bound to the same schema, which the
//! registry makes easy to guarantee.

mod error;
mod registry;

pub use error::RegistryError;
pub use registry::SchemaRegistry;
