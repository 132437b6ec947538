//! # Dataforge
//!
//! Schema-driven value containers with a compact binary codec and a JSON
//! document codec.
//!
//! Declare a [`Schema`](schema::Schema) once, load hand-written JSON
//! documents against it (omitted fields take their defaults), and ship
//! the resolved instances over the wire in positional binary form.
//!
//! ## Quick Start
//!
//! ```rust
//! use dataforge::prelude::*;
//! use serde_json::json;
//!
//! let schema = Schema::builder()
//!     .add("cooldown", IntType)
//!     .add_default("charges", IntType, 1)
//!     .add_computed("recharge", IntType, |data| Ok(data.get_int("cooldown")? / 2))
//!     .add_optional("key", StringType)
//!     .build();
//!
//! let loaded = schema.read_document(&json!({ "cooldown": 40 }))?;
//! assert_eq!(loaded.get_int("recharge")?, 20);
//!
//! let bytes = schema.to_bytes(&loaded)?;
//! let received = schema.from_bytes(&bytes)?;
//! assert_eq!(received, loaded);
//! # Ok::<(), DataforgeError>(())
//! ```
//!
//! ## Crates
//!
//! | Module | Crate | Contents |
//! |---|---|---|
//! | [`stream`] | `dataforge-stream` | packet reader/writer, limits |
//! | [`schema`] | `dataforge-schema` | schemas, instances, both codecs |
//! | [`types`] | `dataforge-types` | standard field types |
//! | [`registry`] | `dataforge-registry` | identifier → schema map |

mod error;

pub use error::DataforgeError;

pub use dataforge_registry as registry;
pub use dataforge_schema as schema;
pub use dataforge_stream as stream;
pub use dataforge_types as types;

/// The types most programs need.
pub mod prelude {
    pub use crate::DataforgeError;
    pub use dataforge_registry::{RegistryError, SchemaRegistry};
    pub use dataforge_schema::{
        AttributeModifier, DataError, DefaultPolicy, DocumentError, EarlierFields, FieldError,
        FieldSpec, FieldType, Identifier, Instance, Operation, Record, Schema, SchemaError,
        Value, ValueKind,
    };
    pub use dataforge_stream::{PacketReader, PacketWriter, StreamError, StreamLimits};
    pub use dataforge_types::{
        AttributeModifierType, BoolType, DoubleType, FloatType, IdentifierType, IntType,
        ListType, RecordType, StringType,
    };
}
