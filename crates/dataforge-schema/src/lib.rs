//! Schemas, instances, and codecs for Dataforge.
//!
//! A [`Schema`] is an ordered list of named, typed fields, each with a
//! [`DefaultPolicy`]. An [`Instance`] holds the values of one record
//! conforming to a schema. The schema reads and writes instances in two
//! formats:
//!
//! - **Binary** ([`Schema::write`], [`Schema::read`]): compact and
//!   positional. The sender resolves defaults before writing; only
//!   presence-optional fields carry a presence flag.
//! - **Document** ([`Schema::read_document`]): JSON objects written by
//!   hand. Omitted fields take their static or computed default.
//!
//! Concrete field types (integers, strings, lists, ...) are not defined
//! here. They implement the [`FieldType`] contract, and the schema only
//! ever calls through it.
//!
//! ```text
//!             ┌──────── Schema (shared, immutable) ────────┐
//!             │  "a"  IntType      Required                │
//!             │  "b"  IntType      Static(Some(5))         │
//!             │  "c"  IntType      Computed(a * 2)         │
//!             │  "d"  StringType   Static(None)  ← flagged │
//!             └────────────────────────────────────────────┘
//!    JSON ──read_document──► Instance ──write──► bytes ──read──► Instance
//! ```

mod binary;
mod document;
mod error;
mod field;
mod instance;
mod schema;
mod value;

pub use error::{
    json_type_name, DataError, DocumentError, FieldError, SchemaError,
};
pub use field::{expect_kind, ComputeFn, DefaultPolicy, FieldSpec, FieldType};
pub use instance::{EarlierFields, Instance};
pub use schema::{IntoFieldType, Schema, SchemaBuilder};
pub use value::{
    AttributeModifier, FromValue, Identifier, IdentifierError, Operation,
    Record, Value, ValueKind, DEFAULT_NAMESPACE,
};
