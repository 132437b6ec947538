//! Standard field types for Dataforge schemas.
//!
//! Each type here implements [`FieldType`](dataforge_schema::FieldType)
//! for one [`Value`](dataforge_schema::Value) arm:
//!
//! | Type | Value | Binary | Document |
//! |---|---|---|---|
//! | [`IntType`] | `Int` | i32, big-endian | integer |
//! | [`BoolType`] | `Bool` | 1 byte | boolean |
//! | [`FloatType`] | `Float` | f32, big-endian | number |
//! | [`DoubleType`] | `Double` | f64, big-endian | number |
//! | [`StringType`] | `String` | VarInt length + UTF-8 | string |
//! | [`IdentifierType`] | `Identifier` | as string | `"namespace:path"` |
//! | [`AttributeModifierType`] | `AttributeModifier` | string, f64, u8 | object |
//! | [`ListType`] | `List` | VarInt count + elements | array, or one bare element |
//! | [`RecordType`] | `Record` | nested schema, positional | object |

mod identifier;
mod list;
mod modifier;
mod primitives;
mod record;

pub use identifier::IdentifierType;
pub use list::ListType;
pub use modifier::{AttributeModifierType, DEFAULT_MODIFIER_NAME};
pub use primitives::{BoolType, DoubleType, FloatType, IntType, StringType};
pub use record::RecordType;
