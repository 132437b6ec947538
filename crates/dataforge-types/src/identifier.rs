//! Namespaced identifiers.

use dataforge_schema::{expect_kind, FieldError, FieldType, Identifier, Value, ValueKind};
use dataforge_stream::{PacketReader, PacketWriter};
use serde_json::Value as Json;

/// Namespaced identifier such as `minecraft:speed`.
///
/// Sent as its string form. A bare path in either format gets the
/// default namespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierType;

fn parse(text: &str) -> Result<Value, FieldError> {
    text.parse::<Identifier>()
        .map(Value::Identifier)
        .map_err(|e| FieldError::Malformed(e.to_string()))
}

impl FieldType for IdentifierType {
    fn kind(&self) -> ValueKind {
        ValueKind::Identifier
    }

    fn encode_binary(&self, out: &mut PacketWriter, value: &Value) -> Result<(), FieldError> {
        match value {
            Value::Identifier(id) => Ok(out.write_string(&id.to_string())?),
            other => expect_kind(ValueKind::Identifier, other),
        }
    }

    fn decode_binary(&self, input: &mut PacketReader<'_>) -> Result<Value, FieldError> {
        parse(&input.read_string()?)
    }

    fn decode_document(&self, node: &Json) -> Result<Value, FieldError> {
        let text = node
            .as_str()
            .ok_or_else(|| FieldError::wrong_shape("string", node))?;
        parse(text)
    }

    fn encode_document(&self, value: &Value) -> Result<Json, FieldError> {
        match value {
            Value::Identifier(id) => Ok(Json::String(id.to_string())),
            other => expect_kind(ValueKind::Identifier, other).map(|()| Json::Null),
        }
    }
}
