//! Attribute modifiers: a named amount with an operation.

use dataforge_schema::{
    expect_kind, AttributeModifier, FieldError, FieldType, Operation, Value, ValueKind,
};
use dataforge_stream::{PacketReader, PacketWriter};
use serde_json::{json, Map, Value as Json};

/// Name given to a modifier whose document omits `name`.
pub const DEFAULT_MODIFIER_NAME: &str = "Unnamed attribute modifier";

/// An [`AttributeModifier`].
///
/// ```text
/// binary:   [name: string] [amount: f64] [operation: u8]
/// document: { "name"?: string, "value": number, "operation": string }
/// ```
///
/// Operation names in documents are case-insensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeModifierType;

fn member<'a>(object: &'a Map<String, Json>, key: &str) -> Result<&'a Json, FieldError> {
    object
        .get(key)
        .ok_or_else(|| FieldError::Malformed(format!("attribute modifier requires `{key}`")))
}

impl FieldType for AttributeModifierType {
    fn kind(&self) -> ValueKind {
        ValueKind::AttributeModifier
    }

    fn encode_binary(&self, out: &mut PacketWriter, value: &Value) -> Result<(), FieldError> {
        let Value::AttributeModifier(modifier) = value else {
            return expect_kind(ValueKind::AttributeModifier, value);
        };
        out.write_string(&modifier.name)?;
        out.write_f64(modifier.amount);
        out.write_u8(modifier.operation.ordinal());
        Ok(())
    }

    fn decode_binary(&self, input: &mut PacketReader<'_>) -> Result<Value, FieldError> {
        let name = input.read_string()?;
        let amount = input.read_f64()?;
        let ordinal = input.read_u8()?;
        let operation = Operation::from_ordinal(ordinal).ok_or_else(|| {
            FieldError::Malformed(format!("unknown attribute modifier operation {ordinal}"))
        })?;
        Ok(Value::AttributeModifier(AttributeModifier {
            name,
            amount,
            operation,
        }))
    }

    fn decode_document(&self, node: &Json) -> Result<Value, FieldError> {
        let object = node
            .as_object()
            .ok_or_else(|| FieldError::wrong_shape("object", node))?;

        let name = match object.get("name") {
            Some(Json::String(s)) => s.clone(),
            Some(other) => return Err(FieldError::wrong_shape("string", other)),
            None => DEFAULT_MODIFIER_NAME.to_owned(),
        };
        let value = member(object, "value")?;
        let amount = value
            .as_f64()
            .ok_or_else(|| FieldError::wrong_shape("number", value))?;
        let operation = member(object, "operation")?;
        let operation = operation
            .as_str()
            .ok_or_else(|| FieldError::wrong_shape("string", operation))?
            .parse::<Operation>()
            .map_err(FieldError::Malformed)?;

        Ok(Value::AttributeModifier(AttributeModifier {
            name,
            amount,
            operation,
        }))
    }

    fn encode_document(&self, value: &Value) -> Result<Json, FieldError> {
        let Value::AttributeModifier(modifier) = value else {
            return expect_kind(ValueKind::AttributeModifier, value).map(|()| Json::Null);
        };
        if !modifier.amount.is_finite() {
            return Err(FieldError::OutOfRange(modifier.amount.to_string()));
        }
        Ok(json!({
            "name": modifier.name,
            "value": modifier.amount,
            "operation": modifier.operation.name(),
        }))
    }
}
