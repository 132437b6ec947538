//! Scalar field types.

use dataforge_schema::{expect_kind, FieldError, FieldType, Value, ValueKind};
use dataforge_stream::{PacketReader, PacketWriter};
use serde_json::{Number, Value as Json};

/// 32-bit signed integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntType;

impl FieldType for IntType {
    fn kind(&self) -> ValueKind {
        ValueKind::Int
    }

    fn encode_binary(&self, out: &mut PacketWriter, value: &Value) -> Result<(), FieldError> {
        match value {
            Value::Int(n) => {
                out.write_i32(*n);
                Ok(())
            }
            other => expect_kind(ValueKind::Int, other),
        }
    }

    fn decode_binary(&self, input: &mut PacketReader<'_>) -> Result<Value, FieldError> {
        Ok(Value::Int(input.read_i32()?))
    }

    fn decode_document(&self, node: &Json) -> Result<Value, FieldError> {
        let Json::Number(n) = node else {
            return Err(FieldError::wrong_shape("number", node));
        };
        if let Some(wide) = n.as_i64() {
            return i32::try_from(wide)
                .map(Value::Int)
                .map_err(|_| FieldError::OutOfRange(wide.to_string()));
        }
        if n.is_u64() {
            return Err(FieldError::OutOfRange(n.to_string()));
        }
        Err(FieldError::Malformed(format!("{n} is not an integer")))
    }

    fn encode_document(&self, value: &Value) -> Result<Json, FieldError> {
        match value {
            Value::Int(n) => Ok(Json::from(*n)),
            other => expect_kind(ValueKind::Int, other).map(|()| Json::Null),
        }
    }
}

/// Boolean, one byte on the wire.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolType;

impl FieldType for BoolType {
    fn kind(&self) -> ValueKind {
        ValueKind::Bool
    }

    fn encode_binary(&self, out: &mut PacketWriter, value: &Value) -> Result<(), FieldError> {
        match value {
            Value::Bool(b) => {
                out.write_bool(*b);
                Ok(())
            }
            other => expect_kind(ValueKind::Bool, other),
        }
    }

    fn decode_binary(&self, input: &mut PacketReader<'_>) -> Result<Value, FieldError> {
        Ok(Value::Bool(input.read_bool()?))
    }

    fn decode_document(&self, node: &Json) -> Result<Value, FieldError> {
        node.as_bool()
            .map(Value::Bool)
            .ok_or_else(|| FieldError::wrong_shape("boolean", node))
    }

    fn encode_document(&self, value: &Value) -> Result<Json, FieldError> {
        match value {
            Value::Bool(b) => Ok(Json::Bool(*b)),
            other => expect_kind(ValueKind::Bool, other).map(|()| Json::Null),
        }
    }
}

fn number_from_f64(v: f64) -> Result<Json, FieldError> {
    Number::from_f64(v)
        .map(Json::Number)
        .ok_or_else(|| FieldError::OutOfRange(v.to_string()))
}

/// 32-bit float.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatType;

impl FieldType for FloatType {
    fn kind(&self) -> ValueKind {
        ValueKind::Float
    }

    fn encode_binary(&self, out: &mut PacketWriter, value: &Value) -> Result<(), FieldError> {
        match value {
            Value::Float(v) => {
                out.write_f32(*v);
                Ok(())
            }
            other => expect_kind(ValueKind::Float, other),
        }
    }

    fn decode_binary(&self, input: &mut PacketReader<'_>) -> Result<Value, FieldError> {
        Ok(Value::Float(input.read_f32()?))
    }

    fn decode_document(&self, node: &Json) -> Result<Value, FieldError> {
        let wide = node
            .as_f64()
            .ok_or_else(|| FieldError::wrong_shape("number", node))?;
        let narrow = wide as f32;
        if narrow.is_infinite() {
            return Err(FieldError::OutOfRange(wide.to_string()));
        }
        Ok(Value::Float(narrow))
    }

    fn encode_document(&self, value: &Value) -> Result<Json, FieldError> {
        match value {
            Value::Float(v) => number_from_f64(f64::from(*v)),
            other => expect_kind(ValueKind::Float, other).map(|()| Json::Null),
        }
    }
}

/// 64-bit float.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleType;

impl FieldType for DoubleType {
    fn kind(&self) -> ValueKind {
        ValueKind::Double
    }

    fn encode_binary(&self, out: &mut PacketWriter, value: &Value) -> Result<(), FieldError> {
        match value {
            Value::Double(v) => {
                out.write_f64(*v);
                Ok(())
            }
            other => expect_kind(ValueKind::Double, other),
        }
    }

    fn decode_binary(&self, input: &mut PacketReader<'_>) -> Result<Value, FieldError> {
        Ok(Value::Double(input.read_f64()?))
    }

    fn decode_document(&self, node: &Json) -> Result<Value, FieldError> {
        node.as_f64()
            .map(Value::Double)
            .ok_or_else(|| FieldError::wrong_shape("number", node))
    }

    fn encode_document(&self, value: &Value) -> Result<Json, FieldError> {
        match value {
            Value::Double(v) => number_from_f64(*v),
            other => expect_kind(ValueKind::Double, other).map(|()| Json::Null),
        }
    }
}

/// UTF-8 string, VarInt length-prefixed on the wire.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringType;

impl FieldType for StringType {
    fn kind(&self) -> ValueKind {
        ValueKind::String
    }

    fn encode_binary(&self, out: &mut PacketWriter, value: &Value) -> Result<(), FieldError> {
        match value {
            Value::String(s) => Ok(out.write_string(s)?),
            other => expect_kind(ValueKind::String, other),
        }
    }

    fn decode_binary(&self, input: &mut PacketReader<'_>) -> Result<Value, FieldError> {
        Ok(Value::String(input.read_string()?))
    }

    fn decode_document(&self, node: &Json) -> Result<Value, FieldError> {
        node.as_str()
            .map(Value::from)
            .ok_or_else(|| FieldError::wrong_shape("string", node))
    }

    fn encode_document(&self, value: &Value) -> Result<Json, FieldError> {
        match value {
            Value::String(s) => Ok(Json::String(s.clone())),
            other => expect_kind(ValueKind::String, other).map(|()| Json::Null),
        }
    }
}
