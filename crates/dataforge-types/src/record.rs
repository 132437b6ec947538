//! Records nested under another schema.

use std::sync::Arc;

use dataforge_schema::{
    expect_kind, DataError, FieldError, FieldType, Instance, Schema, Value, ValueKind,
};
use dataforge_stream::{PacketReader, PacketWriter};
use serde_json::Value as Json;

/// A nested instance of another schema, stored as a
/// [`Record`](dataforge_schema::Record).
///
/// Both codecs delegate to the nested schema, so the nested fields follow
/// the same rules as top-level ones: defaults apply in documents,
/// presence flags apply on the wire.
#[derive(Debug, Clone)]
pub struct RecordType {
    schema: Arc<Schema>,
}

impl RecordType {
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        Self {
            schema: schema.into(),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }
}

impl FieldType for RecordType {
    fn kind(&self) -> ValueKind {
        ValueKind::Record
    }

    fn encode_binary(&self, out: &mut PacketWriter, value: &Value) -> Result<(), FieldError> {
        let Value::Record(record) = value else {
            return expect_kind(ValueKind::Record, value);
        };
        let instance = Instance::from_record(&self.schema, record.clone());
        Ok(self.schema.write(out, &instance)?)
    }

    fn decode_binary(&self, input: &mut PacketReader<'_>) -> Result<Value, FieldError> {
        let instance = self.schema.read(input)?;
        Ok(Value::Record(instance.into_record()))
    }

    fn decode_document(&self, node: &Json) -> Result<Value, FieldError> {
        let instance = self.schema.read_document(node)?;
        Ok(Value::Record(instance.into_record()))
    }

    fn encode_document(&self, value: &Value) -> Result<Json, FieldError> {
        let Value::Record(record) = value else {
            return expect_kind(ValueKind::Record, value).map(|()| Json::Null);
        };
        let instance = Instance::from_record(&self.schema, record.clone());
        Ok(self.schema.write_document(&instance)?)
    }

    /// Every declared field must hold a value the nested type accepts;
    /// only presence-optional fields may be empty.
    fn check(&self, value: &Value) -> Result<(), FieldError> {
        let Value::Record(record) = value else {
            return expect_kind(ValueKind::Record, value);
        };
        for field in self.schema.fields() {
            match record.get(field.name()) {
                Some(Some(inner)) => field.ty().check(inner)?,
                Some(None) if field.is_presence_optional() => {}
                _ => return Err(DataError::Unresolved(field.name().to_owned()).into()),
            }
        }
        Ok(())
    }
}
