//! Homogeneous lists of another field type.

use std::sync::Arc;

use dataforge_schema::{expect_kind, FieldError, FieldType, IntoFieldType, Value, ValueKind};
use dataforge_stream::{PacketReader, PacketWriter};
use serde_json::Value as Json;

/// Upper bound on the up-front allocation for a decoded list. The count
/// comes off the wire, so it is only trusted after the elements arrive.
const PREALLOCATE_LIMIT: usize = 256;

/// A homogeneous list of another field type.
///
/// On the wire: a VarInt element count, then each element. In documents
/// an array, or a single bare element read as a one-item list.
#[derive(Debug, Clone)]
pub struct ListType {
    element: Arc<dyn FieldType>,
}

impl ListType {
    pub fn new(element: impl IntoFieldType) -> Self {
        Self {
            element: element.into_field_type(),
        }
    }

    pub fn element(&self) -> &dyn FieldType {
        self.element.as_ref()
    }
}

impl FieldType for ListType {
    fn kind(&self) -> ValueKind {
        ValueKind::List
    }

    fn encode_binary(&self, out: &mut PacketWriter, value: &Value) -> Result<(), FieldError> {
        let Value::List(items) = value else {
            return expect_kind(ValueKind::List, value);
        };
        out.write_list_len(items.len())?;
        for item in items {
            self.element.encode_binary(out, item)?;
        }
        Ok(())
    }

    fn decode_binary(&self, input: &mut PacketReader<'_>) -> Result<Value, FieldError> {
        let len = input.read_list_len()?;
        let mut items = Vec::with_capacity(len.min(PREALLOCATE_LIMIT));
        for _ in 0..len {
            items.push(self.element.decode_binary(input)?);
        }
        Ok(Value::List(items))
    }

    fn decode_document(&self, node: &Json) -> Result<Value, FieldError> {
        match node {
            Json::Array(nodes) => nodes
                .iter()
                .map(|n| self.element.decode_document(n))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            single => Ok(Value::List(vec![self.element.decode_document(single)?])),
        }
    }

    fn encode_document(&self, value: &Value) -> Result<Json, FieldError> {
        let Value::List(items) = value else {
            return expect_kind(ValueKind::List, value).map(|()| Json::Null);
        };
        items
            .iter()
            .map(|item| self.element.encode_document(item))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array)
    }

    fn check(&self, value: &Value) -> Result<(), FieldError> {
        let Value::List(items) = value else {
            return expect_kind(ValueKind::List, value);
        };
        items.iter().try_for_each(|item| self.element.check(item))
    }
}
