//! JSON document codec.
//!
//! Unlike the binary codec, documents are authored by hand and may omit
//! any field that has a default. Reading resolves those defaults in
//! declaration order, so a computed default sees every earlier field
//! already filled in.

use serde_json::{Map, Value as Json};

use crate::error::json_type_name;
use crate::{DataError, DefaultPolicy, DocumentError, Instance, Schema};

/// Normalizes a failure from a computed default into a document error.
fn default_failed(field: &str, err: &DataError) -> DocumentError {
    DocumentError::Syntax {
        field: Some(field.to_owned()),
        kind: err.kind(),
        message: err.to_string(),
    }
}

impl Schema {
    /// Reads an instance from a JSON object.
    ///
    /// For each field in declaration order: a member with the field's name
    /// is decoded by the field type; a missing member takes the field's
    /// static or computed default; a missing required field is an error.
    ///
    /// # Errors
    /// Every failure is a [`DocumentError`]:
    /// - `NotAnObject` if `document` is not an object;
    /// - `MissingField` for an absent required field;
    /// - `Syntax` for a decode failure or a failing computed default,
    ///   carrying the original failure's kind and message.
    pub fn read_document<'s>(&'s self, document: &Json) -> Result<Instance<'s>, DataError> {
        let object = document
            .as_object()
            .ok_or_else(|| DocumentError::NotAnObject(json_type_name(document)))?;

        let mut instance = Instance::new(self);
        for field in self.fields() {
            let name = field.name();
            let value = match object.get(name) {
                Some(node) => Some(
                    field
                        .ty()
                        .decode_document(node)
                        .map_err(|e| DocumentError::syntax(name, &e))?,
                ),
                None if matches!(field.policy(), DefaultPolicy::Required) => {
                    return Err(DocumentError::MissingField(name.to_owned()).into());
                }
                None => {
                    let value = field
                        .resolve_default(&instance)
                        .map_err(|e| default_failed(name, &e))?;
                    tracing::trace!(field = name, present = value.is_some(), "default resolved");
                    value
                }
            };
            instance.set_value(name, value);
        }
        Ok(instance)
    }

    /// Parses `text` as JSON, then reads it like
    /// [`read_document`](Self::read_document).
    pub fn read_document_str<'s>(&'s self, text: &str) -> Result<Instance<'s>, DataError> {
        let document: Json =
            serde_json::from_str(text).map_err(|e| DocumentError::Syntax {
                field: None,
                kind: "json",
                message: e.to_string(),
            })?;
        self.read_document(&document)
    }

    /// Writes an instance as a JSON object.
    ///
    /// Empty presence-optional fields are omitted, so reading the output
    /// back yields the same instance. Every other field must be resolved.
    ///
    /// # Errors
    /// - `Unresolved` if a field that is not presence-optional is unset
    ///   or empty.
    /// - `Encode` if a field type cannot write the stored value.
    pub fn write_document(&self, instance: &Instance<'_>) -> Result<Json, DataError> {
        let mut object = Map::new();
        for field in self.fields() {
            let name = field.name();
            let value = match instance.entry(name).flatten() {
                Some(value) => value,
                None if field.is_presence_optional() => continue,
                None => return Err(DataError::Unresolved(name.to_owned())),
            };
            let node = field
                .ty()
                .encode_document(value)
                .map_err(|e| DataError::encode(name, e))?;
            object.insert(name.to_owned(), node);
        }
        Ok(Json::Object(object))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{TestInt, TestText};
    use crate::{Schema, Value};

    fn doubling_schema() -> Schema {
        Schema::builder()
            .add("a", TestInt)
            .add_default("b", TestInt, 5)
            .add_computed("c", TestInt, |data| Ok(data.get_int("a")? * 2))
            .build()
    }

    #[test]
    fn test_defaults_resolve_in_declaration_order() {
        let schema = doubling_schema();
        let instance = schema.read_document(&json!({ "a": 3 })).unwrap();
        assert_eq!(instance.get_int("a").unwrap(), 3);
        assert_eq!(instance.get_int("b").unwrap(), 5);
        assert_eq!(instance.get_int("c").unwrap(), 6);
    }

    #[test]
    fn test_explicit_members_override_defaults() {
        let schema = doubling_schema();
        let instance = schema
            .read_document(&json!({ "a": 3, "b": 1, "c": 100 }))
            .unwrap();
        assert_eq!(instance.get_int("b").unwrap(), 1);
        assert_eq!(instance.get_int("c").unwrap(), 100);
    }

    #[test]
    fn test_missing_required_field_is_named() {
        let schema = doubling_schema();
        let err = schema.read_document(&json!({})).unwrap_err();
        assert!(matches!(
            err,
            DataError::Document(DocumentError::MissingField(ref n)) if n == "a"
        ));
    }

    #[test]
    fn test_missing_optional_field_resolves_empty() {
        let schema = Schema::builder().add_optional("note", TestText).build();
        let instance = schema.read_document(&json!({})).unwrap();
        assert!(instance.contains("note"));
        assert!(!instance.is_present("note"));
    }

    #[test]
    fn test_decode_failure_is_normalized() {
        let schema = doubling_schema();
        let err = schema.read_document(&json!({ "a": "three" })).unwrap_err();
        match err {
            DataError::Document(DocumentError::Syntax { field, kind, message }) => {
                assert_eq!(field.as_deref(), Some("a"));
                assert_eq!(kind, "wrong_shape");
                assert_eq!(message, "expected number, found string");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_object_document_is_rejected() {
        let schema = doubling_schema();
        let err = schema.read_document(&json!([1, 2])).unwrap_err();
        assert!(matches!(
            err,
            DataError::Document(DocumentError::NotAnObject("array"))
        ));
    }

    #[test]
    fn test_forward_reference_in_computed_default_fails() {
        let schema = Schema::builder()
            .add_computed("early", TestInt, |data| data.get_int("late"))
            .add("late", TestInt)
            .build();
        let err = schema.read_document(&json!({ "late": 1 })).unwrap_err();
        match err {
            DataError::Document(DocumentError::Syntax { field, kind, .. }) => {
                assert_eq!(field.as_deref(), Some("early"));
                assert_eq!(kind, "forward_reference");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_presence_of_later_field_is_a_forward_reference() {
        let schema = Schema::builder()
            .add_computed("has_late", TestInt, |data| {
                Ok(if data.try_is_present("late")? { 1 } else { 0 })
            })
            .add_optional("late", TestText)
            .build();
        let err = schema
            .read_document(&json!({ "late": "set" }))
            .unwrap_err();
        match err {
            DataError::Document(DocumentError::Syntax { field, kind, .. }) => {
                assert_eq!(field.as_deref(), Some("has_late"));
                assert_eq!(kind, "forward_reference");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_computed_default_may_test_earlier_presence() {
        let schema = Schema::builder()
            .add_optional("early", TestText)
            .add_computed("has_early", TestInt, |data| {
                Ok(if data.try_is_present("early")? { 1 } else { 0 })
            })
            .build();
        let with = schema.read_document(&json!({ "early": "x" })).unwrap();
        assert_eq!(with.get_int("has_early").unwrap(), 1);
        let without = schema.read_document(&json!({})).unwrap();
        assert_eq!(without.get_int("has_early").unwrap(), 0);
    }

    #[test]
    fn test_computed_default_of_wrong_kind_fails() {
        let schema = Schema::builder()
            .add_computed("n", TestInt, |_| Ok("text"))
            .build();
        let err = schema.read_document(&json!({})).unwrap_err();
        assert!(matches!(
            err,
            DataError::Document(DocumentError::Syntax { kind: "type_mismatch", .. })
        ));
    }

    #[test]
    fn test_malformed_json_text_is_a_syntax_error() {
        let schema = doubling_schema();
        let err = schema.read_document_str("{\"a\": ").unwrap_err();
        assert!(matches!(
            err,
            DataError::Document(DocumentError::Syntax { field: None, kind: "json", .. })
        ));
        assert!(schema.read_document_str(r#"{"a": 2}"#).is_ok());
    }

    #[test]
    fn test_write_document_omits_empty_optional() {
        let schema = Schema::builder()
            .add("a", TestInt)
            .add_optional("note", TestText)
            .build();
        let mut instance = schema.instance();
        instance.set("a", 4).set_empty("note");

        let doc = schema.write_document(&instance).unwrap();
        assert_eq!(doc, json!({ "a": 4 }));
        assert_eq!(schema.read_document(&doc).unwrap(), instance);
    }

    #[test]
    fn test_write_document_requires_resolved_fields() {
        let schema = doubling_schema();
        let instance = schema.instance().with("a", 1);
        let err = schema.write_document(&instance).unwrap_err();
        assert!(matches!(err, DataError::Unresolved(ref n) if n == "b"));
    }

    #[test]
    fn test_document_then_binary_round_trip() {
        let schema = doubling_schema();
        let from_doc = schema.read_document(&json!({ "a": 10 })).unwrap();
        let bytes = schema.to_bytes(&from_doc).unwrap();
        let from_wire = schema.from_bytes(&bytes).unwrap();
        assert_eq!(from_wire, from_doc);
        assert_eq!(from_wire.get("c").unwrap(), Some(&Value::Int(20)));
    }
}
