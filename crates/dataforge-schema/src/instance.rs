//! The per-record value store.

use std::collections::HashMap;
use std::fmt;

use crate::{
    AttributeModifier, DataError, FromValue, Identifier, Record, Schema, Value,
};

/// A set of field values conforming to a [`Schema`].
///
/// Each entry is either `Some(value)` or, for presence-optional fields,
/// `None` (present but empty). A name with no entry at all is *unset*,
/// which is different from empty: accessors report it as
/// [`DataError::UnsetField`] and never substitute a default. Defaults
/// are applied only by the document codec.
///
/// Setters do not type-check. Reading a field back with the accessor
/// for a different kind fails with [`DataError::TypeMismatch`].
pub struct Instance<'s> {
    schema: &'s Schema,
    values: HashMap<String, Option<Value>>,
}

impl<'s> Instance<'s> {
    /// Creates an empty instance. Same as [`Schema::instance`].
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            values: HashMap::with_capacity(schema.len()),
        }
    }

    /// Rebuilds an instance from a nested [`Record`].
    pub fn from_record(schema: &'s Schema, record: Record) -> Self {
        let mut instance = Self::new(schema);
        for (name, value) in record {
            instance.values.insert(name, value);
        }
        instance
    }

    /// Moves the entries out into a [`Record`], in schema order.
    ///
    /// Entries for names the schema does not declare follow, sorted by
    /// name so the result is deterministic.
    pub fn into_record(mut self) -> Record {
        let mut record = Record::new();
        for name in self.schema.names() {
            if let Some(value) = self.values.remove(name) {
                record.insert(name, value);
            }
        }
        let mut extra: Vec<_> = self.values.into_iter().collect();
        extra.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, value) in extra {
            record.insert(name, value);
        }
        record
    }

    /// The schema this instance conforms to.
    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    // -- Setters --------------------------------------------------------

    /// Stores a value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(name.into(), Some(value.into()));
        self
    }

    /// Stores the empty sentinel.
    pub fn set_empty(&mut self, name: impl Into<String>) -> &mut Self {
        self.values.insert(name.into(), None);
        self
    }

    /// Stores a value or the empty sentinel.
    pub fn set_value(&mut self, name: impl Into<String>, value: Option<Value>) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// By-value [`set`](Self::set), for building an instance in one
    /// expression.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Removes an entry, making the field unset again.
    pub fn remove(&mut self, name: &str) -> Option<Option<Value>> {
        self.values.remove(name)
    }

    // -- Queries ----------------------------------------------------------

    /// `true` if the instance has an entry for `name` (possibly empty).
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the field holds a value.
    ///
    /// Only presence-optional fields can be absent; for every other name
    /// this is `true`, since a resolved instance is assumed to have a
    /// value for them.
    pub fn is_present(&self, name: &str) -> bool {
        match self.schema.field(name) {
            Some(field) if field.is_presence_optional() => {
                matches!(self.values.get(name), Some(Some(_)))
            }
            _ => true,
        }
    }

    /// Returns the raw entry without the unset check, for the codecs.
    pub(crate) fn entry(&self, name: &str) -> Option<Option<&Value>> {
        self.values.get(name).map(Option::as_ref)
    }

    /// Returns the entry for `name`: `Ok(None)` if it is empty.
    ///
    /// # Errors
    /// `UnsetField` if there is no entry.
    pub fn get(&self, name: &str) -> Result<Option<&Value>, DataError> {
        self.values
            .get(name)
            .map(Option::as_ref)
            .ok_or_else(|| DataError::UnsetField(name.to_owned()))
    }

    /// Reads a field as `T`, treating an empty entry as an error.
    pub fn get_as<'a, T: FromValue<'a>>(&'a self, name: &str) -> Result<T, DataError> {
        self.get_optional(name)?
            .ok_or_else(|| DataError::EmptyField(name.to_owned()))
    }

    /// Reads a field as `T`, returning `Ok(None)` for an empty entry.
    pub fn get_optional<'a, T: FromValue<'a>>(
        &'a self,
        name: &str,
    ) -> Result<Option<T>, DataError> {
        match self.get(name)? {
            None => Ok(None),
            Some(value) => T::from_value(value).map(Some).map_err(|found| {
                DataError::TypeMismatch {
                    field: name.to_owned(),
                    expected: T::KIND,
                    found,
                }
            }),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<i32, DataError> {
        self.get_as(name)
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, DataError> {
        self.get_as(name)
    }

    pub fn get_float(&self, name: &str) -> Result<f32, DataError> {
        self.get_as(name)
    }

    pub fn get_double(&self, name: &str) -> Result<f64, DataError> {
        self.get_as(name)
    }

    pub fn get_string(&self, name: &str) -> Result<&str, DataError> {
        self.get_as(name)
    }

    pub fn get_identifier(&self, name: &str) -> Result<&Identifier, DataError> {
        self.get_as(name)
    }

    pub fn get_modifier(&self, name: &str) -> Result<&AttributeModifier, DataError> {
        self.get_as(name)
    }

    pub fn get_list(&self, name: &str) -> Result<&[Value], DataError> {
        self.get_as(name)
    }

    pub fn get_record(&self, name: &str) -> Result<&Record, DataError> {
        self.get_as(name)
    }
}

// ---------------------------------------------------------------------------
// EarlierFields: what a computed default may see
// ---------------------------------------------------------------------------

/// Read-only view of an instance handed to a computed default.
///
/// Only fields declared before the one being resolved are visible. Every
/// accessor, presence checks included, fails with
/// [`DataError::ForwardReference`] for a field at or after the cursor.
/// Names the schema does not declare are not restricted.
#[derive(Clone, Copy)]
pub struct EarlierFields<'a, 's> {
    instance: &'a Instance<'s>,
    cursor: Option<usize>,
}

impl<'a, 's> EarlierFields<'a, 's> {
    /// `cursor` is the declaration index of the field being resolved;
    /// `None` leaves every field visible.
    pub(crate) fn new(instance: &'a Instance<'s>, cursor: Option<usize>) -> Self {
        Self { instance, cursor }
    }

    fn check(&self, name: &str) -> Result<(), DataError> {
        let Some(cursor) = self.cursor else {
            return Ok(());
        };
        match self.instance.schema.position(name) {
            Some(position) if position >= cursor => {
                Err(DataError::ForwardReference(name.to_owned()))
            }
            _ => Ok(()),
        }
    }

    /// The schema being resolved.
    pub fn schema(&self) -> &'s Schema {
        self.instance.schema
    }

    /// Fallible [`Instance::is_present`].
    pub fn try_is_present(&self, name: &str) -> Result<bool, DataError> {
        self.check(name)?;
        Ok(self.instance.is_present(name))
    }

    /// Fallible [`Instance::contains`].
    pub fn try_contains(&self, name: &str) -> Result<bool, DataError> {
        self.check(name)?;
        Ok(self.instance.contains(name))
    }

    pub fn get(&self, name: &str) -> Result<Option<&'a Value>, DataError> {
        self.check(name)?;
        self.instance.get(name)
    }

    pub fn get_as<T: FromValue<'a>>(&self, name: &str) -> Result<T, DataError> {
        self.check(name)?;
        self.instance.get_as(name)
    }

    pub fn get_optional<T: FromValue<'a>>(&self, name: &str) -> Result<Option<T>, DataError> {
        self.check(name)?;
        self.instance.get_optional(name)
    }

    pub fn get_int(&self, name: &str) -> Result<i32, DataError> {
        self.get_as(name)
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, DataError> {
        self.get_as(name)
    }

    pub fn get_float(&self, name: &str) -> Result<f32, DataError> {
        self.get_as(name)
    }

    pub fn get_double(&self, name: &str) -> Result<f64, DataError> {
        self.get_as(name)
    }

    pub fn get_string(&self, name: &str) -> Result<&'a str, DataError> {
        self.get_as(name)
    }

    pub fn get_identifier(&self, name: &str) -> Result<&'a Identifier, DataError> {
        self.get_as(name)
    }

    pub fn get_modifier(&self, name: &str) -> Result<&'a AttributeModifier, DataError> {
        self.get_as(name)
    }

    pub fn get_list(&self, name: &str) -> Result<&'a [Value], DataError> {
        self.get_as(name)
    }

    pub fn get_record(&self, name: &str) -> Result<&'a Record, DataError> {
        self.get_as(name)
    }
}

impl fmt::Debug for EarlierFields<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EarlierFields")
            .field("cursor", &self.cursor)
            .field("instance", self.instance)
            .finish()
    }
}

impl PartialEq for Instance<'_> {
    /// Equal when bound to the same schema and holding the same entries.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.values == other.values
    }
}

impl fmt::Debug for Instance<'_> {
    /// Prints declared fields in schema order, then any extra entries.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for name in self.schema.names() {
            if let Some(value) = self.values.get(name) {
                map.entry(&name, value);
            }
        }
        for (name, value) in &self.values {
            if !self.schema.contains(name) {
                map.entry(name, value);
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestInt, TestText};
    use crate::ValueKind;

    fn schema() -> Schema {
        Schema::builder()
            .add("count", TestInt)
            .add("label", TestText)
            .add_optional("note", TestText)
            .add_default("weight", TestInt, 1)
            .build()
    }

    #[test]
    fn test_get_unset_field_fails_even_with_default() {
        let schema = schema();
        let instance = schema.instance();
        // `weight` declares a default, but plain accessors never apply it.
        let err = instance.get_int("weight").unwrap_err();
        assert!(matches!(err, DataError::UnsetField(ref n) if n == "weight"));
        assert!(matches!(instance.get("x"), Err(DataError::UnsetField(_))));
    }

    #[test]
    fn test_typed_getter_rejects_other_kind() {
        let schema = schema();
        let mut instance = schema.instance();
        instance.set("label", 42);

        let err = instance.get_string("label").unwrap_err();
        assert!(matches!(
            err,
            DataError::TypeMismatch {
                ref field,
                expected: ValueKind::String,
                found: ValueKind::Int,
            } if field == "label"
        ));
        // The raw accessor still sees the value.
        assert_eq!(instance.get("label").unwrap(), Some(&Value::Int(42)));
    }

    #[test]
    fn test_empty_entry_is_distinct_from_unset() {
        let schema = schema();
        let mut instance = schema.instance();
        instance.set_empty("note");

        assert!(instance.contains("note"));
        assert_eq!(instance.get("note").unwrap(), None);
        assert!(matches!(
            instance.get_string("note"),
            Err(DataError::EmptyField(_))
        ));
        assert_eq!(instance.get_optional::<&str>("note").unwrap(), None);
    }

    #[test]
    fn test_is_present_only_tracks_presence_optional_fields() {
        let schema = schema();
        let mut instance = schema.instance();
        assert!(!instance.is_present("note"));
        // Non-optional and undeclared names always report present.
        assert!(instance.is_present("count"));
        assert!(instance.is_present("undeclared"));

        instance.set("note", "hello");
        assert!(instance.is_present("note"));
        instance.set_empty("note");
        assert!(!instance.is_present("note"));
    }

    #[test]
    fn test_with_builds_in_one_expression() {
        let schema = schema();
        let instance = schema
            .instance()
            .with("count", 3)
            .with("label", "three");
        assert_eq!(instance.get_int("count").unwrap(), 3);
        assert_eq!(instance.get_string("label").unwrap(), "three");
        assert_eq!(instance.len(), 2);
    }

    #[test]
    fn test_record_conversion_keeps_schema_order() {
        let schema = schema();
        let mut instance = schema.instance();
        instance.set("weight", 2).set_empty("note").set("count", 1);

        let record = instance.into_record();
        let names: Vec<_> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["count", "note", "weight"]);

        let back = Instance::from_record(&schema, record);
        assert_eq!(back.get_int("weight").unwrap(), 2);
        assert_eq!(back.get("note").unwrap(), None);
    }

    #[test]
    fn test_equality_requires_same_schema() {
        let a = schema();
        let b = schema();
        let x = a.instance().with("count", 1);
        let y = a.instance().with("count", 1);
        let z = b.instance().with("count", 1);
        assert_eq!(x, y);
        assert_ne!(x, z);
    }

    #[test]
    fn test_forward_reference_is_detected_while_resolving() {
        let schema = schema();
        let mut instance = schema.instance();
        instance.set("count", 1);
        let earlier = EarlierFields::new(&instance, Some(1));

        assert_eq!(earlier.get_int("count").unwrap(), 1);
        assert!(matches!(
            earlier.get("label"),
            Err(DataError::ForwardReference(ref n)) if n == "label"
        ));
        assert!(matches!(
            earlier.get("weight"),
            Err(DataError::ForwardReference(_))
        ));
    }

    #[test]
    fn test_presence_checks_respect_the_cursor() {
        let schema = schema();
        let mut instance = schema.instance();
        instance.set("count", 1).set("note", "later");
        let earlier = EarlierFields::new(&instance, Some(2));

        assert!(earlier.try_contains("count").unwrap());
        assert!(earlier.try_is_present("label").unwrap());
        // `note` sits at the cursor: its stored entry must not leak through.
        assert!(matches!(
            earlier.try_is_present("note"),
            Err(DataError::ForwardReference(ref n)) if n == "note"
        ));
        assert!(matches!(
            earlier.try_contains("weight"),
            Err(DataError::ForwardReference(_))
        ));
        assert!(earlier.try_contains("undeclared").is_ok());

        let unrestricted = EarlierFields::new(&instance, None);
        assert!(unrestricted.try_is_present("note").unwrap());
    }
}
