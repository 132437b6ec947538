//! Schema definitions and the builder that assembles them.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    DataError, DefaultPolicy, EarlierFields, FieldSpec, FieldType, Instance, SchemaError, Value,
};

/// Anything that can be stored as a field's type handle.
///
/// Lets the builder accept both a concrete type (`IntType`) and an
/// already-shared `Arc<dyn FieldType>`.
pub trait IntoFieldType {
    fn into_field_type(self) -> Arc<dyn FieldType>;
}

impl<T: FieldType + 'static> IntoFieldType for T {
    fn into_field_type(self) -> Arc<dyn FieldType> {
        Arc::new(self)
    }
}

impl IntoFieldType for Arc<dyn FieldType> {
    fn into_field_type(self) -> Arc<dyn FieldType> {
        self
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// An ordered, immutable set of field declarations.
///
/// Declaration order is the binary wire order, and the order in which
/// computed defaults may read earlier fields. Two schemas are
/// wire-compatible only if they declare the same fields, with the same
/// types and policies, in the same order.
///
/// A schema is `Send + Sync` and is meant to be built once and shared,
/// usually as an `Arc<Schema>` held by a registry.
#[derive(Debug, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Starts declaring a new schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.position(name).map(|i| &self.fields[i])
    }

    /// Declaration index of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldSpec::name)
    }

    /// Creates an empty instance of this schema.
    pub fn instance(&self) -> Instance<'_> {
        Instance::new(self)
    }

    fn insert(&mut self, spec: FieldSpec) -> Result<(), SchemaError> {
        if self.index.contains_key(spec.name()) {
            return Err(SchemaError::DuplicateField(spec.name().to_owned()));
        }
        self.index.insert(spec.name().to_owned(), self.fields.len());
        self.fields.push(spec);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SchemaBuilder
// ---------------------------------------------------------------------------

/// Builder for [`Schema`].
///
/// The `add*` methods treat a bad declaration (duplicate name, default of
/// the wrong kind) as a programmer error and panic. Use
/// [`try_add`](Self::try_add) when the declarations come from data.
///
/// ```rust,ignore
/// let schema = Schema::builder()
///     .add("a", IntType)
///     .add_default("b", IntType, 5)
///     .add_computed("c", IntType, |data| Ok(data.get_int("a")? * 2))
///     .add_optional("icon", IdentifierType)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    #[track_caller]
    fn push(
        mut self,
        name: impl Into<String>,
        ty: impl IntoFieldType,
        policy: DefaultPolicy,
    ) -> Self {
        let result = FieldSpec::new(name, ty.into_field_type(), policy)
            .and_then(|spec| self.schema.insert(spec));
        if let Err(e) = result {
            panic!("invalid schema declaration: {e}");
        }
        self
    }

    /// Declares a required field.
    ///
    /// # Panics
    /// If `name` is already declared.
    #[track_caller]
    pub fn add(self, name: impl Into<String>, ty: impl IntoFieldType) -> Self {
        self.push(name, ty, DefaultPolicy::Required)
    }

    /// Declares a field with a fixed default value.
    ///
    /// # Panics
    /// If `name` is already declared, or `default` is not the kind of
    /// value `ty` produces.
    #[track_caller]
    pub fn add_default(
        self,
        name: impl Into<String>,
        ty: impl IntoFieldType,
        default: impl Into<Value>,
    ) -> Self {
        self.push(name, ty, DefaultPolicy::Static(Some(default.into())))
    }

    /// Declares a presence-optional field: its default is "no value",
    /// and the binary codec writes a presence flag for it.
    ///
    /// # Panics
    /// If `name` is already declared.
    #[track_caller]
    pub fn add_optional(self, name: impl Into<String>, ty: impl IntoFieldType) -> Self {
        self.push(name, ty, DefaultPolicy::Static(None))
    }

    /// Declares a field whose default is computed from earlier fields.
    ///
    /// `compute` receives a view of the instance as resolved so far. It
    /// may only read fields declared before this one; reading or testing
    /// the presence of a later field fails with
    /// [`DataError::ForwardReference`].
    ///
    /// # Panics
    /// If `name` is already declared.
    #[track_caller]
    pub fn add_computed<F, V>(
        self,
        name: impl Into<String>,
        ty: impl IntoFieldType,
        compute: F,
    ) -> Self
    where
        F: Fn(&EarlierFields<'_, '_>) -> Result<V, DataError> + Send + Sync + 'static,
        V: Into<Value>,
    {
        let compute = move |data: &EarlierFields<'_, '_>| -> Result<Value, DataError> {
            compute(data).map(Into::into)
        };
        self.push(name, ty, DefaultPolicy::Computed(Arc::new(compute)))
    }

    /// Declares a field from a prepared spec, without panicking.
    pub fn try_add(mut self, spec: FieldSpec) -> Result<Self, SchemaError> {
        self.schema.insert(spec)?;
        Ok(self)
    }

    /// Finishes the schema.
    pub fn build(self) -> Schema {
        self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestInt, TestText};

    #[test]
    fn test_builder_preserves_declaration_order() {
        let schema = Schema::builder()
            .add("zeta", TestInt)
            .add_default("alpha", TestInt, 1)
            .add_optional("mid", TestText)
            .build();

        let names: Vec<_> = schema.names().collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(schema.position("mid"), Some(2));
        assert_eq!(schema.len(), 3);
        assert!(schema.contains("alpha"));
        assert!(!schema.contains("omega"));
    }

    #[test]
    #[should_panic(expected = "duplicate field `a`")]
    fn test_duplicate_field_panics_even_with_different_type() {
        let _ = Schema::builder().add("a", TestInt).add("a", TestText);
    }

    #[test]
    #[should_panic(expected = "duplicate field `a`")]
    fn test_duplicate_field_panics_across_policies() {
        let _ = Schema::builder()
            .add_optional("a", TestInt)
            .add_computed("a", TestInt, |_| Ok(1));
    }

    #[test]
    fn test_try_add_reports_duplicate() {
        let spec = |name: &str| {
            FieldSpec::new(name, Arc::new(TestInt), DefaultPolicy::Required).unwrap()
        };
        let builder = Schema::builder().try_add(spec("a")).unwrap();
        let err = builder.try_add(spec("a")).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField("a".into()));
    }

    #[test]
    #[should_panic(expected = "default for field `n`")]
    fn test_default_of_wrong_kind_panics() {
        let _ = Schema::builder().add_default("n", TestInt, "five");
    }

    #[test]
    fn test_presence_optional_only_for_static_none() {
        let schema = Schema::builder()
            .add("required", TestInt)
            .add_default("fixed", TestInt, 3)
            .add_optional("maybe", TestInt)
            .add_computed("derived", TestInt, |d| d.get_int("fixed"))
            .build();

        let optional: Vec<_> = schema
            .fields()
            .iter()
            .map(|f| (f.name(), f.is_presence_optional(), f.has_default()))
            .collect();
        assert_eq!(
            optional,
            [
                ("required", false, false),
                ("fixed", false, true),
                ("maybe", true, true),
                ("derived", false, true),
            ]
        );
    }

    #[test]
    fn test_shared_type_handle_is_accepted() {
        let shared: Arc<dyn FieldType> = Arc::new(TestInt);
        let schema = Schema::builder()
            .add("a", shared.clone())
            .add("b", shared)
            .build();
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_required_field_has_no_default() {
        let schema = Schema::builder().add("a", TestInt).build();
        let instance = schema.instance();
        let err = schema.fields()[0].resolve_default(&instance).unwrap_err();
        assert!(matches!(
            err,
            DataError::Schema(SchemaError::NoDefault(ref name)) if name == "a"
        ));
    }

    #[test]
    fn test_schema_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }
}
