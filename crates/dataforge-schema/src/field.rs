//! The field type contract and per-field declarations.

use std::fmt;
use std::sync::Arc;

use dataforge_stream::{PacketReader, PacketWriter};

use crate::{DataError, EarlierFields, FieldError, Instance, SchemaError, Value, ValueKind};

// ---------------------------------------------------------------------------
// FieldType: the pluggable per-type codec
// ---------------------------------------------------------------------------

/// Encodes and decodes one kind of value, in both formats.
///
/// The schema never inspects concrete types; it only calls these
/// methods. Implementations must be `Send + Sync` because a schema is
/// shared read-only across threads.
///
/// Binary encodings must be self-delimiting: the binary codec writes no
/// lengths or tags around a field's bytes.
pub trait FieldType: fmt::Debug + Send + Sync {
    /// The [`Value`] arm this type produces and accepts.
    fn kind(&self) -> ValueKind;

    /// Appends `value` to the packet.
    ///
    /// # Errors
    /// `FieldError::Mismatch` if `value` is not of [`Self::kind`];
    /// `FieldError::Stream` if the writer rejects it (e.g. too long).
    fn encode_binary(&self, out: &mut PacketWriter, value: &Value) -> Result<(), FieldError>;

    /// Reads one value from the front of the packet.
    fn decode_binary(&self, input: &mut PacketReader<'_>) -> Result<Value, FieldError>;

    /// Converts a JSON node into a value.
    fn decode_document(&self, node: &serde_json::Value) -> Result<Value, FieldError>;

    /// Converts a value into a JSON node.
    ///
    /// Optional for implementors; the default reports `Unsupported`.
    fn encode_document(&self, value: &Value) -> Result<serde_json::Value, FieldError> {
        let _ = value;
        Err(FieldError::Unsupported("document encoding"))
    }

    /// Checks that `value` is something this type can encode.
    ///
    /// Used on static defaults when a schema is declared. The default
    /// only compares the top-level kind; container types also check
    /// their contents.
    fn check(&self, value: &Value) -> Result<(), FieldError> {
        expect_kind(self.kind(), value)
    }
}

/// Checks that `value` is of `expected` kind, for use in encoders.
pub fn expect_kind(expected: ValueKind, value: &Value) -> Result<(), FieldError> {
    if value.kind() == expected {
        Ok(())
    } else {
        Err(FieldError::Mismatch {
            expected,
            found: value.kind(),
        })
    }
}

// ---------------------------------------------------------------------------
// DefaultPolicy
// ---------------------------------------------------------------------------

/// A computed default: reads earlier fields of the instance being
/// resolved and produces this field's value.
pub type ComputeFn =
    Arc<dyn Fn(&EarlierFields<'_, '_>) -> Result<Value, DataError> + Send + Sync>;

/// What a field resolves to when a document omits it.
#[derive(Clone)]
pub enum DefaultPolicy {
    /// No default. Omission is a document error.
    Required,

    /// A fixed default. `Static(None)` makes the field presence-optional:
    /// it may legitimately hold no value, and the binary codec writes a
    /// presence flag for it.
    Static(Option<Value>),

    /// A default derived from fields declared earlier in the schema.
    Computed(ComputeFn),
}

impl fmt::Debug for DefaultPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("Required"),
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldSpec
// ---------------------------------------------------------------------------

/// One schema entry: name, type, and default policy.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    ty: Arc<dyn FieldType>,
    policy: DefaultPolicy,
}

impl FieldSpec {
    /// Creates a spec, checking that a static default is a value the type
    /// can encode, contents included.
    pub fn new(
        name: impl Into<String>,
        ty: Arc<dyn FieldType>,
        policy: DefaultPolicy,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if let DefaultPolicy::Static(Some(value)) = &policy {
            if value.kind() != ty.kind() {
                return Err(SchemaError::DefaultKindMismatch {
                    field: name,
                    expected: ty.kind(),
                    found: value.kind(),
                });
            }
            if let Err(e) = ty.check(value) {
                return Err(SchemaError::InvalidDefault {
                    field: name,
                    message: e.to_string(),
                });
            }
        }
        Ok(Self { name, ty, policy })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &dyn FieldType {
        self.ty.as_ref()
    }

    pub fn policy(&self) -> &DefaultPolicy {
        &self.policy
    }

    /// `true` only for `Static(None)`. A computed default never makes a
    /// field presence-optional.
    pub fn is_presence_optional(&self) -> bool {
        matches!(self.policy, DefaultPolicy::Static(None))
    }

    /// `true` for any static or computed default.
    pub fn has_default(&self) -> bool {
        !matches!(self.policy, DefaultPolicy::Required)
    }

    /// Resolves this field's default against `instance`.
    ///
    /// A compute function sees only the fields declared before this one
    /// in the instance's schema.
    ///
    /// # Errors
    /// `SchemaError::NoDefault` for a required field; whatever the
    /// compute function returns for a computed one, or `TypeMismatch`
    /// if it returns the wrong kind of value.
    pub fn resolve_default(&self, instance: &Instance<'_>) -> Result<Option<Value>, DataError> {
        match &self.policy {
            DefaultPolicy::Required => Err(SchemaError::NoDefault(self.name.clone()).into()),
            DefaultPolicy::Static(value) => Ok(value.clone()),
            DefaultPolicy::Computed(compute) => {
                let cursor = instance.schema().position(&self.name);
                let value = compute(&EarlierFields::new(instance, cursor))?;
                if value.kind() != self.ty.kind() {
                    return Err(DataError::TypeMismatch {
                        field: self.name.clone(),
                        expected: self.ty.kind(),
                        found: value.kind(),
                    });
                }
                Ok(Some(value))
            }
        }
    }
}
