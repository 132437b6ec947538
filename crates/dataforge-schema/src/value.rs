//! The closed set of values an [`Instance`](crate::Instance) can hold.
//!
//! Every field type produces one of the [`Value`] arms. Reading a value
//! back is a `match` that either yields the expected Rust type or reports
//! which [`ValueKind`] was actually stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifier
// ---------------------------------------------------------------------------

/// Namespace used when an identifier is written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// A namespaced identifier such as `origins:elytra`.
///
/// Serializes as its `namespace:path` string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    namespace: String,
    path: String,
}

/// Why a string could not be parsed as an [`Identifier`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("identifier namespace `{0}` contains invalid characters")]
    InvalidNamespace(String),

    #[error("identifier path `{0}` contains invalid characters")]
    InvalidPath(String),
}

fn valid_namespace(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'_' | b'.' | b'-')
        })
}

fn valid_path(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_lowercase()
                || b.is_ascii_digit()
                || matches!(b, b'_' | b'.' | b'-' | b'/')
        })
}

impl Identifier {
    /// Builds an identifier from its two parts, validating both.
    pub fn new(
        namespace: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<Self, IdentifierError> {
        let namespace = namespace.into();
        let path = path.into();
        if !valid_namespace(&namespace) {
            return Err(IdentifierError::InvalidNamespace(namespace));
        }
        if !valid_path(&path) {
            return Err(IdentifierError::InvalidPath(path));
        }
        Ok(Self { namespace, path })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    /// Parses `namespace:path`, or a bare `path` in [`DEFAULT_NAMESPACE`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, s),
        }
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.to_string()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

// ---------------------------------------------------------------------------
// AttributeModifier
// ---------------------------------------------------------------------------

/// How an [`AttributeModifier`] combines with an attribute's base value.
///
/// The discriminants are the wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Addition = 0,
    MultiplyBase = 1,
    MultiplyTotal = 2,
}

impl Operation {
    /// Looks an operation up by its wire ordinal.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Addition),
            1 => Some(Self::MultiplyBase),
            2 => Some(Self::MultiplyTotal),
            _ => None,
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// The lowercase name used in documents.
    pub fn name(self) -> &'static str {
        match self {
            Self::Addition => "addition",
            Self::MultiplyBase => "multiply_base",
            Self::MultiplyTotal => "multiply_total",
        }
    }
}

impl FromStr for Operation {
    type Err = String;

    /// Case-insensitive, so `"ADDITION"` and `"addition"` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "addition" => Ok(Self::Addition),
            "multiply_base" => Ok(Self::MultiplyBase),
            "multiply_total" => Ok(Self::MultiplyTotal),
            _ => Err(format!("unknown attribute modifier operation `{s}`")),
        }
    }
}

/// A named adjustment applied to an entity attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeModifier {
    pub name: String,
    pub amount: f64,
    pub operation: Operation,
}

// ---------------------------------------------------------------------------
// Record: a nested instance detached from its schema
// ---------------------------------------------------------------------------

/// The owned contents of a nested instance.
///
/// Entries keep the nested schema's declaration order. An entry of
/// `None` is an empty presence-optional field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(String, Option<Value>)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, replacing an existing entry of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<Value>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Returns the entry for `name`: `None` if there is no entry,
    /// `Some(None)` if the entry is empty.
    pub fn get(&self, name: &str) -> Option<Option<&Value>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_ref()))
    }
}

impl IntoIterator for Record {
    type Item = (String, Option<Value>);
    type IntoIter = std::vec::IntoIter<(String, Option<Value>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// Names the arms of [`Value`], for error messages and type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Bool,
    Float,
    Double,
    String,
    Identifier,
    AttributeModifier,
    List,
    Record,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Identifier => "identifier",
            Self::AttributeModifier => "attribute_modifier",
            Self::List => "list",
            Self::Record => "record",
        };
        f.write_str(name)
    }
}

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Bool(bool),
    Float(f32),
    Double(f64),
    String(String),
    Identifier(Identifier),
    AttributeModifier(AttributeModifier),
    List(Vec<Value>),
    Record(Record),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Bool(_) => ValueKind::Bool,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::String(_) => ValueKind::String,
            Self::Identifier(_) => ValueKind::Identifier,
            Self::AttributeModifier(_) => ValueKind::AttributeModifier,
            Self::List(_) => ValueKind::List,
            Self::Record(_) => ValueKind::Record,
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $arm:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$arm(v)
                }
            }
        )*
    };
}

impl_from_for_value! {
    i32 => Int,
    bool => Bool,
    f32 => Float,
    f64 => Double,
    String => String,
    Identifier => Identifier,
    AttributeModifier => AttributeModifier,
    Vec<Value> => List,
    Record => Record,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

// ---------------------------------------------------------------------------
// FromValue: typed extraction
// ---------------------------------------------------------------------------

/// Extracts a Rust type from a borrowed [`Value`].
///
/// On mismatch, returns the kind that was actually stored so the caller
/// can build a `TypeMismatch` error.
pub trait FromValue<'a>: Sized {
    /// The kind this type is extracted from.
    const KIND: ValueKind;

    fn from_value(value: &'a Value) -> Result<Self, ValueKind>;
}

macro_rules! impl_from_value_copy {
    ($($ty:ty => $arm:ident),* $(,)?) => {
        $(
            impl<'a> FromValue<'a> for $ty {
                const KIND: ValueKind = ValueKind::$arm;

                fn from_value(value: &'a Value) -> Result<Self, ValueKind> {
                    match value {
                        Value::$arm(v) => Ok(*v),
                        other => Err(other.kind()),
                    }
                }
            }
        )*
    };
}

macro_rules! impl_from_value_ref {
    ($($ty:ty => $arm:ident),* $(,)?) => {
        $(
            impl<'a> FromValue<'a> for &'a $ty {
                const KIND: ValueKind = ValueKind::$arm;

                fn from_value(value: &'a Value) -> Result<Self, ValueKind> {
                    match value {
                        Value::$arm(v) => Ok(v),
                        other => Err(other.kind()),
                    }
                }
            }
        )*
    };
}

impl_from_value_copy! {
    i32 => Int,
    bool => Bool,
    f32 => Float,
    f64 => Double,
}

impl_from_value_ref! {
    str => String,
    Identifier => Identifier,
    AttributeModifier => AttributeModifier,
    [Value] => List,
    Record => Record,
}

impl<'a> FromValue<'a> for String {
    const KIND: ValueKind = ValueKind::String;

    fn from_value(value: &'a Value) -> Result<Self, ValueKind> {
        <&str>::from_value(value).map(str::to_owned)
    }
}

impl<'a> FromValue<'a> for Identifier {
    const KIND: ValueKind = ValueKind::Identifier;

    fn from_value(value: &'a Value) -> Result<Self, ValueKind> {
        <&Identifier>::from_value(value).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_parses_namespace_and_path() {
        let id: Identifier = "origins:elytra".parse().unwrap();
        assert_eq!(id.namespace(), "origins");
        assert_eq!(id.path(), "elytra");
        assert_eq!(id.to_string(), "origins:elytra");
    }

    #[test]
    fn test_identifier_without_namespace_uses_default() {
        let id: Identifier = "generic.armor".parse().unwrap();
        assert_eq!(id.namespace(), DEFAULT_NAMESPACE);
        assert_eq!(id.to_string(), "minecraft:generic.armor");
    }

    #[test]
    fn test_identifier_rejects_uppercase_and_extra_colons() {
        assert!(matches!(
            "Origins:elytra".parse::<Identifier>(),
            Err(IdentifierError::InvalidNamespace(_))
        ));
        assert!(matches!(
            "a:b:c".parse::<Identifier>(),
            Err(IdentifierError::InvalidPath(_))
        ));
        assert!("origins:".parse::<Identifier>().is_err());
    }

    #[test]
    fn test_identifier_serializes_as_string() {
        let id = Identifier::new("origins", "powers/fly").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"origins:powers/fly\"");
        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<Identifier>("\"BAD\"").is_err());
    }

    #[test]
    fn test_operation_ordinals_and_names() {
        for op in [
            Operation::Addition,
            Operation::MultiplyBase,
            Operation::MultiplyTotal,
        ] {
            assert_eq!(Operation::from_ordinal(op.ordinal()), Some(op));
            assert_eq!(op.name().parse::<Operation>(), Ok(op));
        }
        assert_eq!(Operation::from_ordinal(3), None);
        assert_eq!("MULTIPLY_BASE".parse(), Ok(Operation::MultiplyBase));
    }

    #[test]
    fn test_record_insert_replaces_by_name() {
        let mut record = Record::new();
        record.insert("a", Some(Value::Int(1)));
        record.insert("b", None);
        record.insert("a", Some(Value::Int(2)));
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some(Some(&Value::Int(2))));
        assert_eq!(record.get("b"), Some(None));
        assert_eq!(record.get("c"), None);
    }

    #[test]
    fn test_from_value_matches_and_reports_kind() {
        let v = Value::from(5);
        assert_eq!(i32::from_value(&v), Ok(5));
        assert_eq!(<&str>::from_value(&v), Err(ValueKind::Int));

        let s = Value::from("hello");
        assert_eq!(<&str>::from_value(&s), Ok("hello"));
        assert_eq!(String::from_value(&s), Ok("hello".to_string()));
        assert_eq!(bool::from_value(&s), Err(ValueKind::String));
    }

    #[test]
    fn test_value_kind_display() {
        assert_eq!(ValueKind::AttributeModifier.to_string(), "attribute_modifier");
        assert_eq!(Value::List(vec![]).kind().to_string(), "list");
    }
}
