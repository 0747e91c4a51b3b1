//! Shape-agnostic view of a value being validated
//!
//! [`Value`] is what the traversal engine walks. Host types describe
//! themselves through [`Inspect`](crate::Inspect); structs become
//! [`StructValue`]s carrying, per field, the name, the rule expression and
//! the inspected field value.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

// ============================================================================
// KIND
// ============================================================================

/// Coarse shape of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Uint,
    Float,
    Str,
    Seq,
    Map,
    Struct,
}

impl Kind {
    /// Lowercase name used in messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::Str => "string",
            Kind::Seq => "sequence",
            Kind::Map => "mapping",
            Kind::Struct => "struct",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// VALUE
// ============================================================================

/// An inspected value.
///
/// Borrowed strings stay borrowed; numbers are widened to 64 bits.
/// `Map` keeps entries as an ordered list so traversal order is stable.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Absent value (`None`, JSON `null`).
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(Cow<'a, str>),
    Seq(Vec<Value<'a>>),
    Map(Vec<(Value<'a>, Value<'a>)>),
    Struct(StructValue<'a>),
}

impl<'a> Value<'a> {
    /// The shape of this value.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::Seq(_) => Kind::Seq,
            Value::Map(_) => Kind::Map,
            Value::Struct(_) => Kind::Struct,
        }
    }

    /// Whether this is the zero value of its type.
    ///
    /// Null, `false`, `0`, `0.0`, the empty string, an empty collection and
    /// a struct whose fields are all zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(n) => *n == 0,
            Value::Uint(n) => *n == 0,
            Value::Float(n) => *n == 0.0,
            Value::Str(s) => s.is_empty(),
            Value::Seq(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            Value::Struct(s) => s.fields.iter().all(|f| f.value.is_zero()),
        }
    }

    /// Length in chars for strings, in elements for collections.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::Seq(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Returns the string slice if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the struct view if this is a struct.
    #[must_use]
    pub fn as_struct(&self) -> Option<&StructValue<'a>> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Orders two values of the same kind.
    ///
    /// Numbers compare by value, signed against unsigned included; strings,
    /// sequences and mappings by length.
    /// Returns `None` across kinds and for kinds without an order.
    #[must_use]
    pub fn compare(&self, other: &Value<'_>) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Uint(a), Value::Uint(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Uint(b)) => i128::from(*a).partial_cmp(&i128::from(*b)),
            (Value::Uint(a), Value::Int(b)) => i128::from(*a).partial_cmp(&i128::from(*b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Str(_), Value::Str(_))
            | (Value::Seq(_), Value::Seq(_))
            | (Value::Map(_), Value::Map(_)) => self.len().cmp(&other.len()).into(),
            _ => None,
        }
    }

    /// Resolves a relative path such as `Password`, `Address.City`,
    /// `Items[2]` or `Schools[SMP].Name`.
    ///
    /// The empty path resolves to `self`. Field segments also match string
    /// keys of mappings, so JSON objects can be addressed like structs.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Value<'a>> {
        let mut current = self;
        for segment in segments(path)? {
            current = match segment {
                Segment::Field(name) => current.child(name)?,
                Segment::Index(key) => current.index(key)?,
            };
        }
        Some(current)
    }

    fn child(&self, name: &str) -> Option<&Value<'a>> {
        match self {
            Value::Struct(s) => s.field(name),
            Value::Map(_) => self.index(name),
            _ => None,
        }
    }

    fn index(&self, key: &str) -> Option<&Value<'a>> {
        match self {
            Value::Seq(items) => items.get(key.parse::<usize>().ok()?),
            Value::Map(entries) => entries
                .iter()
                .find(|(k, _)| k.key_matches(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    fn key_matches(&self, key: &str) -> bool {
        match self {
            Value::Str(s) => s == key,
            Value::Null | Value::Seq(_) | Value::Map(_) | Value::Struct(_) => false,
            scalar => scalar.to_string() == key,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Uint(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Struct(s) => write!(f, "{} {{..}}", s.name),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Str(Cow::Borrowed(s))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::Str(Cow::Owned(s))
    }
}

// ============================================================================
// STRUCTS
// ============================================================================

/// One field of an inspected struct.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue<'a> {
    name: &'static str,
    rules: &'static str,
    value: Value<'a>,
}

impl<'a> FieldValue<'a> {
    /// Field name as it appears in error paths.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Rule expression attached to the field (may be empty).
    #[must_use]
    pub fn rules(&self) -> &'static str {
        self.rules
    }

    /// The inspected field value.
    #[must_use]
    pub fn value(&self) -> &Value<'a> {
        &self.value
    }
}

/// An inspected struct: type identity, a typed view of the original value
/// for struct-level hooks, and ordered fields.
#[derive(Clone)]
pub struct StructValue<'a> {
    name: &'static str,
    type_id: TypeId,
    raw: &'a dyn Any,
    fields: Vec<FieldValue<'a>>,
}

impl<'a> StructValue<'a> {
    /// Starts describing `value`, a struct named `name`.
    pub fn new<T: Any>(name: &'static str, value: &'a T) -> Self {
        Self {
            name,
            type_id: TypeId::of::<T>(),
            raw: value,
            fields: Vec::new(),
        }
    }

    /// Appends a field with its rule expression.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_field(mut self, name: &'static str, rules: &'static str, value: Value<'a>) -> Self {
        self.fields.push(FieldValue { name, rules, value });
        self
    }

    /// Struct type name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `TypeId` of the described Rust type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldValue<'a>] {
        &self.fields
    }

    /// Value of the field called `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value<'a>> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Typed access to the described value.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.raw.downcast_ref::<T>()
    }
}

impl fmt::Debug for StructValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructValue")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

impl PartialEq for StructValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.fields == other.fields
    }
}

// ============================================================================
// PATHS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'p> {
    Field(&'p str),
    Index(&'p str),
}

fn segments(path: &str) -> Option<Vec<Segment<'_>>> {
    let mut out = Vec::new();
    let mut rest = path;

    while !rest.is_empty() {
        if let Some(inner) = rest.strip_prefix('[') {
            let end = inner.find(']')?;
            out.push(Segment::Index(&inner[..end]));
            rest = &inner[end + 1..];
        } else {
            let body = rest.strip_prefix('.').unwrap_or(rest);
            let end = body.find(|c: char| c == '.' || c == '[').unwrap_or(body.len());
            if end == 0 {
                return None;
            }
            out.push(Segment::Field(&body[..end]));
            rest = &body[end..];
        }
    }

    Some(out)
}

// ============================================================================
// TESTS
// ============================================================================
