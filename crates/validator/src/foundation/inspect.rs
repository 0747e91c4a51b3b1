//! The `Inspect` trait: how host values describe their shape
//!
//! Rust has no runtime reflection, so every validated type provides an
//! [`Inspect`] implementation. Standard library types are covered here;
//! structs use `#[derive(Inspect)]` or a hand-written impl building a
//! [`StructValue`](crate::StructValue).

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use crate::foundation::value::Value;

/// Describes a value to the validation engine.
///
/// # Examples
///
/// ```rust
/// use tagcheck_validator::{Inspect, StructValue, Value};
///
/// struct Login {
///     username: String,
///     password: String,
/// }
///
/// impl Inspect for Login {
///     fn inspect(&self) -> Value<'_> {
///         Value::Struct(
///             StructValue::new("Login", self)
///                 .with_field("Username", "required,email", self.username.inspect())
///                 .with_field("Password", "required,min=5", self.password.inspect()),
///         )
///     }
/// }
/// ```
pub trait Inspect {
    /// Returns the inspected view of `self`.
    fn inspect(&self) -> Value<'_>;
}

// ============================================================================
// SCALARS
// ============================================================================

macro_rules! inspect_scalar {
    ($variant:ident: $ty:ty) => {
        impl Inspect for $ty {
            #[inline]
            fn inspect(&self) -> Value<'_> {
                Value::$variant(*self)
            }
        }
    };
    ($variant:ident from $wide:ty: $($ty:ty),+ $(,)?) => {
        $(
            impl Inspect for $ty {
                #[inline]
                fn inspect(&self) -> Value<'_> {
                    Value::$variant(<$wide>::from(*self))
                }
            }
        )+
    };
    ($variant:ident as $wide:ty: $($ty:ty),+ $(,)?) => {
        $(
            impl Inspect for $ty {
                #[inline]
                fn inspect(&self) -> Value<'_> {
                    Value::$variant(*self as $wide)
                }
            }
        )+
    };
}

inspect_scalar!(Int: i64);
inspect_scalar!(Uint: u64);
inspect_scalar!(Float: f64);
inspect_scalar!(Int from i64: i8, i16, i32);
inspect_scalar!(Uint from u64: u8, u16, u32);
inspect_scalar!(Float from f64: f32);
// pointer-sized integers have no `From` into the 64-bit forms
inspect_scalar!(Int as i64: isize);
inspect_scalar!(Uint as u64: usize);

impl Inspect for bool {
    fn inspect(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl Inspect for char {
    fn inspect(&self) -> Value<'_> {
        Value::Str(Cow::Owned(self.to_string()))
    }
}

impl Inspect for str {
    fn inspect(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self))
    }
}

impl Inspect for String {
    fn inspect(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self))
    }
}

impl Inspect for Cow<'_, str> {
    fn inspect(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self))
    }
}

// ============================================================================
// WRAPPERS
// ============================================================================

impl<T: Inspect + ?Sized> Inspect for &T {
    fn inspect(&self) -> Value<'_> {
        (**self).inspect()
    }
}

impl<T: Inspect + ?Sized> Inspect for Box<T> {
    fn inspect(&self) -> Value<'_> {
        (**self).inspect()
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn inspect(&self) -> Value<'_> {
        self.as_ref().map_or(Value::Null, Inspect::inspect)
    }
}

// ============================================================================
// COLLECTIONS
// ============================================================================

impl<T: Inspect> Inspect for [T] {
    fn inspect(&self) -> Value<'_> {
        Value::Seq(self.iter().map(Inspect::inspect).collect())
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn inspect(&self) -> Value<'_> {
        self.as_slice().inspect()
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn inspect(&self) -> Value<'_> {
        self.as_slice().inspect()
    }
}

/// Entries are sorted by key so error order does not depend on hashing.
impl<K: Inspect + Ord, V: Inspect, S> Inspect for HashMap<K, V, S> {
    fn inspect(&self) -> Value<'_> {
        let mut entries: Vec<(&K, &V)> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.inspect(), v.inspect()))
                .collect(),
        )
    }
}

impl<K: Inspect, V: Inspect> Inspect for BTreeMap<K, V> {
    fn inspect(&self) -> Value<'_> {
        Value::Map(self.iter().map(|(k, v)| (k.inspect(), v.inspect())).collect())
    }
}

// ============================================================================
// JSON
// ============================================================================

/// JSON objects become mappings; field-style paths still resolve against
/// their string keys.
impl Inspect for serde_json::Value {
    fn inspect(&self) -> Value<'_> {
        match self {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Value::Str(Cow::Borrowed(s)),
            serde_json::Value::Array(items) => items.inspect(),
            serde_json::Value::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (Value::Str(Cow::Borrowed(k)), v.inspect()))
                    .collect(),
            ),
        }
    }
}

impl Inspect for Value<'_> {
    fn inspect(&self) -> Value<'_> {
        self.clone()
    }
}

// ============================================================================
// TESTS
// ============================================================================
