//! Dynamic argument values
//!
//! Constructor arguments arrive as [`Value`]s so that a single call can mix
//! primitives, collections and other domain objects. The runtime *kind* of a
//! value is what the type checker compares against declared parameter types.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::foundation::kind::simple_type_name;

// ============================================================================
// VALUE
// ============================================================================

/// A dynamically-typed constructor argument.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer kind.
    Int(i64),
    /// Float kind. Never produced from an integer source.
    Float(f64),
    /// String kind.
    String(String),
    /// Ordered list.
    Array(Vec<Value>),
    /// String-keyed map, insertion ordered.
    Map(IndexMap<String, Value>),
    /// A domain object (another model, an identifier, ...).
    Object(ObjectValue),
}

impl Value {
    /// Wraps a domain object.
    pub fn object<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self::Object(ObjectValue::new(value))
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the runtime kind, as reported in type errors.
    ///
    /// Objects report their simple type name.
    #[must_use]
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Object(object) => object.type_name(),
        }
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the numeric payload as `f64`, widening integers.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean payload, if any.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the wrapped object, if any.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Array(items) => write!(f, "array({})", items.len()),
            Self::Map(entries) => write!(f, "map({})", entries.len()),
            Self::Object(object) => write!(f, "{}", object.type_name()),
        }
    }
}

// ============================================================================
// OBJECT VALUE
// ============================================================================

/// A type-erased domain object carried inside a [`Value`].
///
/// Besides the instance itself it remembers the simple type name and the
/// capabilities the object conforms to, which is all the type checker needs
/// to match class and capability tags.
#[derive(Clone)]
pub struct ObjectValue {
    type_name: &'static str,
    capabilities: Vec<&'static str>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ObjectValue {
    /// Wraps `value`, recording its simple type name.
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            type_name: simple_type_name::<T>(),
            capabilities: Vec::new(),
            inner: Arc::new(value),
        }
    }

    /// Declares that the object conforms to a named capability.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_capability(mut self, capability: &'static str) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    /// Simple (unqualified) type name of the wrapped object.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Capabilities declared for this object.
    #[must_use]
    pub fn capabilities(&self) -> &[&'static str] {
        &self.capabilities
    }

    /// Whether the object is an instance of `name` or declares it as a capability.
    #[must_use]
    pub fn conforms_to(&self, name: &str) -> bool {
        self.type_name == name || self.capabilities.iter().any(|c| *c == name)
    }

    /// Borrows the object as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Whether both values share the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectValue")
            .field("type_name", &self.type_name)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

macro_rules! from_int {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )+
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<ObjectValue> for Value {
    fn from(value: ObjectValue) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self::Map(map)
    }
}

/// Converts parsed JSON into argument values.
///
/// The conversion is lossy for integers outside the `i64` range: they become
/// [`Value::Float`] with `f64` precision, so they are rejected by `int`
/// parameters and accepted by `float` ones.
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Json::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
