//! Argument binding
//!
//! Maps the raw arguments of a construction call onto a [`TypeDescriptor`].
//! Positional values fill slots from the left; named values fill the rest by
//! name. For each parameter, in order: positional, then named, then the
//! declared default, then empty if the parameter is optional. Anything still
//! unfilled is reported as missing, all names at once.

use indexmap::IndexMap;

use crate::descriptor::TypeDescriptor;
use crate::foundation::{BindError, ModelResult, ObjectValue, TypeError, Value};

// ============================================================================
// ARGS
// ============================================================================

/// Raw arguments for a construction call: positional, named, or both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    named: IndexMap<String, Value>,
}

impl Args {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional arguments only.
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            named: IndexMap::new(),
        }
    }

    /// Named arguments only.
    pub fn named<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            positional: Vec::new(),
            named: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Appends a positional argument.
    #[must_use = "builder methods must be chained or built"]
    pub fn push(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Sets a named argument, replacing any previous value for `name`.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn positional_values(&self) -> &[Value] {
        &self.positional
    }

    #[must_use]
    pub fn named_values(&self) -> &IndexMap<String, Value> {
        &self.named
    }

    /// Total number of supplied arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    fn into_parts(self) -> (Vec<Value>, IndexMap<String, Value>) {
        (self.positional, self.named)
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self::positional(values)
    }
}

impl From<IndexMap<String, Value>> for Args {
    fn from(named: IndexMap<String, Value>) -> Self {
        Self {
            positional: Vec::new(),
            named,
        }
    }
}

// ============================================================================
// BOUND ARGS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    value: Option<Value>,
    expected: String,
}

/// One slot per declared parameter; empty for legitimately absent values.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgs {
    type_name: &'static str,
    slots: IndexMap<String, Slot>,
}

impl BoundArgs {
    /// Simple name of the type being constructed.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Number of slots; always the descriptor's parameter count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The value bound to `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)?.value.as_ref()
    }

    /// Whether the slot for `name` is empty or null.
    #[must_use]
    pub fn is_absent(&self, name: &str) -> bool {
        self.get(name).is_none_or(Value::is_null)
    }

    /// Slots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.slots
            .iter()
            .map(|(name, slot)| (name.as_str(), slot.value.as_ref()))
    }

    /// Moves the value out of `name`'s slot and converts it.
    ///
    /// Absent values only convert into `Option`s. Reading a name the
    /// descriptor does not declare is a [`BindError::UndeclaredParameter`].
    pub fn take<V: FromValue>(&mut self, name: &str) -> ModelResult<V> {
        let type_name = self.type_name;
        let slot = self
            .slots
            .get_mut(name)
            .ok_or_else(|| BindError::UndeclaredParameter {
                type_name,
                name: name.to_owned(),
            })?;

        let converted = match slot.value.take() {
            Some(value) => {
                let given = value.kind_name().to_owned();
                V::from_value(value).ok_or(given)
            }
            None => V::from_absent().ok_or_else(|| "nothing".to_owned()),
        };

        converted.map_err(|given| {
            TypeError {
                type_name,
                parameter: name.to_owned(),
                expected: slot.expected.clone(),
                given,
            }
            .into()
        })
    }

    /// Moves out a domain object of type `V` bound to `name`.
    pub fn take_object<V>(&mut self, name: &str) -> ModelResult<V>
    where
        V: Clone + 'static,
    {
        let type_name = self.type_name;
        let object: ObjectValue = self.take(name)?;
        let value = object.downcast_ref::<V>().cloned().ok_or_else(|| TypeError {
            type_name,
            parameter: name.to_owned(),
            expected: crate::foundation::simple_type_name::<V>().to_owned(),
            given: object.type_name().to_owned(),
        })?;
        Ok(value)
    }

    /// Remaining values keyed by parameter name, absent slots skipped.
    #[must_use]
    pub fn into_values(self) -> IndexMap<String, Value> {
        self.slots
            .into_iter()
            .filter_map(|(name, slot)| slot.value.map(|v| (name, v)))
            .collect()
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Conversion out of a bound [`Value`].
pub trait FromValue: Sized {
    /// Converts a supplied value, `None` if the kind does not fit.
    fn from_value(value: Value) -> Option<Self>;

    /// Value to use for an empty slot, `None` if absence is not representable.
    fn from_absent() -> Option<Self> {
        None
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }

    fn from_absent() -> Option<Self> {
        Some(Value::Null)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Option<Self> {
        value.as_i64()
    }
}

macro_rules! from_int_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Option<Self> {
                    value.as_i64().and_then(|i| <$ty>::try_from(i).ok())
                }
            }
        )*
    };
}

from_int_value!(i8, i16, i32, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for Vec<Value> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl FromValue for IndexMap<String, Value> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl FromValue for ObjectValue {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Option<Self> {
        if value.is_null() {
            Some(None)
        } else {
            T::from_value(value).map(Some)
        }
    }

    fn from_absent() -> Option<Self> {
        Some(None)
    }
}

// ============================================================================
// BIND
// ============================================================================

/// Binds `args` against `descriptor`.
///
/// Rejects extra positional values and unknown names before looking for
/// missing parameters. A positional value wins over a named value for the
/// same slot.
pub fn bind(descriptor: &TypeDescriptor, args: Args) -> Result<BoundArgs, BindError> {
    let type_name = descriptor.type_name();
    let params = descriptor.params();
    let (positional, mut named) = args.into_parts();

    if positional.len() > params.len() {
        return Err(BindError::TooManyArguments {
            type_name,
            expected: params.len(),
            given: positional.len(),
        });
    }

    if let Some(unknown) = named.keys().find(|name| descriptor.get(name).is_none()) {
        return Err(BindError::UnknownParameter {
            type_name,
            name: unknown.clone(),
        });
    }

    let mut positional = positional.into_iter();
    let mut slots = IndexMap::with_capacity(params.len());
    let mut missing = Vec::new();

    for param in params {
        let by_name = named.shift_remove(param.name());
        let value = positional
            .next()
            .or(by_name)
            .or_else(|| param.default_value().cloned());

        if value.is_none() && !param.is_optional() {
            missing.push(param.name().to_owned());
        }

        slots.insert(
            param.name().to_owned(),
            Slot {
                value,
                expected: param.expected(),
            },
        );
    }

    if !missing.is_empty() {
        return Err(BindError::MissingRequired {
            type_name,
            names: missing,
        });
    }

    Ok(BoundArgs { type_name, slots })
}
