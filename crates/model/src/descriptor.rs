//! Constructor shapes
//!
//! A [`TypeDescriptor`] is the ordered list of parameters a model's
//! constructor accepts. Together with a materialize function it forms a
//! [`Constructor`], which a type hands to the engine through
//! [`Model::constructor`](crate::model::Model::constructor).
//!
//! ```rust,ignore
//! fn constructor() -> Option<Constructor<Self>> {
//!     let shape = TypeDescriptor::of::<Money>()
//!         .param(Param::new("amount", [TypeTag::Int, TypeTag::Float]))
//!         .param(Param::new("currency", TypeTag::String).with_default("EUR"));
//!
//!     Some(Constructor::new(shape, |args| {
//!         Ok(Money {
//!             amount: args.take("amount")?,
//!             currency: args.take("currency")?,
//!         })
//!     }))
//! }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::binding::BoundArgs;
use crate::cache;
use crate::foundation::{
    ConstructionError, ModelResult, RegistryError, TypeSet, TypeTag, Value, simple_type_name,
};
use crate::model::Model;

// ============================================================================
// PARAM
// ============================================================================

/// One declared constructor parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    types: TypeSet,
    nullable: bool,
    optional: bool,
    default: Option<Value>,
}

impl Param {
    /// A required, non-nullable parameter.
    pub fn new(name: impl Into<String>, types: impl Into<TypeSet>) -> Self {
        Self {
            name: name.into(),
            types: types.into(),
            nullable: false,
            optional: false,
            default: None,
        }
    }

    /// Accepts an absent (null) value.
    #[must_use = "builder methods must be chained or built"]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// May be left out entirely; the bound slot stays empty.
    #[must_use = "builder methods must be chained or built"]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Value bound when the caller supplies nothing. Implies optional.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.optional = true;
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type set.
    #[must_use]
    pub fn types(&self) -> &TypeSet {
        &self.types
    }

    /// Whether null passes the type check. `mixed` parameters always allow it.
    #[must_use]
    pub fn allows_absent(&self) -> bool {
        self.nullable || self.types.tags().contains(&TypeTag::Mixed)
    }

    /// Whether the caller may omit the parameter.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Acceptable type names for messages, with `|null` for nullable sets.
    #[must_use]
    pub fn expected(&self) -> String {
        let names = self.types.names();
        if self.nullable && !self.types.tags().contains(&TypeTag::Mixed) {
            format!("{names}|null")
        } else {
            names
        }
    }
}

// ============================================================================
// TYPE DESCRIPTOR
// ============================================================================

/// The parameter shape of a type's constructor, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    type_name: &'static str,
    params: Vec<Param>,
}

impl TypeDescriptor {
    /// An empty shape for `T`.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self::named(simple_type_name::<T>())
    }

    /// An empty shape reported under `type_name`.
    #[must_use]
    pub fn named(type_name: &'static str) -> Self {
        Self {
            type_name,
            params: Vec::new(),
        }
    }

    /// Appends a parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Simple name of the described type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Position of the named parameter.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameter names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(Param::name)
    }

    /// Rejects shapes with duplicate parameter names.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let mut seen = HashSet::with_capacity(self.params.len());
        for param in &self.params {
            if !seen.insert(param.name.as_str()) {
                return Err(RegistryError::DuplicateParameter {
                    type_name: self.type_name,
                    parameter: param.name.clone(),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// CONSTRUCTOR
// ============================================================================

/// Builds an instance from bound, type-checked arguments.
pub type Materialize<T> = fn(&mut BoundArgs) -> ModelResult<T>;

/// A constructor shape plus the function that materializes the instance.
pub struct Constructor<T> {
    descriptor: TypeDescriptor,
    materialize: Materialize<T>,
}

impl<T> Constructor<T> {
    pub fn new(descriptor: TypeDescriptor, materialize: Materialize<T>) -> Self {
        Self {
            descriptor,
            materialize,
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub(crate) fn materialize(&self, args: &mut BoundArgs) -> ModelResult<T> {
        (self.materialize)(args)
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Resolves and caches the constructor of `T`.
///
/// Fails with [`ConstructionError::NoConstructor`] when `T` declares none.
pub fn resolve<T: Model>() -> ModelResult<Arc<Constructor<T>>> {
    cache::constructors().get_or_try_init::<T, _, _>(build::<T>)
}

/// Resolves `T`'s constructor, bypassing the cache when `cached` is false.
pub(crate) fn resolve_with<T: Model>(cached: bool) -> ModelResult<Arc<Constructor<T>>> {
    if cached {
        resolve::<T>()
    } else {
        build::<T>().map(Arc::new)
    }
}

/// Whether `T`'s constructor has been resolved and cached.
#[must_use]
pub fn is_resolved<T: Model>() -> bool {
    cache::constructors().contains::<T>()
}

fn build<T: Model>() -> ModelResult<Constructor<T>> {
    let constructor = T::constructor().ok_or(ConstructionError::NoConstructor {
        type_name: simple_type_name::<T>(),
    })?;
    constructor.descriptor.validate()?;
    Ok(constructor)
}
