//! Model contracts
//!
//! [`Model`] ties a type's constructor shape to its invariants. [`Role`]
//! decides whether constructing the type checks invariants by default.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::binding::Args;
use crate::descriptor::Constructor;
use crate::foundation::{ModelResult, Value};
use crate::invariant::HasInvariants;

/// Canonical category of a domain object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Plain model: invariants are checked only on request.
    #[default]
    Model,
    /// Identified by its `id` attribute; always checked on construction.
    Entity,
    /// Defined by its attributes; always checked on construction.
    ValueObject,
}

impl Role {
    /// Whether instances are checked automatically after construction.
    #[must_use]
    pub fn checks_invariants(self) -> bool {
        matches!(self, Self::Entity | Self::ValueObject)
    }

    /// Attribute that identifies instances of this role, if any.
    #[must_use]
    pub fn identity_attribute(self) -> Option<&'static str> {
        match self {
            Self::Entity => Some("id"),
            Self::Model | Self::ValueObject => None,
        }
    }
}

/// A domain type built through the construction pipeline.
pub trait Model: HasInvariants {
    /// Constructor shape and materialize function.
    ///
    /// Types without one cannot be built with [`make`](Self::make).
    fn constructor() -> Option<Constructor<Self>> {
        None
    }

    fn role() -> Role {
        Role::Model
    }

    /// Whether [`make`](Self::make) checks invariants before returning.
    fn should_auto_check_invariants() -> bool {
        Self::role().checks_invariants()
    }

    /// Builds an instance from positional and/or named arguments.
    fn make(args: impl Into<Args>) -> ModelResult<Self> {
        crate::construct::construct(args)
    }
}

/// Read access to a model's current attribute values.
pub trait Attributes {
    /// Attribute name to value, in constructor order.
    fn values(&self) -> IndexMap<String, Value>;

    /// Value of one attribute.
    fn get(&self, name: &str) -> Option<Value> {
        self.values().shift_remove(name)
    }
}
