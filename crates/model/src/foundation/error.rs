//! Errors raised while constructing a model
//!
//! Binding and type errors are always immediate: they mean the object cannot
//! exist in a well-typed state. Only invariant failures go through the
//! aggregation policy, and they arrive here already decided, as
//! [`ConstructionError::Invariant`].

use crate::foundation::failure::Failure;

// ============================================================================
// BINDING
// ============================================================================

/// Supplied arguments could not be mapped onto the constructor shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// One or more required parameters received no value and have no default.
    ///
    /// Lists every missing parameter, in declaration order.
    #[error("{type_name}::make(): missing required {}: {}", plural(.names.len()), .names.join(", "))]
    MissingRequired {
        type_name: &'static str,
        names: Vec<String>,
    },

    /// More positional arguments than declared parameters.
    #[error("{type_name}::make(): expected at most {expected} arguments, {given} given")]
    TooManyArguments {
        type_name: &'static str,
        expected: usize,
        given: usize,
    },

    /// A named argument matches no declared parameter.
    #[error("{type_name}::make(): unknown named parameter \"{name}\"")]
    UnknownParameter {
        type_name: &'static str,
        name: String,
    },

    /// A materializer read a parameter its descriptor never declared.
    #[error("{type_name}: constructor reads undeclared parameter \"{name}\"")]
    UndeclaredParameter {
        type_name: &'static str,
        name: String,
    },
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "parameter" } else { "parameters" }
}

impl BindError {
    /// Names of the missing parameters, empty for other variants.
    #[must_use]
    pub fn missing(&self) -> &[String] {
        match self {
            Self::MissingRequired { names, .. } => names,
            _ => &[],
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingRequired { .. } => "MODEL_MISSING_REQUIRED",
            Self::TooManyArguments { .. } => "MODEL_TOO_MANY_ARGUMENTS",
            Self::UnknownParameter { .. } => "MODEL_UNKNOWN_PARAMETER",
            Self::UndeclaredParameter { .. } => "MODEL_UNDECLARED_PARAMETER",
        }
    }
}

// ============================================================================
// TYPE CHECKING
// ============================================================================

/// A bound argument does not match its declared type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{type_name}::make(): parameter \"{parameter}\" must be of type {expected}, {given} given")]
pub struct TypeError {
    /// Simple name of the type being constructed.
    pub type_name: &'static str,
    pub parameter: String,
    /// Acceptable type names joined by `|`.
    pub expected: String,
    /// Runtime kind of the offending value.
    pub given: String,
}

impl TypeError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        "MODEL_TYPE_MISMATCH"
    }
}

// ============================================================================
// REGISTRATION
// ============================================================================

/// Invalid invariant registration for a type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Check identifiers must start with `invariant`.
    #[error("{type_name}: check `{check}` must start with `invariant`")]
    MissingPrefix {
        type_name: &'static str,
        check: String,
    },

    /// `invariants` and `invariantHandler` are reserved.
    #[error("{type_name}: `{check}` is a reserved identifier")]
    ReservedIdentifier {
        type_name: &'static str,
        check: String,
    },

    /// The same identifier was registered twice.
    #[error("{type_name}: check `{check}` is registered more than once")]
    DuplicateCheck {
        type_name: &'static str,
        check: String,
    },

    /// Two constructor parameters share a name.
    #[error("{type_name}: parameter `{parameter}` is declared more than once")]
    DuplicateParameter {
        type_name: &'static str,
        parameter: String,
    },
}

impl RegistryError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingPrefix { .. } => "MODEL_CHECK_PREFIX",
            Self::ReservedIdentifier { .. } => "MODEL_CHECK_RESERVED",
            Self::DuplicateCheck { .. } => "MODEL_CHECK_DUPLICATE",
            Self::DuplicateParameter { .. } => "MODEL_PARAM_DUPLICATE",
        }
    }
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

/// Any failure surfaced by the construction pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ConstructionError {
    /// The type declares no constructor and cannot be built this way.
    #[error("{type_name} must have a constructor to be instantiated with make()")]
    NoConstructor { type_name: &'static str },

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// An invariant failure, as decided by the aggregation policy or a
    /// custom handler.
    #[error("{0}")]
    Invariant(Box<dyn Failure>),
}

impl ConstructionError {
    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoConstructor { .. } => "MODEL_NO_CONSTRUCTOR",
            Self::Bind(e) => e.code(),
            Self::Type(e) => e.code(),
            Self::Registry(e) => e.code(),
            Self::Invariant(_) => "MODEL_INVARIANT",
        }
    }

    /// The invariant failure, if this error carries one.
    #[must_use]
    pub fn invariant(&self) -> Option<&dyn Failure> {
        match self {
            Self::Invariant(failure) => Some(failure.original()),
            _ => None,
        }
    }

    /// Borrows the invariant failure as a concrete type.
    #[must_use]
    pub fn invariant_as<T: Failure>(&self) -> Option<&T> {
        self.invariant()?.downcast_ref::<T>()
    }

    /// Whether the error is an invariant failure (as opposed to a binding,
    /// typing or registration problem).
    #[must_use]
    pub fn is_invariant(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }
}

impl From<Box<dyn Failure>> for ConstructionError {
    fn from(failure: Box<dyn Failure>) -> Self {
        Self::Invariant(failure)
    }
}

/// Result alias used throughout the crate.
pub type ModelResult<T> = Result<T, ConstructionError>;
