//! Prelude module for convenient imports.
//!
//! Provides a single `use tessera_model::prelude::*;` import that brings in
//! everything needed to declare and construct self-validating models.
//!
//! # Examples
//!
//! ```rust,ignore
//! use tessera_model::prelude::*;
//!
//! let price = Price::make(args![10.0, "EUR"])?;
//! let discounted = with_overrides(&price, [("amount", 9.0)])?;
//! ```

// ============================================================================
// FOUNDATION: Values, types, failures, errors
// ============================================================================

pub use crate::foundation::{
    AggregatesErrors, BindError, CheckResult, ConstructionError, Failure, InvariantViolation,
    ModelResult, ObjectValue, RegistryError, ReportShape, ReportType, Severity, TypeError,
    TypeSet, TypeTag, Value, Violation, ViolationSet,
};

// ============================================================================
// CONSTRUCTION: Shapes, binding, pipeline
// ============================================================================

pub use crate::binding::{Args, BoundArgs, FromValue};
pub use crate::config::{AutoCheckPolicy, EngineConfig};
pub use crate::construct::{Engine, construct, with_overrides};
pub use crate::descriptor::{Constructor, Param, TypeDescriptor};
pub use crate::model::{Attributes, Model, Role};

// ============================================================================
// INVARIANTS: Declaration and reporting
// ============================================================================

pub use crate::invariant::{
    Decision, HasInvariants, InvariantCheck, InvariantHandler, Invariants, Outcome,
};

// ============================================================================
// MACROS
// ============================================================================

pub use crate::{args, invariants};
