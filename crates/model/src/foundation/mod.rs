//! Core value, type and error types
//!
//! This module contains the building blocks every other part of the engine
//! is written against:
//!
//! - **Values**: [`Value`], [`ObjectValue`]. The dynamic arguments a
//!   constructor receives.
//! - **Types**: [`TypeTag`], [`TypeSet`]. What a parameter declares.
//! - **Failures**: [`Failure`], [`Severity`], [`Violation`], [`ViolationSet`].
//! - **Reports**: [`InvariantViolation`], [`AggregatesErrors`], [`ReportType`].
//! - **Errors**: [`ConstructionError`] and the errors it wraps.
//!
//! # Aggregation protocol
//!
//! A failure raised from a check declares its [`Severity`]. Collectible
//! failures may be batched into one report; immediate ones are raised alone.
//! A report type opts into batching by implementing [`AggregatesErrors`]:
//!
//! ```rust,ignore
//! use tessera_model::foundation::{AggregatesErrors, InvariantViolation, Violation};
//!
//! let report = InvariantViolation::from_violations(violations);
//! assert!(report.has_multiple_errors());
//! ```

pub mod error;
pub mod failure;
pub mod kind;
pub mod report;
pub mod value;

pub use error::{BindError, ConstructionError, ModelResult, RegistryError, TypeError};
pub use failure::{CheckResult, Failure, Severity, Violation, ViolationSet};
pub use kind::{TypeSet, TypeTag, simple_type_name};
pub use report::{AggregatesErrors, InvariantViolation, ReportShape, ReportType};
pub use value::{ObjectValue, Value};
