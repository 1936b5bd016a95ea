//! # tessera-model
//!
//! Self-validating domain objects with construction-time invariant checking.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tessera_model::prelude::*;
//!
//! struct Money {
//!     amount: f64,
//!     currency: String,
//! }
//!
//! invariants! {
//!     Money {
//!         check invariantAmountMustBeGreaterThanZero => |m| m.amount > 0.0,
//!         check invariantCurrencyMustHaveThreeCharacters => |m| m.currency.len() == 3,
//!     }
//! }
//!
//! impl Model for Money {
//!     fn constructor() -> Option<Constructor<Self>> {
//!         let shape = TypeDescriptor::of::<Self>()
//!             .param(Param::new("amount", [TypeTag::Int, TypeTag::Float]))
//!             .param(Param::new("currency", TypeTag::String));
//!         Some(Constructor::new(shape, |args| {
//!             Ok(Money { amount: args.take("amount")?, currency: args.take("currency")? })
//!         }))
//!     }
//!
//!     fn role() -> Role {
//!         Role::ValueObject
//!     }
//! }
//!
//! let err = Money::make(args![-10, "US"]).unwrap_err();
//! // Multiple errors (2):
//! // - amount must be greater than zero
//! // - currency must have three characters
//! ```
//!
//! ## Construction
//!
//! [`Model::make`](model::Model::make) resolves the type's
//! [constructor](descriptor), [binds](binding) the arguments, checks their
//! [types](typecheck), materializes the instance and, for entities and value
//! objects, runs its [invariants](invariant).
//!
//! ## Reporting
//!
//! Every check runs. Failures marked collectible are aggregated into one
//! report; the first immediate failure is raised on its own. A type can take
//! over reporting entirely with a handler.

// ConstructionError carries a boxed failure plus the binding and type errors
// inline; boxing those too would only add indirection on the error path.
#![allow(clippy::result_large_err)]

pub mod binding;
mod cache;
pub mod config;
pub mod construct;
pub mod descriptor;
pub mod foundation;
pub mod invariant;
mod macros;
pub mod model;
pub mod prelude;
pub mod typecheck;
