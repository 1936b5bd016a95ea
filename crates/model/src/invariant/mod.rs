//! Invariant checking
//!
//! A type declares its invariants by implementing [`HasInvariants`]:
//!
//! ```rust,ignore
//! impl HasInvariants for Money {
//!     fn declare_invariants(invariants: &mut Invariants<Self>) {
//!         invariants
//!             .check("invariantAmountMustBePositive", |m| m.amount > 0)
//!             .try_check("invariantCurrencyIsSupported", |m| m.supported_currency());
//!     }
//! }
//!
//! money.check_invariants()?;
//! ```
//!
//! A check run is registry lookup, [execution](executor::execute) and a
//! [decision](decider::decide). [`InvariantCheck`] lets a caller swap the
//! report type or hand the violations to its own handler for one run.

pub mod decider;
pub mod executor;
pub mod registry;

use std::sync::Arc;

use crate::foundation::{ConstructionError, Failure, ModelResult, RegistryError, ReportType, ViolationSet};

pub use decider::{Decision, Handler, InvariantHandler, Outcome, decide, default_failure};
pub use executor::execute;
pub use registry::{InvariantRegistry, Invariants, RegisteredCheck, humanize, invariants};

/// A type with construction-time invariants.
pub trait HasInvariants: Sized + 'static {
    /// Registers the type's checks, in the order they should run.
    fn declare_invariants(invariants: &mut Invariants<Self>) {
        let _ = invariants;
    }

    /// Handler that replaces the default reporting policy for this type.
    fn invariant_handler() -> Option<InvariantHandler<Self>> {
        None
    }

    /// Report type used by the default policy.
    fn report_type() -> ReportType {
        ReportType::default()
    }

    /// The type's cached registry.
    fn invariants() -> Result<Arc<InvariantRegistry<Self>>, RegistryError> {
        invariants::<Self>()
    }

    /// Runs every invariant and applies the type's reporting policy.
    fn check_invariants(&self) -> ModelResult<()> {
        InvariantCheck::new(self).run()
    }

    /// Starts a configurable check run.
    fn invariant_check(&self) -> InvariantCheck<'_, Self> {
        InvariantCheck::new(self)
    }
}

/// One configurable run of a type's invariants.
pub struct InvariantCheck<'a, T: HasInvariants> {
    instance: &'a T,
    report: ReportType,
    on_fail: Option<Handler<'a>>,
    type_handler: bool,
    cached: bool,
}

impl<'a, T: HasInvariants> InvariantCheck<'a, T> {
    pub fn new(instance: &'a T) -> Self {
        Self {
            instance,
            report: T::report_type(),
            on_fail: None,
            type_handler: true,
            cached: true,
        }
    }

    /// Reports through `report` instead of the type's report type.
    #[must_use = "builder methods must be chained or built"]
    pub fn report_type(mut self, report: ReportType) -> Self {
        self.report = report;
        self
    }

    /// Hands any violations to `handler` instead of the default policy.
    ///
    /// Takes precedence over the type's own handler.
    #[must_use = "builder methods must be chained or built"]
    pub fn on_fail<F>(mut self, handler: F) -> Self
    where
        F: FnOnce(ViolationSet) -> Result<(), Box<dyn Failure>> + 'a,
    {
        self.on_fail = Some(Box::new(handler));
        self
    }

    /// Ignores the type's own handler and applies the default policy.
    #[must_use = "builder methods must be chained or built"]
    pub fn without_type_handler(mut self) -> Self {
        self.type_handler = false;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub(crate) fn cached(mut self, cached: bool) -> Self {
        self.cached = cached;
        self
    }

    /// Runs the checks and returns the decider's outcome.
    pub fn evaluate(self) -> Result<Outcome, RegistryError> {
        let registry = registry::invariants_with::<T>(self.cached)?;
        let violations = execute(self.instance, &registry);

        let instance = self.instance;
        let handler: Option<Handler<'a>> = match (self.on_fail, self.type_handler) {
            (Some(handler), _) => Some(handler),
            (None, true) => T::invariant_handler()
                .map(|handler| Box::new(move |violations| handler(instance, violations)) as Handler<'a>),
            (None, false) => None,
        };

        Ok(decide(violations, self.report, handler))
    }

    /// Runs the checks, failing with the decided failure.
    pub fn run(self) -> ModelResult<()> {
        self.evaluate()?
            .into_result()
            .map_err(ConstructionError::Invariant)
    }
}
