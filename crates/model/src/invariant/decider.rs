//! Deciding what to raise for a set of violations
//!
//! ```text
//! no violations                 -> success
//! handler configured            -> the handler decides
//! report type cannot aggregate  -> raise the first violation
//! any immediate violation       -> raise the first immediate one
//! otherwise                     -> one report holding every violation
//! ```

use std::fmt;

use tracing::debug;

use crate::foundation::{Failure, ReportType, ViolationSet};

/// A type-level handler that takes over reporting of violations.
///
/// Returning `Ok(())` accepts the instance despite the violations.
pub type InvariantHandler<T> = fn(&T, ViolationSet) -> Result<(), Box<dyn Failure>>;

/// A one-shot handler for a single check run.
pub type Handler<'a> = Box<dyn FnOnce(ViolationSet) -> Result<(), Box<dyn Failure>> + 'a>;

/// Which branch the decider took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// No violations.
    Succeeded,
    /// One violation raised on its own.
    RaisedSingle,
    /// Several violations raised as one report.
    RaisedAggregated,
    /// A handler received the violations.
    DelegatedToHandler,
}

impl Decision {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::RaisedSingle => "raised_single",
            Self::RaisedAggregated => "raised_aggregated",
            Self::DelegatedToHandler => "delegated_to_handler",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The decision together with whatever failure it produced.
#[derive(Debug)]
pub struct Outcome {
    decision: Decision,
    failure: Option<Box<dyn Failure>>,
}

impl Outcome {
    #[must_use]
    pub fn decision(&self) -> Decision {
        self.decision
    }

    /// Whether the instance is accepted.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    #[must_use]
    pub fn failure(&self) -> Option<&dyn Failure> {
        self.failure.as_deref()
    }

    pub fn into_result(self) -> Result<(), Box<dyn Failure>> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

/// Decides the outcome for `violations`.
pub fn decide(violations: ViolationSet, report: ReportType, handler: Option<Handler<'_>>) -> Outcome {
    let count = violations.len();

    let outcome = if violations.is_empty() {
        Outcome {
            decision: Decision::Succeeded,
            failure: None,
        }
    } else if let Some(handler) = handler {
        Outcome {
            decision: Decision::DelegatedToHandler,
            failure: handler(violations).err(),
        }
    } else {
        let (decision, failure) = raise(violations, report);
        Outcome {
            decision,
            failure: Some(failure),
        }
    };

    debug!(
        violations = count,
        report = report.name(),
        decision = %outcome.decision,
        "invariant outcome decided"
    );
    outcome
}

/// The default reporting policy for a non-empty violation set.
///
/// Handlers that only want to add behaviour around the default can call
/// this and return its failure.
#[must_use]
pub fn default_failure(violations: ViolationSet, report: ReportType) -> Option<Box<dyn Failure>> {
    if violations.is_empty() {
        return None;
    }
    Some(raise(violations, report).1)
}

fn raise(violations: ViolationSet, report: ReportType) -> (Decision, Box<dyn Failure>) {
    let mut violations = violations.into_vec();

    let Some(aggregate) = report.aggregator() else {
        return (Decision::RaisedSingle, violations.swap_remove(0).into_failure());
    };

    if let Some(position) = violations.iter().position(|v| !v.is_aggregatable()) {
        return (Decision::RaisedSingle, violations.swap_remove(position).into_failure());
    }

    let decision = if violations.len() == 1 {
        Decision::RaisedSingle
    } else {
        Decision::RaisedAggregated
    };

    (decision, aggregate(violations))
}
