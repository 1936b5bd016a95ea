//! Failure reports raised for invariant violations
//!
//! [`InvariantViolation`] is the engine's own failure type: a `false` check
//! becomes one, and by default collected violations are reported through it.
//! Other report types take part in aggregation by implementing
//! [`AggregatesErrors`].

use std::fmt;

use crate::foundation::failure::{Failure, Severity, Violation};

// ============================================================================
// AGGREGATION CAPABILITY
// ============================================================================

/// A failure type able to represent several violations at once.
pub trait AggregatesErrors: Failure + Sized {
    /// Builds a report from an ordered, non-empty list of violations.
    ///
    /// A single violation must produce the single shape, carrying that
    /// violation's message verbatim.
    fn from_violations(violations: Vec<Violation>) -> Self;
}

/// The report type used when violations must be raised.
///
/// Types that cannot aggregate can only ever raise one violation at a time:
/// the first one found.
#[derive(Clone, Copy)]
pub struct ReportType {
    name: &'static str,
    aggregate: Option<fn(Vec<Violation>) -> Box<dyn Failure>>,
}

impl ReportType {
    /// Reports through `R`, aggregating collectible violations.
    #[must_use]
    pub fn aggregating<R: AggregatesErrors>() -> Self {
        Self {
            name: crate::foundation::kind::simple_type_name::<R>(),
            aggregate: Some(aggregate_into::<R>),
        }
    }

    /// A report type without aggregation support: the first violation is
    /// raised as-is.
    #[must_use]
    pub fn first_failure() -> Self {
        Self {
            name: "first_failure",
            aggregate: None,
        }
    }

    /// Whether reports of this type can hold more than one violation.
    #[must_use]
    pub fn supports_aggregation(&self) -> bool {
        self.aggregate.is_some()
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Builds one report from a list of violations, if this type can.
    pub(crate) fn aggregator(&self) -> Option<fn(Vec<Violation>) -> Box<dyn Failure>> {
        self.aggregate
    }
}

impl Default for ReportType {
    fn default() -> Self {
        Self::aggregating::<InvariantViolation>()
    }
}

impl fmt::Debug for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportType")
            .field("name", &self.name)
            .field("aggregating", &self.supports_aggregation())
            .finish()
    }
}

fn aggregate_into<R: AggregatesErrors>(violations: Vec<Violation>) -> Box<dyn Failure> {
    Box::new(R::from_violations(violations))
}

// ============================================================================
// INVARIANT VIOLATION
// ============================================================================

/// Shape of an [`InvariantViolation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportShape {
    /// Exactly one violation.
    Single,
    /// Two or more violations.
    Aggregated,
}

/// The engine's default failure and report type.
///
/// Always collectible. Built either directly from a rule description (a
/// check that returned `false`) or from a list of violations.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct InvariantViolation {
    message: String,
    errors: Vec<Violation>,
}

impl InvariantViolation {
    /// A standalone violation carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Single or aggregated.
    #[must_use]
    pub fn shape(&self) -> ReportShape {
        if self.has_multiple_errors() {
            ReportShape::Aggregated
        } else {
            ReportShape::Single
        }
    }

    #[must_use]
    pub fn has_multiple_errors(&self) -> bool {
        self.errors.len() > 1
    }

    /// The aggregated violations, in check order.
    #[must_use]
    pub fn errors(&self) -> &[Violation] {
        &self.errors
    }

    /// Number of aggregated violations.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

impl Failure for InvariantViolation {
    fn severity(&self) -> Severity {
        Severity::Collectible
    }
}

impl AggregatesErrors for InvariantViolation {
    fn from_violations(violations: Vec<Violation>) -> Self {
        let messages: Vec<String> = violations.iter().map(Violation::message).collect();

        let message = match messages.as_slice() {
            [single] => single.clone(),
            _ => format!(
                "Multiple errors ({}):\n- {}",
                messages.len(),
                messages.join("\n- ")
            ),
        };

        Self {
            message,
            errors: violations,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn violation(check: &str, message: &str) -> Violation {
        Violation::new(check, Box::new(InvariantViolation::new(message)))
    }

    #[test]
    fn single_error_keeps_message_verbatim() {
        let report =
            InvariantViolation::from_violations(vec![violation("invariantA", "Single error message")]);

        assert_eq!(report.to_string(), "Single error message");
        assert_eq!(report.shape(), ReportShape::Single);
        assert_eq!(report.error_count(), 1);
        assert!(!report.has_multiple_errors());
    }

    #[test]
    fn multiple_errors_are_counted_and_listed() {
        let report = InvariantViolation::from_violations(vec![
            violation("invariantA", "First error"),
            violation("invariantB", "Second error"),
            violation("invariantC", "Third error"),
        ]);

        assert_eq!(
            report.to_string(),
            "Multiple errors (3):\n- First error\n- Second error\n- Third error"
        );
        assert_eq!(report.shape(), ReportShape::Aggregated);
        assert_eq!(report.error_count(), 3);
        assert_eq!(report.errors()[1].check(), "invariantB");
    }

    #[test]
    fn invariant_violation_is_collectible() {
        assert_eq!(InvariantViolation::new("x").severity(), Severity::Collectible);
    }

    #[test]
    fn report_type_capabilities() {
        let default = ReportType::default();
        assert!(default.supports_aggregation());
        assert_eq!(default.name(), "InvariantViolation");

        let first = ReportType::first_failure();
        assert!(!first.supports_aggregation());
        assert!(first.aggregator().is_none());
    }

    #[test]
    fn report_type_builds_boxed_report() {
        let report = ReportType::default()
            .aggregator()
            .map(|aggregate| aggregate(vec![violation("invariantA", "a"), violation("invariantB", "b")]))
            .map(|failure| failure.to_string());

        assert_eq!(report.as_deref(), Some("Multiple errors (2):\n- a\n- b"));
    }
}
