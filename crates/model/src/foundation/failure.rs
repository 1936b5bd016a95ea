//! Invariant failures and violations
//!
//! Any error type can be raised from an invariant check by implementing
//! [`Failure`]. Its [`Severity`] decides whether the engine may batch it with
//! other failures or must surface it on its own.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

// ============================================================================
// SEVERITY
// ============================================================================

/// How a failure takes part in aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    /// Too severe to batch: reported on its own, ahead of any collectible ones.
    #[default]
    Immediate,
    /// May be aggregated with other collectible failures into one report.
    Collectible,
}

impl Severity {
    /// Whether the failure can be aggregated.
    #[must_use]
    pub fn is_collectible(&self) -> bool {
        matches!(self, Self::Collectible)
    }
}

// ============================================================================
// FAILURE
// ============================================================================

/// An error that can be raised from an invariant check.
///
/// Implementors opt into aggregation by returning [`Severity::Collectible`].
/// Everything else is treated as immediate.
///
/// ```rust,ignore
/// #[derive(Debug, thiserror::Error)]
/// #[error("currency {0} is not supported")]
/// struct UnsupportedCurrency(String);
///
/// impl Failure for UnsupportedCurrency {
///     fn severity(&self) -> Severity {
///         Severity::Collectible
///     }
/// }
/// ```
pub trait Failure: Error + Send + Sync + 'static {
    /// Aggregation behaviour of this failure.
    fn severity(&self) -> Severity {
        Severity::Immediate
    }
}

impl dyn Failure {
    /// Borrows the failure as its concrete type.
    ///
    /// A failure re-raised out of a [`Violation`] is looked up as the
    /// original failure.
    #[must_use]
    pub fn downcast_ref<T: Failure>(&self) -> Option<&T> {
        let error: &(dyn Error + 'static) = self.original();
        error.downcast_ref::<T>()
    }

    /// Whether the failure is a `T`.
    #[must_use]
    pub fn is<T: Failure>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

/// Result type returned by fallible invariant checks.
pub type CheckResult = Result<bool, Box<dyn Failure>>;

// ============================================================================
// VIOLATION
// ============================================================================

/// The normalized record of one failed check.
#[derive(Clone)]
pub struct Violation {
    check: Arc<str>,
    failure: Arc<dyn Failure>,
}

impl Violation {
    /// Records `failure` as raised by the check `check`.
    pub fn new(check: impl Into<Arc<str>>, failure: Box<dyn Failure>) -> Self {
        Self {
            check: check.into(),
            failure: Arc::from(failure),
        }
    }

    /// Identifier of the check that failed.
    #[must_use]
    pub fn check(&self) -> &str {
        &self.check
    }

    /// Message of the underlying failure.
    #[must_use]
    pub fn message(&self) -> String {
        self.failure.to_string()
    }

    /// Severity of the underlying failure.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.failure.severity()
    }

    /// Whether the violation can be aggregated.
    #[must_use]
    pub fn is_aggregatable(&self) -> bool {
        self.severity().is_collectible()
    }

    /// The underlying failure.
    #[must_use]
    pub fn failure(&self) -> &dyn Failure {
        self.failure.as_ref()
    }

    /// Hands the underlying failure back to the caller so it can be raised.
    #[must_use]
    pub fn into_failure(self) -> Box<dyn Failure> {
        Box::new(Raised(self.failure))
    }
}

impl fmt::Debug for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Violation")
            .field("check", &self.check)
            .field("message", &self.message())
            .field("severity", &self.severity())
            .finish()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.failure, f)
    }
}

/// A shared failure re-raised out of a [`Violation`].
///
/// Display, source and severity are forwarded, and `downcast_ref` on the
/// raised failure reaches through to the original type.
struct Raised(Arc<dyn Failure>);

impl fmt::Debug for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl Error for Raised {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

impl Failure for Raised {
    fn severity(&self) -> Severity {
        self.0.severity()
    }
}

impl dyn Failure {
    /// Unwraps a failure re-raised from a violation to the original failure.
    ///
    /// Failures that were never shared are returned as-is.
    #[must_use]
    pub fn original(&self) -> &dyn Failure {
        let error: &(dyn Error + 'static) = self;
        match error.downcast_ref::<Raised>() {
            Some(raised) => raised.0.as_ref(),
            None => self,
        }
    }
}

// ============================================================================
// VIOLATION SET
// ============================================================================

/// Ordered mapping from check identifier to violation.
///
/// Order is the registration order of the checks.
#[derive(Debug, Clone, Default)]
pub struct ViolationSet {
    violations: IndexMap<Arc<str>, Violation>,
}

impl ViolationSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation, keyed by its check identifier.
    pub fn insert(&mut self, violation: Violation) {
        self.violations
            .insert(Arc::clone(&violation.check), violation);
    }

    /// Looks up the violation recorded for `check`.
    #[must_use]
    pub fn get(&self, check: &str) -> Option<&Violation> {
        self.violations.get(check)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Failed check identifiers in order.
    pub fn checks(&self) -> impl Iterator<Item = &str> {
        self.violations.keys().map(AsRef::as_ref)
    }

    /// Violations in order.
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.values()
    }

    /// Messages in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.iter().map(Violation::message).collect()
    }

    /// Consumes the set into an ordered list.
    #[must_use]
    pub fn into_vec(self) -> Vec<Violation> {
        self.violations.into_values().collect()
    }
}

impl IntoIterator for ViolationSet {
    type Item = Violation;
    type IntoIter = indexmap::map::IntoValues<Arc<str>, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_values()
    }
}

impl FromIterator<Violation> for ViolationSet {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        let mut set = Self::new();
        for violation in iter {
            set.insert(violation);
        }
        set
    }
}

impl fmt::Display for ViolationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join(","))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    struct Soft(&'static str);

    impl Failure for Soft {
        fn severity(&self) -> Severity {
            Severity::Collectible
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("hard: {0}")]
    struct Hard(&'static str);

    impl Failure for Hard {}

    #[test]
    fn default_severity_is_immediate() {
        let violation = Violation::new("invariantHard", Box::new(Hard("boom")));
        assert_eq!(violation.severity(), Severity::Immediate);
        assert!(!violation.is_aggregatable());
        assert_eq!(violation.message(), "hard: boom");
    }

    #[test]
    fn collectible_failure_is_aggregatable() {
        let violation = Violation::new("invariantSoft", Box::new(Soft("meh")));
        assert!(violation.is_aggregatable());
    }

    #[test]
    fn raised_failure_downcasts_to_original() {
        let violation = Violation::new("invariantHard", Box::new(Hard("boom")));
        let raised = violation.into_failure();

        assert_eq!(raised.to_string(), "hard: boom");
        assert!(raised.original().is::<Hard>());
        assert!(!raised.original().is::<Soft>());
        assert!(raised.is::<Hard>());
        assert_eq!(raised.downcast_ref::<Hard>().map(|h| h.0), Some("boom"));
        assert!(raised.downcast_ref::<Soft>().is_none());
    }

    #[test]
    fn set_preserves_insertion_order() {
        let set: ViolationSet = [
            Violation::new("invariantB", Box::new(Soft("b"))),
            Violation::new("invariantA", Box::new(Soft("a"))),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.checks().collect::<Vec<_>>(), ["invariantB", "invariantA"]);
        assert_eq!(set.messages(), ["b", "a"]);
        assert_eq!(set.to_string(), "b,a");
        assert_eq!(set.get("invariantA").map(Violation::message).as_deref(), Some("a"));
    }
}
