//! Invariant execution

use tracing::trace;

use crate::foundation::{InvariantViolation, Violation, ViolationSet};
use crate::invariant::registry::InvariantRegistry;

/// Runs every check in `registry` against `instance`.
///
/// All checks run, whatever the earlier ones returned. A `false` result is
/// recorded as a collectible [`InvariantViolation`] carrying the rule text; a
/// raised failure is recorded as-is.
pub fn execute<T>(instance: &T, registry: &InvariantRegistry<T>) -> ViolationSet {
    let mut violations = ViolationSet::new();

    for check in registry.iter() {
        let outcome = check.run(instance);
        trace!(
            type_name = registry.type_name(),
            check = check.id(),
            passed = matches!(outcome, Ok(true)),
            "invariant executed"
        );

        match outcome {
            Ok(true) => {}
            Ok(false) => violations.insert(Violation::new(
                check.shared_id(),
                Box::new(InvariantViolation::new(check.rule())),
            )),
            Err(failure) => violations.insert(Violation::new(check.shared_id(), failure)),
        }
    }

    violations
}
