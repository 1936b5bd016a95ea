//! Invariant registration and discovery
//!
//! A type lists its checks once, in [`HasInvariants::declare_invariants`].
//! The resulting [`InvariantRegistry`] is validated, then cached for the
//! rest of the process.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::cache;
use crate::foundation::{CheckResult, RegistryError, simple_type_name};
use crate::invariant::HasInvariants;

/// Prefix every check identifier must carry.
pub const PREFIX: &str = "invariant";

/// Identifiers that start with the prefix but are not checks.
pub const RESERVED: [&str; 2] = ["invariants", "invariantHandler"];

type CheckFn<T> = Arc<dyn Fn(&T) -> CheckResult + Send + Sync>;

// ============================================================================
// REGISTERED CHECK
// ============================================================================

/// One registered check with its rule description.
pub struct RegisteredCheck<T> {
    id: Arc<str>,
    rule: String,
    run: CheckFn<T>,
}

impl<T> RegisteredCheck<T> {
    /// Check identifier, e.g. `invariantAmountIsPositive`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn shared_id(&self) -> Arc<str> {
        Arc::clone(&self.id)
    }

    /// Human-readable rule, e.g. `amount is positive`.
    #[must_use]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Runs the check against `instance`.
    pub fn run(&self, instance: &T) -> CheckResult {
        (self.run)(instance)
    }
}

impl<T> Clone for RegisteredCheck<T> {
    fn clone(&self) -> Self {
        Self {
            id: Arc::clone(&self.id),
            rule: self.rule.clone(),
            run: Arc::clone(&self.run),
        }
    }
}

impl<T> fmt::Debug for RegisteredCheck<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCheck")
            .field("id", &self.id)
            .field("rule", &self.rule)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Collects the checks a type declares.
///
/// Invalid registrations do not panic: the first one is kept and reported
/// when the registry is built.
pub struct Invariants<T> {
    type_name: &'static str,
    checks: Vec<RegisteredCheck<T>>,
    error: Option<RegistryError>,
}

impl<T: 'static> Invariants<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            type_name: simple_type_name::<T>(),
            checks: Vec::new(),
            error: None,
        }
    }

    /// Registers a boolean check. A `false` result becomes a violation whose
    /// message is the humanized identifier.
    pub fn check<F>(&mut self, id: &str, check: F) -> &mut Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.register(id, None, Arc::new(move |instance: &T| Ok(check(instance))))
    }

    /// Registers a check that may raise its own failure.
    pub fn try_check<F>(&mut self, id: &str, check: F) -> &mut Self
    where
        F: Fn(&T) -> CheckResult + Send + Sync + 'static,
    {
        self.register(id, None, Arc::new(check))
    }

    /// Like [`check`](Self::check), with an explicit rule description.
    pub fn check_described<F>(&mut self, id: &str, rule: impl Into<String>, check: F) -> &mut Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.register(
            id,
            Some(rule.into()),
            Arc::new(move |instance: &T| Ok(check(instance))),
        )
    }

    /// Like [`try_check`](Self::try_check), with an explicit rule description.
    pub fn try_check_described<F>(
        &mut self,
        id: &str,
        rule: impl Into<String>,
        check: F,
    ) -> &mut Self
    where
        F: Fn(&T) -> CheckResult + Send + Sync + 'static,
    {
        self.register(id, Some(rule.into()), Arc::new(check))
    }

    fn register(&mut self, id: &str, rule: Option<String>, run: CheckFn<T>) -> &mut Self {
        if self.error.is_some() {
            return self;
        }

        if let Err(error) = self.validate_id(id) {
            self.error = Some(error);
            return self;
        }

        self.checks.push(RegisteredCheck {
            id: Arc::from(id),
            rule: rule.unwrap_or_else(|| humanize(id)),
            run,
        });
        self
    }

    fn validate_id(&self, id: &str) -> Result<(), RegistryError> {
        let type_name = self.type_name;

        if RESERVED.contains(&id) {
            return Err(RegistryError::ReservedIdentifier {
                type_name,
                check: id.to_owned(),
            });
        }
        if !id.starts_with(PREFIX) {
            return Err(RegistryError::MissingPrefix {
                type_name,
                check: id.to_owned(),
            });
        }
        if self.checks.iter().any(|c| c.id() == id) {
            return Err(RegistryError::DuplicateCheck {
                type_name,
                check: id.to_owned(),
            });
        }
        Ok(())
    }

    /// Finishes registration.
    pub fn build(self) -> Result<InvariantRegistry<T>, RegistryError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(InvariantRegistry {
                type_name: self.type_name,
                checks: self.checks,
            }),
        }
    }
}

impl<T: 'static> Default for Invariants<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// The ordered checks of one type.
pub struct InvariantRegistry<T> {
    type_name: &'static str,
    checks: Vec<RegisteredCheck<T>>,
}

impl<T> InvariantRegistry<T> {
    /// Simple name of the owning type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Checks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredCheck<T>> {
        self.checks.iter()
    }

    /// Check identifiers in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(RegisteredCheck::id)
    }

    /// Rule description for `id`.
    #[must_use]
    pub fn rule(&self, id: &str) -> Option<&str> {
        self.checks.iter().find(|c| c.id() == id).map(RegisteredCheck::rule)
    }

    /// Identifier to rule description, in registration order.
    #[must_use]
    pub fn rules(&self) -> IndexMap<&str, &str> {
        self.checks.iter().map(|c| (c.id(), c.rule())).collect()
    }
}

impl<T> fmt::Debug for InvariantRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvariantRegistry")
            .field("type_name", &self.type_name)
            .field("checks", &self.checks)
            .finish()
    }
}

/// The cached invariant registry of `T`.
pub fn invariants<T: HasInvariants>() -> Result<Arc<InvariantRegistry<T>>, RegistryError> {
    cache::registries().get_or_try_init::<T, _, _>(build::<T>)
}

/// Builds `T`'s registry, bypassing the cache when `cached` is false.
pub(crate) fn invariants_with<T: HasInvariants>(
    cached: bool,
) -> Result<Arc<InvariantRegistry<T>>, RegistryError> {
    if cached {
        invariants::<T>()
    } else {
        build::<T>().map(Arc::new)
    }
}

/// Whether `T`'s registry has been built and cached.
#[must_use]
pub fn is_registered<T: HasInvariants>() -> bool {
    cache::registries().contains::<T>()
}

fn build<T: HasInvariants>() -> Result<InvariantRegistry<T>, RegistryError> {
    let mut declared = Invariants::new();
    T::declare_invariants(&mut declared);
    declared.build()
}

// ============================================================================
// HUMANIZE
// ============================================================================

/// Turns a check identifier into a rule description.
///
/// Strips the `invariant` prefix and splits camel or snake case into
/// lower-case words. A run of capitals is one word, so
/// `invariantValidISOCode` reads `valid iso code`.
#[must_use]
pub fn humanize(id: &str) -> String {
    let body = id.strip_prefix(PREFIX).unwrap_or(id);
    let chars: Vec<char> = body.chars().collect();

    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            flush(&mut words, &mut current);
            continue;
        }

        if c.is_uppercase() {
            let after_capital = i > 0 && chars[i - 1].is_uppercase();
            let before_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if !after_capital || before_lower {
                flush(&mut words, &mut current);
            }
        }

        current.extend(c.to_lowercase());
    }
    flush(&mut words, &mut current);

    if words.is_empty() {
        return id.to_lowercase();
    }
    words.join(" ")
}

fn flush(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{Failure, InvariantViolation};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    struct Money {
        amount: i64,
    }

    #[rstest]
    #[case("invariantAmountMustBeGreaterThanZero", "amount must be greater than zero")]
    #[case("invariantValidISOCode", "valid iso code")]
    #[case("invariantISOCodeIsValid", "iso code is valid")]
    #[case("invariantHasURL", "has url")]
    #[case("invariantHas3Items", "has3 items")]
    #[case("invariant_amount_is_positive", "amount is positive")]
    #[case("invariantPositive", "positive")]
    #[case("invariant", "invariant")]
    fn humanizes_identifiers(#[case] id: &str, #[case] rule: &str) {
        assert_eq!(humanize(id), rule);
    }

    #[test]
    fn preserves_registration_order() {
        let mut declared = Invariants::<Money>::new();
        declared
            .check("invariantB", |m| m.amount > 0)
            .check("invariantA", |m| m.amount < 100)
            .check_described("invariantC", "custom rule", |_| true);
        let registry = declared.build().unwrap();

        assert_eq!(registry.ids().collect::<Vec<_>>(), ["invariantB", "invariantA", "invariantC"]);
        assert_eq!(registry.rule("invariantC"), Some("custom rule"));
        assert_eq!(registry.rules().get("invariantA"), Some(&"a"));
        assert_eq!(registry.type_name(), "Money");
    }

    #[rstest]
    #[case("invariants", "MODEL_CHECK_RESERVED")]
    #[case("invariantHandler", "MODEL_CHECK_RESERVED")]
    #[case("amountIsPositive", "MODEL_CHECK_PREFIX")]
    fn rejects_invalid_identifiers(#[case] id: &str, #[case] code: &str) {
        let mut declared = Invariants::<Money>::new();
        declared.check(id, |_| true);
        assert_eq!(declared.build().unwrap_err().code(), code);
    }

    #[test]
    fn rejects_duplicates() {
        let mut declared = Invariants::<Money>::new();
        declared
            .check("invariantPositive", |m| m.amount > 0)
            .check("invariantPositive", |m| m.amount >= 0);

        assert_eq!(
            declared.build().unwrap_err(),
            RegistryError::DuplicateCheck {
                type_name: "Money",
                check: "invariantPositive".into(),
            }
        );
    }

    #[test]
    fn runs_registered_checks() {
        let mut declared = Invariants::<Money>::new();
        declared.try_check("invariantPositive", |m| {
            if m.amount < 0 {
                return Err(Box::new(InvariantViolation::new("negative")) as Box<dyn Failure>);
            }
            Ok(true)
        });
        let registry = declared.build().unwrap();
        let check = registry.iter().next().unwrap();

        assert!(check.run(&Money { amount: 1 }).unwrap());
        assert_eq!(check.run(&Money { amount: -1 }).unwrap_err().to_string(), "negative");
    }

    proptest! {
        #[test]
        fn pascal_case_words_round_trip(words in prop::collection::vec("[a-z]{1,8}", 1..6)) {
            let id: String = std::iter::once(PREFIX.to_owned())
                .chain(words.iter().map(|w| {
                    let mut chars = w.chars();
                    let head = chars.next().map(|c| c.to_ascii_uppercase()).into_iter();
                    head.chain(chars).collect::<String>()
                }))
                .collect();

            prop_assert_eq!(humanize(&id), words.join(" "));
        }

        #[test]
        fn humanize_is_idempotent(words in prop::collection::vec("[a-z][a-z0-9]{0,7}", 1..6)) {
            let rule = words.join(" ");
            let once = humanize(&rule);
            prop_assert_eq!(humanize(&once), once.clone());
            prop_assert_eq!(once, rule);
        }
    }
}
