//! The construction pipeline
//!
//! ```text
//! Args -> resolve -> bind -> type-check -> materialize -> invariants -> T
//! ```
//!
//! Binding errors surface before any type is checked, and the first type
//! mismatch stops the pipeline. Invariants run last, on the materialized
//! instance, only when the type (or the engine's policy) asks for it.

use std::sync::LazyLock;

use tracing::{debug, trace};

use crate::binding::{Args, bind};
use crate::config::EngineConfig;
use crate::descriptor::resolve_with;
use crate::foundation::{ModelResult, Value, simple_type_name};
use crate::invariant::{HasInvariants, InvariantCheck};
use crate::model::{Attributes, Model};
use crate::typecheck;

static DEFAULT_ENGINE: LazyLock<Engine> = LazyLock::new(Engine::default);

/// Runs the construction pipeline under one configuration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The process-wide engine used by [`construct`] and `Model::make`.
    #[must_use]
    pub fn global() -> &'static Engine {
        &DEFAULT_ENGINE
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds a `T` from `args`.
    pub fn construct<T: Model>(&self, args: impl Into<Args>) -> ModelResult<T> {
        let type_name = simple_type_name::<T>();
        let constructor = resolve_with::<T>(self.config.cache_metadata)?;
        let descriptor = constructor.descriptor();

        let mut bound = bind(descriptor, args.into())?;
        trace!(type_name, params = bound.len(), "arguments bound");

        for (param, (_, value)) in descriptor.params().iter().zip(bound.iter()) {
            if let Some(value) = value {
                typecheck::ensure(descriptor.type_name(), param, Some(value))?;
            }
        }

        let instance = constructor.materialize(&mut bound)?;

        if self.config.auto_check.applies(T::should_auto_check_invariants()) {
            debug!(type_name, "checking invariants after construction");
            self.check(&instance)?;
        }

        Ok(instance)
    }

    /// Runs `instance`'s invariants under this engine's configuration.
    pub fn check<T: HasInvariants>(&self, instance: &T) -> ModelResult<()> {
        InvariantCheck::new(instance)
            .cached(self.config.cache_metadata)
            .run()
    }

    /// Rebuilds `instance` with some attributes replaced.
    ///
    /// The copy goes through the full pipeline, so overrides are bound,
    /// type-checked and validated like fresh arguments. The identity
    /// attribute of an entity is never overridden.
    pub fn with_overrides<T, I, K, V>(&self, instance: &T, overrides: I) -> ModelResult<T>
    where
        T: Model + Attributes,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let identity = T::role().identity_attribute();
        let mut values = instance.values();

        for (name, value) in overrides {
            let name = name.into();
            if identity == Some(name.as_str()) {
                trace!(type_name = simple_type_name::<T>(), attribute = %name, "identity override ignored");
                continue;
            }
            values.insert(name, value.into());
        }

        self.construct(Args::from(values))
    }
}

/// Builds a `T` with the default engine.
pub fn construct<T: Model>(args: impl Into<Args>) -> ModelResult<T> {
    Engine::global().construct(args)
}

/// Rebuilds `instance` with overrides, using the default engine.
pub fn with_overrides<T, I, K, V>(instance: &T, overrides: I) -> ModelResult<T>
where
    T: Model + Attributes,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    Engine::global().with_overrides(instance, overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AutoCheckPolicy;
    use crate::descriptor::{Constructor, Param, TypeDescriptor};
    use crate::foundation::{ConstructionError, TypeTag};
    use crate::invariant::Invariants;
    use crate::model::Role;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        value: i64,
    }

    impl HasInvariants for Counter {
        fn declare_invariants(invariants: &mut Invariants<Self>) {
            invariants.check("invariantValueIsNotNegative", |c| c.value >= 0);
        }
    }

    impl Model for Counter {
        fn constructor() -> Option<Constructor<Self>> {
            let shape = TypeDescriptor::of::<Self>().param(Param::new("value", TypeTag::Int));
            Some(Constructor::new(shape, |args| {
                Ok(Counter {
                    value: args.take("value")?,
                })
            }))
        }
    }

    impl Attributes for Counter {
        fn values(&self) -> IndexMap<String, Value> {
            IndexMap::from([("value".to_owned(), Value::Int(self.value))])
        }
    }

    #[derive(Debug, Clone)]
    struct Account {
        id: String,
        balance: i64,
    }

    impl HasInvariants for Account {
        fn declare_invariants(invariants: &mut Invariants<Self>) {
            invariants.check("invariantBalanceIsNotNegative", |a| a.balance >= 0);
        }
    }

    impl Model for Account {
        fn constructor() -> Option<Constructor<Self>> {
            let shape = TypeDescriptor::of::<Self>()
                .param(Param::new("id", TypeTag::String))
                .param(Param::new("balance", TypeTag::Int).with_default(0));
            Some(Constructor::new(shape, |args| {
                Ok(Account {
                    id: args.take("id")?,
                    balance: args.take("balance")?,
                })
            }))
        }

        fn role() -> Role {
            Role::Entity
        }
    }

    impl Attributes for Account {
        fn values(&self) -> IndexMap<String, Value> {
            IndexMap::from([
                ("id".to_owned(), Value::from(self.id.as_str())),
                ("balance".to_owned(), Value::Int(self.balance)),
            ])
        }
    }

    #[test]
    fn plain_models_skip_invariants_by_default() {
        let counter: Counter = construct(Args::positional([-1])).unwrap();
        assert_eq!(counter.value, -1);
        assert!(counter.check_invariants().is_err());
    }

    #[test]
    fn strict_engine_checks_every_type() {
        let err = Engine::new(EngineConfig::strict())
            .construct::<Counter>(Args::positional([-1]))
            .unwrap_err();
        assert!(err.is_invariant());
        assert_eq!(err.to_string(), "value is not negative");
    }

    #[test]
    fn entities_check_by_default_unless_disabled() {
        let err = construct::<Account>(Args::positional([Value::from("A-1"), Value::Int(-5)])).unwrap_err();
        assert_eq!(err.code(), "MODEL_INVARIANT");

        let permissive = Engine::new(EngineConfig::new().with_auto_check(AutoCheckPolicy::Never));
        let account = permissive
            .construct::<Account>(Args::positional([Value::from("A-1"), Value::Int(-5)]))
            .unwrap();
        assert_eq!(account.balance, -5);
    }

    #[test]
    fn type_mismatch_stops_before_materialize() {
        let err = construct::<Counter>(Args::positional(["ten"])).unwrap_err();
        assert!(matches!(err, ConstructionError::Type(_)));
        assert_eq!(
            err.to_string(),
            "Counter::make(): parameter \"value\" must be of type int, string given"
        );
    }

    #[test]
    fn overrides_rebuild_through_pipeline() {
        let counter = Counter { value: 1 };
        let bumped = with_overrides(&counter, [("value", 2)]).unwrap();
        assert_eq!(bumped, Counter { value: 2 });

        let err = with_overrides(&counter, [("value", "two")]).unwrap_err();
        assert_eq!(err.code(), "MODEL_TYPE_MISMATCH");
    }

    #[test]
    fn entity_identity_is_never_overridden() {
        let account = Account {
            id: "A-1".into(),
            balance: 10,
        };
        let changed = with_overrides(
            &account,
            [("id", Value::from("B-2")), ("balance", Value::Int(20))],
        )
        .unwrap();

        assert_eq!(changed.id, "A-1");
        assert_eq!(changed.balance, 20);
    }

    #[test]
    fn uncached_engine_still_constructs() {
        let engine = Engine::new(EngineConfig::new().with_cache_metadata(false));
        let counter: Counter = engine.construct(Args::positional([3])).unwrap();
        assert_eq!(counter.value, 3);
    }
}
