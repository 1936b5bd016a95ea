//! Process-wide per-type metadata cache
//!
//! Descriptors and invariant registries are pure data derived from a type's
//! static declaration, so each is computed once per type and shared for the
//! rest of the process. Entries are never invalidated.
//!
//! Values are computed outside the map lock. Two threads racing on the first
//! use of a type may both compute, but only the first insert is kept and
//! every caller gets that one.

use std::any::{Any, TypeId};
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::foundation::simple_type_name;

/// A read-through memo table keyed by type identity.
pub(crate) struct TypeCache {
    name: &'static str,
    entries: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl TypeCache {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: DashMap::new(),
        }
    }

    /// Returns the cached value for `K`, computing it with `init` on first use.
    ///
    /// Errors from `init` are not cached.
    pub(crate) fn get_or_try_init<K, V, E>(
        &self,
        init: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E>
    where
        K: 'static,
        V: Send + Sync + 'static,
    {
        let key = TypeId::of::<K>();

        if let Some(hit) = self.lookup::<V>(key) {
            trace!(cache = self.name, type_name = simple_type_name::<K>(), "cache hit");
            return Ok(hit);
        }

        let computed = Arc::new(init()?);
        let erased: Arc<dyn Any + Send + Sync> = computed.clone();
        let stored = Arc::clone(self.entries.entry(key).or_insert(Arc::clone(&erased)).value());

        if Arc::ptr_eq(&stored, &erased) {
            debug!(cache = self.name, type_name = simple_type_name::<K>(), "cached type metadata");
            return Ok(computed);
        }

        trace!(cache = self.name, type_name = simple_type_name::<K>(), "first use raced, keeping cached value");
        Ok(stored.downcast::<V>().unwrap_or(computed))
    }

    fn lookup<V: Send + Sync + 'static>(&self, key: TypeId) -> Option<Arc<V>> {
        let entry = Arc::clone(self.entries.get(&key)?.value());
        entry.downcast::<V>().ok()
    }

    /// Whether metadata for `K` has been computed.
    pub(crate) fn contains<K: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<K>())
    }
}

static CONSTRUCTORS: LazyLock<TypeCache> = LazyLock::new(|| TypeCache::new("constructors"));
static REGISTRIES: LazyLock<TypeCache> = LazyLock::new(|| TypeCache::new("invariants"));

/// Cache of resolved constructors.
pub(crate) fn constructors() -> &'static TypeCache {
    &CONSTRUCTORS
}

/// Cache of invariant registries.
pub(crate) fn registries() -> &'static TypeCache {
    &REGISTRIES
}
