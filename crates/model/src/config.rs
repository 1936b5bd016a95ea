//! Engine configuration

use serde::{Deserialize, Serialize};

/// Whether invariants run automatically after a model is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoCheckPolicy {
    /// Each type decides through `Model::should_auto_check_invariants`.
    #[default]
    PerType,
    /// Check every constructed instance.
    Always,
    /// Never check automatically; callers run `check_invariants` themselves.
    Never,
}

impl AutoCheckPolicy {
    /// Resolves the policy against a type's own preference.
    #[must_use]
    pub fn applies(self, type_default: bool) -> bool {
        match self {
            Self::PerType => type_default,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Configuration for an [`Engine`](crate::construct::Engine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Automatic invariant checking after construction
    pub auto_check: AutoCheckPolicy,
    /// Keep resolved descriptors and registries for the process lifetime.
    ///
    /// When disabled they are rebuilt on every call.
    pub cache_metadata: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_check: AutoCheckPolicy::PerType,
            cache_metadata: true,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks invariants for every type, whatever its role.
    pub fn strict() -> Self {
        Self {
            auto_check: AutoCheckPolicy::Always,
            ..Self::default()
        }
    }

    /// Never checks invariants automatically.
    pub fn permissive() -> Self {
        Self {
            auto_check: AutoCheckPolicy::Never,
            ..Self::default()
        }
    }

    pub fn with_auto_check(mut self, policy: AutoCheckPolicy) -> Self {
        self.auto_check = policy;
        self
    }

    pub fn with_cache_metadata(mut self, enabled: bool) -> Self {
        self.cache_metadata = enabled;
        self
    }
}
