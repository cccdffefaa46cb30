//! Scope Configuration
//!
//! Per-scope settings. A config is fixed when the root scope is created and
//! lives in that scope's store for its whole lifetime.
//!
//! Configs are plain serde types so a host application can keep them next
//! to the rest of its settings:
//!
//! ```json
//! { "name": "sidebar", "missing_setter": "reject" }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// What happens when a selector without a setter is written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingSetterPolicy {
    /// The write does nothing. Logged at debug level.
    #[default]
    Ignore,

    /// The write fails with [`StoreError::NoSetter`].
    Reject,
}

/// Settings for one root scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Human-readable label used in log output.
    pub name: Option<String>,

    /// Behavior of writes to selectors that have no setter.
    pub missing_setter: MissingSetterPolicy,
}

impl ScopeConfig {
    /// Create a config with the given scope name and default policies.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Replace the missing-setter policy.
    pub fn with_missing_setter(mut self, policy: MissingSetterPolicy) -> Self {
        self.missing_setter = policy;
        self
    }

    /// Parse a config from JSON. Absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| StoreError::InvalidConfig(e.to_string()))
    }

    /// Label for log output: the configured name or `"unnamed"`.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }
}
