//! Root Scopes
//!
//! A root scope is the isolation boundary of one mounted subtree. Each
//! scope owns its own [`Store`], so two subtrees that use the same
//! descriptors hold fully independent values, defaults and subscriber
//! lists.
//!
//! # Lifecycle
//!
//! 1. [`RootScope::new`] allocates a fresh [`ScopeId`] and registers an
//!    empty store for it in the process-wide registry.
//!
//! 2. Every store operation takes the scope id explicitly. Consumers that
//!    do not carry the id around pick it up from the ambient scope set by
//!    [`RootScope::enter`].
//!
//! 3. Dropping the `RootScope` removes its store from the registry. The
//!    store and all of its records are freed once in-flight operations
//!    release their handles.

mod ambient;
pub(crate) mod registry;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::config::ScopeConfig;
use crate::error::Result;
use crate::store::Store;

pub use ambient::{current_scope, require_scope, ScopeGuard};

/// Unique identifier for a root scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u64);

impl ScopeId {
    /// Generate a new unique scope ID.
    pub(crate) fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope-{}", self.0)
    }
}

/// Owner of one scope's store.
///
/// The scope lives exactly as long as this value.
pub struct RootScope {
    id: ScopeId,
}

impl RootScope {
    /// Create a scope with the default config.
    pub fn new() -> Self {
        Self::with_config(ScopeConfig::default())
    }

    /// Create a scope with the given config.
    pub fn with_config(config: ScopeConfig) -> Self {
        let id = ScopeId::new();
        debug!(scope = %id, name = config.label(), "creating root scope");

        registry::insert(Arc::new(Store::new(id, config)));
        Self { id }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Make this scope the ambient scope of the current thread until the
    /// returned guard is dropped.
    pub fn enter(&self) -> ScopeGuard<'_> {
        ScopeGuard::enter(self.id)
    }

    /// This scope's store.
    pub fn store(&self) -> Result<Arc<Store>> {
        registry::lookup(self.id)
    }
}

impl Default for RootScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RootScope {
    fn drop(&mut self) {
        if registry::remove(self.id).is_some() {
            debug!(scope = %self.id, "tore down root scope");
        }
    }
}

impl fmt::Debug for RootScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootScope").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn scope_ids_are_unique() {
        let a = RootScope::new();
        let b = RootScope::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn new_scope_has_empty_store() {
        let scope = RootScope::with_config(ScopeConfig::named("fresh"));
        let store = scope.store().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.scope(), scope.id());
        assert_eq!(store.config().label(), "fresh");
    }

    #[test]
    fn drop_tears_down_the_store() {
        let scope = RootScope::new();
        let id = scope.id();
        assert!(registry::is_registered(id));

        drop(scope);

        assert!(!registry::is_registered(id));
        assert_eq!(registry::lookup(id).unwrap_err(), StoreError::UnknownScope(id));
    }

    #[test]
    fn display_is_prefixed() {
        assert_eq!(ScopeId(3).to_string(), "scope-3");
    }
}
