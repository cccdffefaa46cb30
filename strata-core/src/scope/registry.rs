//! Process-wide map from scope id to store.
//!
//! Lookups clone the store's `Arc` out of the map and drop the map guard
//! immediately, so no shard lock is ever held while store code (and
//! therefore user callbacks) runs.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use super::ScopeId;
use crate::error::{Result, StoreError};
use crate::store::Store;

static STORES: OnceLock<DashMap<ScopeId, Arc<Store>>> = OnceLock::new();

fn stores() -> &'static DashMap<ScopeId, Arc<Store>> {
    STORES.get_or_init(DashMap::new)
}

pub(crate) fn insert(store: Arc<Store>) {
    stores().insert(store.scope(), store);
}

pub(crate) fn remove(scope: ScopeId) -> Option<Arc<Store>> {
    stores().remove(&scope).map(|(_, store)| store)
}

/// The store of a live scope.
pub(crate) fn lookup(scope: ScopeId) -> Result<Arc<Store>> {
    stores()
        .get(&scope)
        .map(|entry| Arc::clone(entry.value()))
        .ok_or(StoreError::UnknownScope(scope))
}

pub(crate) fn is_registered(scope: ScopeId) -> bool {
    stores().contains_key(&scope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScopeConfig;

    #[test]
    fn insert_lookup_remove() {
        let id = ScopeId::new();
        insert(Arc::new(Store::new(id, ScopeConfig::default())));

        let store = lookup(id).unwrap();
        assert_eq!(store.scope(), id);

        let removed = remove(id).unwrap();
        assert!(Arc::ptr_eq(&store, &removed));
        assert!(lookup(id).is_err());
        assert!(remove(id).is_none());
    }
}
