//! Per-Scope Store
//!
//! A [`Store`] is the runtime table of one root scope: key → live record.
//! It owns every piece of mutable state of that scope. Stores are created
//! empty when the scope is created, accumulate records as descriptors are
//! first used, and are discarded as a whole when the scope is torn down.
//!
//! # Locking
//!
//! The table sits behind a mutex so that stores can live in the
//! process-wide scope registry. The lock is only held for table lookups
//! and updates. It is always released before selector derivations or
//! subscriber callbacks run, because both may re-enter the store.

mod record;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::ScopeConfig;
use crate::descriptor::{Atom, Descriptor, DescriptorKind, Key, Value};
use crate::error::{Result, StoreError};
use crate::reactive::{Subscriber, SubscriberId};
use crate::scope::ScopeId;

use record::{AtomRecord, Record, SelectorRecord};

/// The live value table of one root scope.
pub struct Store {
    scope: ScopeId,
    config: ScopeConfig,
    records: Mutex<IndexMap<Key, Record>>,
}

impl Store {
    /// Create an empty store for the given scope.
    pub(crate) fn new(scope: ScopeId, config: ScopeConfig) -> Self {
        Self {
            scope,
            config,
            records: Mutex::new(IndexMap::new()),
        }
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    /// Register a descriptor, creating its record if absent.
    ///
    /// Registering the same descriptor twice is a no-op. Registering a
    /// different descriptor under a key that is already taken fails with
    /// [`StoreError::DuplicateKey`].
    ///
    /// Returns whether a new record was created.
    pub fn register<T: Value>(&self, descriptor: &Descriptor<T>) -> Result<bool> {
        let mut records = self.records.lock();
        self.register_locked(&mut records, descriptor)
    }

    fn register_locked<T: Value>(
        &self,
        records: &mut IndexMap<Key, Record>,
        descriptor: &Descriptor<T>,
    ) -> Result<bool> {
        let key = descriptor.key();

        if let Some(existing) = records.get(key.as_str()) {
            if existing.descriptor() == descriptor.id() {
                return Ok(false);
            }
            return Err(StoreError::DuplicateKey { key: key.clone() });
        }

        let record = match descriptor {
            Descriptor::Atom(atom) => Record::Atom(AtomRecord::new(atom)),
            Descriptor::Selector(selector) => Record::Selector(SelectorRecord::new(selector)),
        };
        records.insert(key.clone(), record);

        debug!(scope = %self.scope, key = %key, kind = ?descriptor.kind(), "registered record");
        Ok(true)
    }

    /// Read the current value of an atom, registering it first if needed.
    pub fn atom_value<T: Value>(&self, atom: &Atom<T>) -> Result<T> {
        let mut records = self.records.lock();
        self.register_locked(&mut records, &Descriptor::Atom(atom.clone()))?;

        match records.get(atom.key().as_str()) {
            Some(Record::Atom(record)) => record.value(),
            Some(Record::Selector(_)) => Err(StoreError::NotAnAtom { key: atom.key().clone() }),
            None => Err(StoreError::UnknownKey { key: atom.key().clone() }),
        }
    }

    /// Write an atom value.
    ///
    /// Returns the subscribers to notify, in subscription order, or `None`
    /// when the value was equal to the current one. The caller invokes them
    /// after this call returns, with the table unlocked.
    pub(crate) fn write_atom<T: Value>(
        &self,
        atom: &Atom<T>,
        value: T,
    ) -> Result<Option<Vec<Arc<Subscriber>>>> {
        let mut records = self.records.lock();
        let key = atom.key();

        if let Some(Record::Selector(_)) = records.get(key.as_str()) {
            return Err(StoreError::NotAnAtom { key: key.clone() });
        }
        self.register_locked(&mut records, &Descriptor::Atom(atom.clone()))?;

        let Some(Record::Atom(record)) = records.get_mut(key.as_str()) else {
            return Err(StoreError::NotAnAtom { key: key.clone() });
        };

        if !record.replace(value)? {
            return Ok(None);
        }

        let subscribers = record.subscribers().values().cloned().collect();
        Ok(Some(subscribers))
    }

    /// The default value of a registered atom.
    pub(crate) fn atom_default<T: Value>(&self, atom: &Atom<T>) -> Result<T> {
        let mut records = self.records.lock();
        self.register_locked(&mut records, &Descriptor::Atom(atom.clone()))?;

        match records.get(atom.key().as_str()) {
            Some(Record::Atom(record)) => record.default_value(),
            _ => Err(StoreError::NotAnAtom { key: atom.key().clone() }),
        }
    }

    /// Add a subscriber to an existing record.
    pub(crate) fn subscribe(&self, key: &Key, subscriber: Arc<Subscriber>) -> Result<()> {
        let mut records = self.records.lock();
        let record = records
            .get_mut(key.as_str())
            .ok_or_else(|| StoreError::UnknownKey { key: key.clone() })?;

        let subscribers = record.subscribers_mut();
        if subscribers.contains_key(&subscriber.id()) {
            return Err(StoreError::DuplicateSubscription {
                key: key.clone(),
                subscriber: subscriber.id(),
            });
        }
        subscribers.insert(subscriber.id(), subscriber);
        Ok(())
    }

    /// Remove one subscriber from one key. Returns whether it was present.
    pub(crate) fn unsubscribe(&self, key: &Key, subscriber: SubscriberId) -> bool {
        let mut records = self.records.lock();
        records
            .get_mut(key.as_str())
            .map(|record| record.subscribers_mut().shift_remove(&subscriber).is_some())
            .unwrap_or(false)
    }

    /// Whether a record exists for the key.
    pub fn contains(&self, key: &str) -> bool {
        self.records.lock().contains_key(key)
    }

    /// The kind of record stored under the key, if any.
    pub fn kind_of(&self, key: &str) -> Option<DescriptorKind> {
        self.records.lock().get(key).map(Record::kind)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Number of subscribers of the key (zero for unknown keys).
    pub fn subscriber_count(&self, key: &str) -> usize {
        self.records
            .lock()
            .get(key)
            .map(|record| record.subscribers().len())
            .unwrap_or(0)
    }

    /// Keys in registration order.
    pub fn keys(&self) -> Vec<Key> {
        self.records.lock().values().map(|record| record.key().clone()).collect()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("scope", &self.scope)
            .field("name", &self.config.label())
            .field("records", &self.len())
            .finish()
    }
}
