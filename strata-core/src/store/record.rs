//! Live Value Records
//!
//! One record exists per key per store. The record is a tagged variant:
//! atoms keep their default and current value, selectors keep nothing but
//! their subscribers (selectors are recomputed on every read).

use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::descriptor::{Atom, DescriptorId, DescriptorKind, Key, Selector, Value};
use crate::error::{Result, StoreError};
use crate::reactive::{Subscriber, SubscriberId};

/// A type-erased stored value.
pub(crate) type Erased = Arc<dyn Any + Send + Sync>;

/// Ordered subscriber set of one key.
pub(crate) type SubscriberSet = IndexMap<SubscriberId, Arc<Subscriber>>;

/// A live atom value.
pub(crate) struct AtomRecord {
    key: Key,
    descriptor: DescriptorId,
    default: Erased,
    value: Erased,
    subscribers: SubscriberSet,
}

impl AtomRecord {
    pub(crate) fn new<T: Value>(atom: &Atom<T>) -> Self {
        let default: Erased = Arc::new(atom.default_value().clone());
        Self {
            key: atom.key().clone(),
            descriptor: atom.id(),
            value: Arc::clone(&default),
            default,
            subscribers: SubscriberSet::new(),
        }
    }

    /// Read the current value as `T`.
    pub(crate) fn value<T: Value>(&self) -> Result<T> {
        downcast(&self.key, &self.value)
    }

    /// Read the default value as `T`.
    pub(crate) fn default_value<T: Value>(&self) -> Result<T> {
        downcast(&self.key, &self.default)
    }

    pub(crate) fn subscribers(&self) -> &SubscriberSet {
        &self.subscribers
    }

    /// Replace the value unless it equals the current one.
    ///
    /// Returns whether the value changed.
    pub(crate) fn replace<T: Value>(&mut self, value: T) -> Result<bool> {
        let any: &(dyn Any + Send + Sync) = self.value.as_ref();
        let current = any
            .downcast_ref::<T>()
            .ok_or_else(|| StoreError::TypeMismatch { key: self.key.clone() })?;

        if *current == value {
            return Ok(false);
        }

        self.value = Arc::new(value);
        Ok(true)
    }
}

/// A registered selector.
pub(crate) struct SelectorRecord {
    key: Key,
    descriptor: DescriptorId,
    subscribers: SubscriberSet,
}

impl SelectorRecord {
    pub(crate) fn new<T: Value>(selector: &Selector<T>) -> Self {
        Self {
            key: selector.key().clone(),
            descriptor: selector.id(),
            subscribers: SubscriberSet::new(),
        }
    }
}

/// The live record stored for one key.
pub(crate) enum Record {
    Atom(AtomRecord),
    Selector(SelectorRecord),
}

impl Record {
    pub(crate) fn key(&self) -> &Key {
        match self {
            Record::Atom(record) => &record.key,
            Record::Selector(record) => &record.key,
        }
    }

    /// Which descriptor created this record.
    pub(crate) fn descriptor(&self) -> DescriptorId {
        match self {
            Record::Atom(record) => record.descriptor,
            Record::Selector(record) => record.descriptor,
        }
    }

    pub(crate) fn kind(&self) -> DescriptorKind {
        match self {
            Record::Atom(_) => DescriptorKind::Atom,
            Record::Selector(_) => DescriptorKind::Selector,
        }
    }

    pub(crate) fn subscribers(&self) -> &SubscriberSet {
        match self {
            Record::Atom(record) => &record.subscribers,
            Record::Selector(record) => &record.subscribers,
        }
    }

    pub(crate) fn subscribers_mut(&mut self) -> &mut SubscriberSet {
        match self {
            Record::Atom(record) => &mut record.subscribers,
            Record::Selector(record) => &mut record.subscribers,
        }
    }
}

fn downcast<T: Value>(key: &Key, value: &Erased) -> Result<T> {
    let any: &(dyn Any + Send + Sync) = value.as_ref();
    any.downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| StoreError::TypeMismatch { key: key.clone() })
}
