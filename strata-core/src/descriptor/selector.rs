//! Selector descriptors.
//!
//! A selector's `get` reads other atoms and selectors through a
//! [`Getter`]; every read goes through the store of the scope being
//! evaluated, so the same selector works in any number of scopes.
//!
//! `get` must be a pure function of what it reads. Reads that depend on
//! values not yet read in the same evaluation (conditional dependencies)
//! are not supported: dependency tracking only sees the branch that ran.

use std::fmt;
use std::sync::Arc;

use super::{DescriptorId, Key, Value};
use crate::error::Result;
use crate::reactive::{Getter, SetContext};

/// Derivation function of a selector.
pub type SelectorGet<T> = Arc<dyn Fn(&Getter<'_>) -> Result<T> + Send + Sync>;

/// Optional inverse setter of a selector.
pub type SelectorSet<T> = Arc<dyn Fn(&SetContext, T) -> Result<()> + Send + Sync>;

/// Declaration of a derived value.
///
/// Selectors hold no value. They are recomputed on every read.
pub struct Selector<T: Value> {
    id: DescriptorId,
    key: Key,
    get: SelectorGet<T>,
    set: Option<SelectorSet<T>>,
}

/// Declare a read-only selector.
///
/// Attach an inverse setter with [`Selector::with_set`].
pub fn selector<T, F>(key: impl Into<Key>, get: F) -> Selector<T>
where
    T: Value,
    F: Fn(&Getter<'_>) -> Result<T> + Send + Sync + 'static,
{
    Selector::new(key, get)
}

impl<T: Value> Selector<T> {
    pub fn new<F>(key: impl Into<Key>, get: F) -> Self
    where
        F: Fn(&Getter<'_>) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            id: DescriptorId::new(),
            key: key.into(),
            get: Arc::new(get),
            set: None,
        }
    }

    /// Attach an inverse setter.
    ///
    /// The setter receives a [`SetContext`] and must write the atoms it
    /// wants changed explicitly. Each atom write notifies on its own.
    pub fn with_set<F>(mut self, set: F) -> Self
    where
        F: Fn(&SetContext, T) -> Result<()> + Send + Sync + 'static,
    {
        self.set = Some(Arc::new(set));
        self
    }

    pub fn id(&self) -> DescriptorId {
        self.id
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Whether a setter was attached.
    pub fn has_set(&self) -> bool {
        self.set.is_some()
    }

    /// Run the derivation with the given getter.
    pub(crate) fn evaluate(&self, getter: &Getter<'_>) -> Result<T> {
        (self.get)(getter)
    }

    pub(crate) fn setter(&self) -> Option<&SelectorSet<T>> {
        self.set.as_ref()
    }
}

impl<T: Value> Clone for Selector<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            key: self.key.clone(),
            get: Arc::clone(&self.get),
            set: self.set.clone(),
        }
    }
}

impl<T: Value> fmt::Debug for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("key", &self.key)
            .field("has_set", &self.has_set())
            .finish()
    }
}
