//! Reactive Runtime
//!
//! The runtime is the central coordinator between descriptors, scopes and
//! stores. Every operation names a scope; the runtime looks up that scope's
//! store and performs the operation synchronously.
//!
//! # How It Works
//!
//! 1. Reading an atom returns its current value in the scope, creating the
//!    record first if this is the atom's first use there.
//!
//! 2. Reading a selector registers it and runs its derivation with a getter
//!    bound to the same scope. Nothing is cached.
//!
//! 3. Writing an atom:
//!    a. Compares the new value to the current one; equal writes stop here
//!    b. Stores the new value
//!    c. Releases the store lock
//!    d. Calls every subscriber of the key, in subscription order
//!
//! 4. Writing a selector runs its setter, which writes atoms through the
//!    same path. Each atom write notifies on its own.
//!
//! # Re-entrancy
//!
//! Subscriber callbacks and selector functions run with no locks held, so
//! they may read and write the store. Writes made from inside a callback
//! are processed immediately, before the outer notification loop moves on
//! to its next subscriber.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::MissingSetterPolicy;
use crate::descriptor::{AsDescriptor, Atom, Descriptor, Key, Value};
use crate::error::{Result, StoreError};
use crate::scope::{registry, ScopeId};

use super::context::{Getter, SetContext};
use super::subscription::{Subscriber, Subscription};
use super::tracker::track;

/// Entry point for store operations.
///
/// All functions take the scope explicitly and return
/// [`StoreError::UnknownScope`] if it is not a live root scope.
pub struct Runtime;

impl Runtime {
    /// Register a descriptor in a scope without reading it.
    ///
    /// Idempotent for the same descriptor. Returns whether a record was
    /// created.
    pub fn register<D>(scope: ScopeId, descriptor: &D) -> Result<bool>
    where
        D: AsDescriptor + ?Sized,
    {
        registry::lookup(scope)?.register(&descriptor.as_descriptor())
    }

    /// Read the current value of an atom or selector.
    pub fn get<D>(scope: ScopeId, descriptor: &D) -> Result<D::Output>
    where
        D: AsDescriptor + ?Sized,
    {
        let getter = Getter::plain(scope);
        Self::resolve(&getter, &descriptor.as_descriptor())
    }

    /// Resolve a descriptor through the given getter.
    ///
    /// Atoms are read directly. Selectors are evaluated with the getter
    /// itself, so a recording getter keeps recording through nested reads.
    pub(crate) fn resolve<T: Value>(getter: &Getter<'_>, descriptor: &Descriptor<T>) -> Result<T> {
        let store = registry::lookup(getter.scope())?;
        trace!(
            scope = %getter.scope(),
            key = %descriptor.key(),
            tracking = getter.is_tracking(),
            "resolving"
        );

        match descriptor {
            Descriptor::Atom(atom) => store.atom_value(atom),
            Descriptor::Selector(selector) => {
                store.register(descriptor)?;
                drop(store);
                selector.evaluate(getter)
            }
        }
    }

    /// Write an atom and notify its subscribers.
    ///
    /// Fails with [`StoreError::NotAnAtom`] if the atom's key is held by a
    /// selector in this scope. Writing a value equal to the current one is
    /// a no-op and notifies nobody.
    pub fn set<T: Value>(scope: ScopeId, atom: &Atom<T>, value: T) -> Result<()> {
        let store = registry::lookup(scope)?;
        let notify = store.write_atom(atom, value)?;
        drop(store);

        match notify {
            Some(subscribers) => {
                Self::notify(scope, atom.key(), &subscribers);
            }
            None => {
                trace!(scope = %scope, key = %atom.key(), "value unchanged, skipping notification");
            }
        }
        Ok(())
    }

    /// Write an atom or selector.
    ///
    /// Atoms go through [`Runtime::set`]. Selectors run their setter with a
    /// [`SetContext`] bound to this scope. A selector without a setter
    /// follows the scope's [`MissingSetterPolicy`].
    pub fn set_value<D>(scope: ScopeId, descriptor: &D, value: D::Output) -> Result<()>
    where
        D: AsDescriptor + ?Sized,
    {
        let descriptor = descriptor.as_descriptor();
        let selector = match &descriptor {
            Descriptor::Atom(atom) => return Self::set(scope, atom, value),
            Descriptor::Selector(selector) => selector,
        };

        let store = registry::lookup(scope)?;
        store.register(&descriptor)?;
        let policy = store.config().missing_setter;
        drop(store);

        match selector.setter() {
            Some(set) => {
                trace!(scope = %scope, key = %selector.key(), "running selector setter");
                set(&SetContext::new(scope), value)
            }
            None => match policy {
                MissingSetterPolicy::Ignore => {
                    debug!(
                        scope = %scope,
                        key = %selector.key(),
                        "selector has no setter, ignoring write"
                    );
                    Ok(())
                }
                MissingSetterPolicy::Reject => Err(StoreError::NoSetter {
                    key: selector.key().clone(),
                }),
            },
        }
    }

    /// Restore an atom to its default value.
    pub fn reset<T: Value>(scope: ScopeId, atom: &Atom<T>) -> Result<()> {
        let default = registry::lookup(scope)?.atom_default(atom)?;
        Self::set(scope, atom, default)
    }

    /// Subscribe to a key that already has a record in the scope.
    ///
    /// Only atom keys are ever notified. Use [`Runtime::subscribe_to`] to
    /// observe a selector.
    pub fn subscribe(
        scope: ScopeId,
        key: &Key,
        subscriber: &Arc<Subscriber>,
    ) -> Result<Subscription> {
        let store = registry::lookup(scope)?;
        store.subscribe(key, Arc::clone(subscriber))?;

        debug!(scope = %scope, key = %key, subscriber = %subscriber.id(), "subscribed");
        let mut subscription = Subscription::new(Arc::downgrade(&store), subscriber.id());
        subscription.attach(key.clone());
        Ok(subscription)
    }

    /// Register a descriptor if needed, then subscribe to what it reads.
    ///
    /// An atom attaches the subscriber to its own key. A selector is
    /// evaluated once with tracking and the subscriber is attached to every
    /// key the evaluation read, so writes to any of them notify it. The
    /// dependency set is fixed at subscribe time.
    ///
    /// If any attach fails, the ones already made are rolled back.
    pub fn subscribe_to<D>(
        scope: ScopeId,
        descriptor: &D,
        subscriber: &Arc<Subscriber>,
    ) -> Result<Subscription>
    where
        D: AsDescriptor + ?Sized,
    {
        let descriptor = descriptor.as_descriptor();
        let store = registry::lookup(scope)?;
        store.register(&descriptor)?;

        let keys = match &descriptor {
            Descriptor::Atom(atom) => vec![atom.key().clone()],
            Descriptor::Selector(_) => {
                let (value, dependencies) = track(scope, &descriptor);
                value?;
                dependencies.unique()
            }
        };

        let mut subscription = Subscription::new(Arc::downgrade(&store), subscriber.id());
        for key in keys {
            store.subscribe(&key, Arc::clone(subscriber))?;
            subscription.attach(key);
        }

        debug!(
            scope = %scope,
            key = %descriptor.key(),
            subscriber = %subscriber.id(),
            keys = subscription.keys().len(),
            "subscribed"
        );
        Ok(subscription)
    }

    /// Whether the scope has a record for the key.
    pub fn contains(scope: ScopeId, key: &str) -> Result<bool> {
        Ok(registry::lookup(scope)?.contains(key))
    }

    /// Number of records in the scope.
    pub fn record_count(scope: ScopeId) -> Result<usize> {
        Ok(registry::lookup(scope)?.len())
    }

    /// Number of subscribers of a key in the scope.
    pub fn subscriber_count(scope: ScopeId, key: &str) -> Result<usize> {
        Ok(registry::lookup(scope)?.subscriber_count(key))
    }

    fn notify(scope: ScopeId, key: &Key, subscribers: &[Arc<Subscriber>]) {
        trace!(scope = %scope, key = %key, count = subscribers.len(), "notifying subscribers");
        for subscriber in subscribers {
            subscriber.notify();
        }
    }
}
