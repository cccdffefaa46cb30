//! Subscribers and subscription handles.
//!
//! A [`Subscriber`] is a zero-argument callback with an identity. It is
//! attached to keys of one scope's store, and a [`Subscription`] owns that
//! attachment: dropping it detaches the subscriber from every key it was
//! attached to.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Weak;

use smallvec::SmallVec;
use tracing::debug;

use crate::descriptor::Key;
use crate::store::Store;

/// Identity of a subscriber inside subscriber sets.
///
/// Subscribing the same id twice to one key is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber-{}", self.0)
    }
}

/// A callback fired after a write to a key it is attached to.
///
/// Callbacks run synchronously inside the write that triggered them and
/// may themselves read or write the store.
pub struct Subscriber {
    id: SubscriberId,
    on_change: Box<dyn Fn() + Send + Sync>,
}

impl Subscriber {
    pub fn new<F>(on_change: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            id: SubscriberId::new(),
            on_change: Box::new(on_change),
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Invoke the callback.
    pub fn notify(&self) {
        (self.on_change)();
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber").field("id", &self.id).finish()
    }
}

/// One subscriber attached to one or more keys of one scope.
///
/// Subscribing to an atom attaches to the atom's key. Subscribing to a
/// selector attaches to every key its derivation read.
///
/// [`Subscription::unsubscribe`] consumes the handle. Dropping the handle
/// unsubscribes as well. If the scope has already been torn down,
/// unsubscribing does nothing.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    store: Weak<Store>,
    keys: SmallVec<[Key; 4]>,
    subscriber: SubscriberId,
}

impl Subscription {
    /// An empty handle; keys are added with [`Subscription::attach`].
    pub(crate) fn new(store: Weak<Store>, subscriber: SubscriberId) -> Self {
        Self {
            store,
            keys: SmallVec::new(),
            subscriber,
        }
    }

    /// Record a key the subscriber was attached to.
    pub(crate) fn attach(&mut self, key: Key) {
        self.keys.push(key);
    }

    /// Keys this handle detaches from, in attach order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn subscriber_id(&self) -> SubscriberId {
        self.subscriber
    }

    /// Remove the subscriber from every attached key.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let keys = std::mem::take(&mut self.keys);
        let Some(store) = self.store.upgrade() else {
            return;
        };

        for key in &keys {
            if store.unsubscribe(key, self.subscriber) {
                debug!(
                    scope = %store.scope(),
                    key = %key,
                    subscriber = %self.subscriber,
                    "unsubscribed"
                );
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("keys", &self.keys)
            .field("subscriber", &self.subscriber)
            .finish()
    }
}
