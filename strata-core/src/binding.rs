//! Consumer Bindings
//!
//! The hook layer used by UI components. A [`Binding`] connects one
//! consumer to one atom or selector in one scope: it reads the value,
//! subscribes the consumer to every key the read touched, and calls the
//! consumer's `on_change` callback whenever one of those keys is written.
//!
//! # Lifecycle
//!
//! ```text
//! Unsubscribed --bind()--> Subscribed --unbind()/drop--> Unsubscribed
//!                              |
//!                              +--bind()--> Subscribed (fresh dependency set)
//! ```
//!
//! The owner is expected to call [`Binding::bind`] again each time it
//! re-renders. Re-binding tears down every subscription of the previous
//! dependency set before subscribing to the new one, so a selector whose
//! dependencies shifted does not leave stale subscriptions behind.
//!
//! # Scope
//!
//! [`Binding::new`], [`use_value`] and [`use_value_and_setter`] take their
//! scope from the ambient scope (see [`RootScope::enter`]) and fail with
//! [`StoreError::MissingScope`] outside of one.
//!
//! [`RootScope::enter`]: crate::scope::RootScope::enter
//! [`StoreError::MissingScope`]: crate::error::StoreError::MissingScope

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::descriptor::{AsDescriptor, Descriptor, Key, Value};
use crate::error::Result;
use crate::reactive::{track, Runtime, Subscriber, SubscriberId, Subscription};
use crate::scope::{require_scope, ScopeId};

/// Subscription state of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    Unsubscribed,
    Subscribed,
}

/// One consumer's live connection to an atom or selector.
pub struct Binding<T: Value> {
    scope: ScopeId,
    descriptor: Descriptor<T>,
    subscriber: Arc<Subscriber>,
    subscriptions: Vec<Subscription>,
    dependencies: Vec<Key>,
    state: BindingState,
}

impl<T: Value> Binding<T> {
    /// Create an unbound binding in the ambient scope.
    pub fn new<D, F>(descriptor: &D, on_change: F) -> Result<Self>
    where
        D: AsDescriptor<Output = T> + ?Sized,
        F: Fn() + Send + Sync + 'static,
    {
        let scope = require_scope()?;
        Ok(Self::in_scope(scope, descriptor, on_change))
    }

    /// Create an unbound binding in an explicit scope.
    pub fn in_scope<D, F>(scope: ScopeId, descriptor: &D, on_change: F) -> Self
    where
        D: AsDescriptor<Output = T> + ?Sized,
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            scope,
            descriptor: descriptor.as_descriptor(),
            subscriber: Arc::new(Subscriber::new(on_change)),
            subscriptions: Vec::new(),
            dependencies: Vec::new(),
            state: BindingState::Unsubscribed,
        }
    }

    /// Read the current value and (re)subscribe to its dependencies.
    ///
    /// Any subscriptions from a previous bind are removed first. If the
    /// read or a subscription fails, the binding is left unsubscribed.
    pub fn bind(&mut self) -> Result<T> {
        self.unbind();

        let (value, dependencies) = track(self.scope, &self.descriptor);
        let value = value?;

        let keys = dependencies.unique();
        let mut subscriptions = Vec::with_capacity(keys.len());
        for key in &keys {
            subscriptions.push(Runtime::subscribe(self.scope, key, &self.subscriber)?);
        }

        trace!(
            scope = %self.scope,
            key = %self.descriptor.key(),
            subscriber = %self.subscriber.id(),
            deps = keys.len(),
            "bound"
        );

        self.subscriptions = subscriptions;
        self.dependencies = keys;
        self.state = BindingState::Subscribed;
        Ok(value)
    }

    /// Remove every subscription made by the last bind.
    pub fn unbind(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        self.dependencies.clear();
        self.state = BindingState::Unsubscribed;
    }

    /// Read the current value without touching subscriptions.
    pub fn value(&self) -> Result<T> {
        Runtime::get(self.scope, &self.descriptor)
    }

    /// A scope-bound setter for this binding's atom or selector.
    pub fn setter(&self) -> ValueSetter<T> {
        ValueSetter {
            scope: self.scope,
            descriptor: self.descriptor.clone(),
        }
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn descriptor(&self) -> &Descriptor<T> {
        &self.descriptor
    }

    pub fn subscriber_id(&self) -> SubscriberId {
        self.subscriber.id()
    }

    /// Keys subscribed to by the last bind, in first-read order.
    pub fn dependencies(&self) -> &[Key] {
        &self.dependencies
    }
}

impl<T: Value> Drop for Binding<T> {
    fn drop(&mut self) {
        self.unbind();
    }
}

impl<T: Value> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("scope", &self.scope)
            .field("key", self.descriptor.key())
            .field("state", &self.state)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

/// Setter bound to one scope and one atom or selector.
///
/// Atoms are written directly. Selectors run their setter, which receives
/// scope-bound `get`/`set` and never sees the scope id.
pub struct ValueSetter<T: Value> {
    scope: ScopeId,
    descriptor: Descriptor<T>,
}

impl<T: Value> ValueSetter<T> {
    pub fn set(&self, value: T) -> Result<()> {
        Runtime::set_value(self.scope, &self.descriptor, value)
    }
}

impl<T: Value> Clone for ValueSetter<T> {
    fn clone(&self) -> Self {
        Self {
            scope: self.scope,
            descriptor: self.descriptor.clone(),
        }
    }
}

impl<T: Value> fmt::Debug for ValueSetter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSetter")
            .field("scope", &self.scope)
            .field("key", self.descriptor.key())
            .finish()
    }
}

/// Read a value in the ambient scope and subscribe `on_change` to it.
///
/// Keep the returned binding alive for as long as the consumer is mounted
/// and call [`Binding::bind`] on every re-render.
pub fn use_value<D, F>(descriptor: &D, on_change: F) -> Result<(D::Output, Binding<D::Output>)>
where
    D: AsDescriptor + ?Sized,
    F: Fn() + Send + Sync + 'static,
{
    let mut binding = Binding::new(descriptor, on_change)?;
    let value = binding.bind()?;
    Ok((value, binding))
}

/// Like [`use_value`], also returning a setter.
pub fn use_value_and_setter<D, F>(
    descriptor: &D,
    on_change: F,
) -> Result<(D::Output, ValueSetter<D::Output>, Binding<D::Output>)>
where
    D: AsDescriptor + ?Sized,
    F: Fn() + Send + Sync + 'static,
{
    let (value, binding) = use_value(descriptor, on_change)?;
    let setter = binding.setter();
    Ok((value, setter, binding))
}
