//! Value Descriptors
//!
//! Descriptors are the user-authored declarations of state. They carry no
//! runtime state of their own: an [`Atom`] names a key and a default value,
//! a [`Selector`] names a key and a derivation function (plus an optional
//! inverse setter).
//!
//! Descriptors are usually built once and shared by reference across every
//! mounted subtree. Registration into a store is deferred until a descriptor
//! is first used inside a root scope, so the same descriptor can back any
//! number of independent scopes.
//!
//! # Identity
//!
//! Each descriptor gets a [`DescriptorId`] when it is constructed. Clones
//! share the id. A store uses the id to tell "the same descriptor registered
//! again" (a no-op) apart from "a different descriptor reusing a key" (an
//! error).

mod atom;
mod selector;

use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub use atom::{atom, Atom};
pub use selector::{selector, Selector, SelectorGet, SelectorSet};

/// Bound shared by every value an atom or selector can hold.
pub trait Value: Clone + PartialEq + Send + Sync + 'static {}

impl<T> Value for T where T: Clone + PartialEq + Send + Sync + 'static {}

/// String key naming an atom or selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Arc<str>);

impl Key {
    /// Create a key from any string.
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for Key {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

/// Unique identifier for a constructed descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorId(u64);

impl DescriptorId {
    /// Generate a new unique descriptor ID.
    pub(crate) fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Which kind of descriptor (or live record) something is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    /// Independently stored state with a default value.
    Atom,

    /// Derived state computed from other atoms and selectors.
    Selector,
}

/// An atom or a selector producing values of type `T`.
pub enum Descriptor<T: Value> {
    Atom(Atom<T>),
    Selector(Selector<T>),
}

impl<T: Value> Descriptor<T> {
    /// The key this descriptor registers under.
    pub fn key(&self) -> &Key {
        match self {
            Descriptor::Atom(atom) => atom.key(),
            Descriptor::Selector(selector) => selector.key(),
        }
    }

    /// The descriptor's identity.
    pub fn id(&self) -> DescriptorId {
        match self {
            Descriptor::Atom(atom) => atom.id(),
            Descriptor::Selector(selector) => selector.id(),
        }
    }

    pub fn kind(&self) -> DescriptorKind {
        match self {
            Descriptor::Atom(_) => DescriptorKind::Atom,
            Descriptor::Selector(_) => DescriptorKind::Selector,
        }
    }

    /// The atom, if this descriptor is one.
    pub fn as_atom(&self) -> Option<&Atom<T>> {
        match self {
            Descriptor::Atom(atom) => Some(atom),
            Descriptor::Selector(_) => None,
        }
    }

    /// The selector, if this descriptor is one.
    pub fn as_selector(&self) -> Option<&Selector<T>> {
        match self {
            Descriptor::Atom(_) => None,
            Descriptor::Selector(selector) => Some(selector),
        }
    }
}

impl<T: Value> Clone for Descriptor<T> {
    fn clone(&self) -> Self {
        match self {
            Descriptor::Atom(atom) => Descriptor::Atom(atom.clone()),
            Descriptor::Selector(selector) => Descriptor::Selector(selector.clone()),
        }
    }
}

impl<T: Value> fmt::Debug for Descriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("kind", &self.kind())
            .field("key", self.key())
            .field("id", &self.id())
            .finish()
    }
}

impl<T: Value> From<Atom<T>> for Descriptor<T> {
    fn from(atom: Atom<T>) -> Self {
        Descriptor::Atom(atom)
    }
}

impl<T: Value> From<Selector<T>> for Descriptor<T> {
    fn from(selector: Selector<T>) -> Self {
        Descriptor::Selector(selector)
    }
}

/// Anything that can be read through a store: atoms, selectors, and the
/// [`Descriptor`] enum itself.
pub trait AsDescriptor {
    /// The value type produced on read.
    type Output: Value;

    /// A descriptor handle for this value. Cheap: descriptors share their
    /// payload behind `Arc`s.
    fn as_descriptor(&self) -> Descriptor<Self::Output>;
}

impl<T: Value> AsDescriptor for Descriptor<T> {
    type Output = T;

    fn as_descriptor(&self) -> Descriptor<T> {
        self.clone()
    }
}

impl<T: Value> AsDescriptor for Atom<T> {
    type Output = T;

    fn as_descriptor(&self) -> Descriptor<T> {
        Descriptor::Atom(self.clone())
    }
}

impl<T: Value> AsDescriptor for Selector<T> {
    type Output = T;

    fn as_descriptor(&self) -> Descriptor<T> {
        Descriptor::Selector(self.clone())
    }
}
