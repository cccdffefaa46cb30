//! Atom descriptors.

use std::fmt;
use std::sync::Arc;

use super::{DescriptorId, Key, Value};

/// Declaration of an independently stored piece of state.
///
/// An atom has no value of its own. Each root scope that uses it gets a
/// separate live value, starting at [`Atom::default`].
///
/// # Example
///
/// ```rust,ignore
/// let text = atom("textState1", String::new());
/// ```
pub struct Atom<T: Value> {
    id: DescriptorId,
    key: Key,
    default: Arc<T>,
}

/// Declare an atom with the given key and default value.
pub fn atom<T: Value>(key: impl Into<Key>, default: T) -> Atom<T> {
    Atom::new(key, default)
}

impl<T: Value> Atom<T> {
    pub fn new(key: impl Into<Key>, default: T) -> Self {
        Self {
            id: DescriptorId::new(),
            key: key.into(),
            default: Arc::new(default),
        }
    }

    pub fn id(&self) -> DescriptorId {
        self.id
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The value every fresh scope starts with.
    pub fn default_value(&self) -> &T {
        &self.default
    }
}

impl<T: Value> Clone for Atom<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            key: self.key.clone(),
            default: Arc::clone(&self.default),
        }
    }
}

impl<T> fmt::Debug for Atom<T>
where
    T: Value + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atom")
            .field("key", &self.key)
            .field("default", &*self.default)
            .finish()
    }
}
