//! Error types for store, subscription and binding operations.
//!
//! Every error is raised synchronously at the call that caused it. Nothing
//! is retried.

use thiserror::Error;

use crate::descriptor::Key;
use crate::reactive::SubscriberId;
use crate::scope::ScopeId;

/// Errors raised by the store and the layers above it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A different atom or selector already owns this key in the scope.
    #[error("key `{key}` is already registered by a different atom or selector")]
    DuplicateKey { key: Key },

    /// The atom setter was used on a key held by a selector.
    #[error("`{key}` is not an atom")]
    NotAnAtom { key: Key },

    /// A binding was created outside of any entered root scope.
    #[error("no root scope is active on this thread; enter a RootScope around the consumer")]
    MissingScope,

    /// An explicit scope id does not name a live root scope.
    #[error("root scope {0} is not registered (never created or already torn down)")]
    UnknownScope(ScopeId),

    /// The same subscriber was subscribed twice to one key.
    #[error("subscriber {subscriber} is already subscribed to `{key}`")]
    DuplicateSubscription { key: Key, subscriber: SubscriberId },

    /// Subscribing by key before any atom or selector registered it.
    #[error("`{key}` has no record in this scope")]
    UnknownKey { key: Key },

    /// The stored value could not be read back as the descriptor's type.
    #[error("value stored under `{key}` does not have the requested type")]
    TypeMismatch { key: Key },

    /// A selector without a setter was written to under a rejecting policy.
    #[error("selector `{key}` has no setter")]
    NoSetter { key: Key },

    /// Scope configuration could not be parsed.
    #[error("invalid scope config: {0}")]
    InvalidConfig(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
