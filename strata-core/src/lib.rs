//! Strata Core
//!
//! This crate provides a small reactive state store in the atom/selector
//! style, meant to be embedded inside a UI component tree. It implements:
//!
//! - Value descriptors (atoms and selectors)
//! - Per-scope stores holding live values and subscriber lists
//! - Dependency tracking for selectors
//! - A binding layer that UI components use to read, write and re-render
//!
//! Everything runs synchronously on the calling thread. A write does not
//! return until every subscriber of the written key has been called.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `descriptor`: Immutable atom and selector declarations
//! - `store`: The per-scope table of live value records
//! - `reactive`: Runtime operations, dependency tracking and subscriptions
//! - `scope`: Root scopes, the process-wide scope registry and the ambient scope
//! - `binding`: The hook layer used by UI components
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_core::{atom, selector, use_value, use_value_and_setter, Getter, RootScope};
//!
//! let text = atom("text", String::new());
//! let length = selector("length", {
//!     let text = text.clone();
//!     move |ctx: &Getter<'_>| Ok(ctx.get(&text)?.len())
//! });
//!
//! let root = RootScope::new();
//! let _entered = root.enter();
//!
//! let (_, set_text, _text_binding) = use_value_and_setter(&text, || {})?;
//! let (len, _length_binding) = use_value(&length, || println!("re-render"))?;
//! assert_eq!(len, 0);
//!
//! set_text.set("abc".to_string())?;
//! // Prints "re-render"
//! ```

pub mod binding;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod reactive;
pub mod scope;
pub mod store;

pub use binding::{use_value, use_value_and_setter, Binding, BindingState, ValueSetter};
pub use config::{MissingSetterPolicy, ScopeConfig};
pub use descriptor::{
    atom, selector, AsDescriptor, Atom, Descriptor, DescriptorId, DescriptorKind, Key, Selector,
    Value,
};
pub use error::{Result, StoreError};
pub use reactive::{
    track, Dependencies, Getter, Runtime, SetContext, Subscriber, SubscriberId, Subscription,
};
pub use scope::{RootScope, ScopeGuard, ScopeId};
pub use store::Store;
