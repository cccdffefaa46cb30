//! Reactive Layer
//!
//! This module connects descriptors to stores: it resolves reads, routes
//! writes, tracks which keys a selector depends on, and manages the
//! subscriber callbacks that are fired when an atom changes.
//!
//! # Concepts
//!
//! ## Runtime
//!
//! [`Runtime`] is the entry point for every store operation. Each call
//! names the scope it works on, looks that scope's store up in the
//! registry, and runs synchronously to completion, including the
//! notification of every affected subscriber.
//!
//! ## Getters
//!
//! Selectors read their inputs through a [`Getter`]. A plain getter only
//! resolves values. A recording getter also appends every key it is asked
//! for to a [`DependencyRecorder`], and hands itself down to nested
//! selectors so the whole dependency tree is captured.
//!
//! ## Subscriptions
//!
//! A [`Subscriber`] is a zero-argument callback with an identity. A
//! [`Subscription`] ties one subscriber to keys of one scope and removes it
//! again when unsubscribed or dropped. Subscribing to a selector attaches
//! to the keys its derivation reads.
//!
//! # Implementation Notes
//!
//! Selectors are never memoized. Every read recomputes, and every tracked
//! read re-discovers the dependency set. Freshness is guaranteed at the
//! cost of repeated work.

mod context;
mod runtime;
mod subscription;
mod tracker;

pub use context::{Getter, SetContext};
pub use runtime::Runtime;
pub use subscription::{Subscriber, SubscriberId, Subscription};
pub use tracker::{track, Dependencies, DependencyRecorder};
