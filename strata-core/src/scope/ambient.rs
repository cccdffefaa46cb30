//! Ambient Scope
//!
//! Consumers deep inside a component tree need the scope id of their
//! enclosing root without threading it through every call. The ambient
//! scope plays the role of a context provider: entering a root scope pushes
//! its id onto a thread-local stack, and bindings created while it is on
//! top pick it up.
//!
//! # Implementation
//!
//! The stack is thread-local, matching the single-threaded update loop the
//! store is designed for. Nested enters shadow outer ones and restore them
//! when their guard drops.

use std::cell::RefCell;
use std::marker::PhantomData;

use super::{RootScope, ScopeId};
use crate::error::{Result, StoreError};

thread_local! {
    static SCOPE_STACK: RefCell<Vec<ScopeId>> = const { RefCell::new(Vec::new()) };
}

/// Guard that pops the ambient scope when dropped.
///
/// Borrows the [`RootScope`] it was entered from, so the scope cannot be
/// torn down while it is ambient. Not `Send`: it belongs to the thread
/// whose stack it pushed.
pub struct ScopeGuard<'a> {
    scope: ScopeId,
    _marker: PhantomData<(&'a RootScope, *const ())>,
}

impl ScopeGuard<'_> {
    pub(crate) fn enter(scope: ScopeId) -> Self {
        SCOPE_STACK.with(|stack| stack.borrow_mut().push(scope));
        Self {
            scope,
            _marker: PhantomData,
        }
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        SCOPE_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();

            // Guards must drop in reverse order of entry.
            if let Some(popped) = popped {
                debug_assert_eq!(
                    popped, self.scope,
                    "ScopeGuard mismatch: expected {}, got {}",
                    self.scope, popped
                );
            }
        });
    }
}

/// The innermost entered scope on this thread, if any.
pub fn current_scope() -> Option<ScopeId> {
    SCOPE_STACK.with(|stack| stack.borrow().last().copied())
}

/// The innermost entered scope, or [`StoreError::MissingScope`].
pub fn require_scope() -> Result<ScopeId> {
    current_scope().ok_or(StoreError::MissingScope)
}
