//! Selector Contexts
//!
//! The values handed to selector functions. Both are bound to one scope,
//! so selector code never sees or passes scope ids.

use crate::descriptor::{AsDescriptor, Atom, Value};
use crate::error::Result;
use crate::scope::ScopeId;

use super::runtime::Runtime;
use super::tracker::DependencyRecorder;

/// Read access passed to a selector's `get`.
///
/// A getter is either plain, or recording: a recording getter appends the
/// key of every descriptor it resolves to its recorder before delegating,
/// and passes itself to nested selectors, so the recorder ends up holding
/// the full transitive dependency list of the evaluation.
pub struct Getter<'a> {
    scope: ScopeId,
    recorder: Option<&'a DependencyRecorder>,
}

impl<'a> Getter<'a> {
    /// A getter that only resolves values.
    pub(crate) fn plain(scope: ScopeId) -> Self {
        Self {
            scope,
            recorder: None,
        }
    }

    /// A getter that records every key it resolves.
    pub(crate) fn recording(scope: ScopeId, recorder: &'a DependencyRecorder) -> Self {
        Self {
            scope,
            recorder: Some(recorder),
        }
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Whether reads through this getter are being recorded.
    pub fn is_tracking(&self) -> bool {
        self.recorder.is_some()
    }

    /// Resolve an atom or selector in this getter's scope.
    pub fn get<D>(&self, descriptor: &D) -> Result<D::Output>
    where
        D: AsDescriptor + ?Sized,
    {
        let descriptor = descriptor.as_descriptor();
        if let Some(recorder) = self.recorder {
            recorder.record(descriptor.key());
        }
        Runtime::resolve(self, &descriptor)
    }
}

/// Read/write access passed to a selector's setter.
pub struct SetContext {
    scope: ScopeId,
}

impl SetContext {
    pub(crate) fn new(scope: ScopeId) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Resolve an atom or selector in the setter's scope.
    pub fn get<D>(&self, descriptor: &D) -> Result<D::Output>
    where
        D: AsDescriptor + ?Sized,
    {
        Runtime::get(self.scope, descriptor)
    }

    /// Write an atom, or route through another selector's setter.
    pub fn set<D>(&self, descriptor: &D, value: D::Output) -> Result<()>
    where
        D: AsDescriptor + ?Sized,
    {
        Runtime::set_value(self.scope, descriptor, value)
    }

    /// Restore an atom to its default.
    pub fn reset<T: Value>(&self, atom: &Atom<T>) -> Result<()> {
        Runtime::reset(self.scope, atom)
    }
}
