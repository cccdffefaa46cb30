//! Dependency Tracker
//!
//! Determines which keys a selector reads, so a consumer can subscribe to
//! exactly those keys.
//!
//! # How Tracking Works
//!
//! 1. A [`DependencyRecorder`] is created empty.
//!
//! 2. The selector is evaluated with a recording [`Getter`]. Every `get`
//!    appends the probed key to the recorder before resolving it.
//!
//! 3. Nested selectors receive the same recording getter, so their reads
//!    are captured too, down to the atoms at the bottom.
//!
//! 4. The recorder's contents after one full evaluation are the dependency
//!    set of that evaluation.
//!
//! # Limitations
//!
//! Dependencies are discovered by running the derivation. A selector whose
//! reads depend on a runtime branch reports only the branch that ran in the
//! most recent evaluation.

use std::cell::RefCell;

use indexmap::IndexSet;
use smallvec::SmallVec;
use tracing::trace;

use crate::descriptor::{AsDescriptor, Descriptor, Key};
use crate::error::Result;
use crate::scope::ScopeId;

use super::context::Getter;
use super::runtime::Runtime;

type KeyList = SmallVec<[Key; 8]>;

/// Accumulates the keys probed during one evaluation.
///
/// Duplicates are kept; [`Dependencies::unique`] removes them.
#[derive(Debug, Default)]
pub struct DependencyRecorder {
    keys: RefCell<KeyList>,
}

impl DependencyRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key.
    pub fn record(&self, key: &Key) {
        self.keys.borrow_mut().push(key.clone());
    }

    /// Stop recording and return what was captured.
    pub fn finish(self) -> Dependencies {
        Dependencies {
            keys: self.keys.into_inner(),
        }
    }
}

/// The keys read by one evaluation, in the order they were read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    keys: KeyList,
}

impl Dependencies {
    /// Every recorded key, duplicates included.
    pub fn as_slice(&self) -> &[Key] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k.as_str() == key)
    }

    /// Recorded keys without duplicates, in first-read order.
    pub fn unique(&self) -> Vec<Key> {
        self.keys
            .iter()
            .cloned()
            .collect::<IndexSet<Key>>()
            .into_iter()
            .collect()
    }
}

/// Resolve a value and capture its dependency set in one evaluation.
///
/// For an atom the dependency set is the atom's own key. For a selector it
/// is every key read during the derivation, transitively; the selector's
/// own key is not included.
pub fn track<D>(scope: ScopeId, descriptor: &D) -> (Result<D::Output>, Dependencies)
where
    D: AsDescriptor + ?Sized,
{
    let descriptor = descriptor.as_descriptor();
    let recorder = DependencyRecorder::new();

    let value = match &descriptor {
        Descriptor::Atom(atom) => {
            recorder.record(atom.key());
            Runtime::get(scope, atom)
        }
        Descriptor::Selector(_) => {
            let getter = Getter::recording(scope, &recorder);
            Runtime::resolve(&getter, &descriptor)
        }
    };

    let dependencies = recorder.finish();
    trace!(
        scope = %scope,
        key = %descriptor.key(),
        deps = dependencies.len(),
        "tracked dependencies"
    );
    (value, dependencies)
}
