//! Change events emitted by observable source collections.
//!
//! A `Change` describes exactly one mutation of a source. Keyed sources emit
//! `Added`, `Updated` and `Removed`; indexed sources emit `Spliced` for
//! structural edits and `Updated` for assignments to an existing slot.

use crate::source::SourceId;
use alloc::vec::Vec;

/// The kind of a change, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Updated,
    Removed,
    Spliced,
}

/// A single mutation of a source collection.
///
/// `K` is the key type of the source (`usize` for indexed sources).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change<K, V> {
    /// A value was inserted under a new key.
    Added { key: K, value: V },
    /// The value under an existing key was replaced.
    ///
    /// `old == new` signals an in-place mutation: the element is the same,
    /// but fields relevant to filtering or ordering may have changed.
    Updated { key: K, old: V, new: V },
    /// The value under `key` was removed.
    Removed { key: K, value: V },
    /// A contiguous range starting at `index` was replaced.
    Spliced {
        index: usize,
        removed: Vec<V>,
        added: Vec<V>,
    },
}

impl<K, V> Change<K, V> {
    /// Returns the kind of this change.
    #[inline]
    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Added { .. } => ChangeKind::Added,
            Change::Updated { .. } => ChangeKind::Updated,
            Change::Removed { .. } => ChangeKind::Removed,
            Change::Spliced { .. } => ChangeKind::Spliced,
        }
    }

    /// Returns true if this change neither adds nor removes anything.
    ///
    /// Only an empty splice is a no-op; an update always counts, since an
    /// in-place mutation may still move the element in a derived view.
    #[inline]
    pub fn is_noop(&self) -> bool {
        matches!(self, Change::Spliced { removed, added, .. } if removed.is_empty() && added.is_empty())
    }
}

/// A change tagged with the source collection that emitted it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent<K, V> {
    /// The emitting source
    pub source: SourceId,
    /// What changed
    pub change: Change<K, V>,
}

impl<K, V> ChangeEvent<K, V> {
    /// Creates a new change event.
    #[inline]
    pub fn new(source: SourceId, change: Change<K, V>) -> Self {
        Self { source, change }
    }

    /// Returns the kind of the wrapped change.
    #[inline]
    pub fn kind(&self) -> ChangeKind {
        self.change.kind()
    }
}
