//! Change set for tracking projection changes.
//!
//! A ChangeSet describes what one reaction or rebuild did to a derived
//! view: which values entered it, which left it, and what it holds now.

use alloc::vec::Vec;

/// A set of changes to a projection.
///
/// This struct tracks:
/// - `added`: Values that entered the projection
/// - `removed`: Values that left the projection
/// - `rebuilt`: Whether the projection was recomputed from scratch
/// - `current_result`: The complete projection after applying changes
///
/// An in-place update that moves an element reports it in both `removed`
/// and `added`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeSet<V> {
    /// Values that entered the projection
    pub added: Vec<V>,
    /// Values that left the projection
    pub removed: Vec<V>,
    /// True if the projection was rebuilt rather than patched
    pub rebuilt: bool,
    /// The complete projection after applying changes.
    ///
    /// Only filled in when the change set is delivered to subscribers.
    pub current_result: Vec<V>,
}

impl<V> Default for ChangeSet<V> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            rebuilt: false,
            current_result: Vec::new(),
        }
    }
}

impl<V> ChangeSet<V> {
    /// Creates a new empty change set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a change set for a rebuild that replaced `previous` with
    /// `current`.
    pub fn rebuild(previous: Vec<V>, current: Vec<V>) -> Self {
        Self {
            added: current,
            removed: previous,
            rebuilt: true,
            current_result: Vec::new(),
        }
    }

    /// Returns true if nothing entered or left the projection and it was
    /// not rebuilt.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.rebuilt && self.added.is_empty() && self.removed.is_empty()
    }

    /// Returns the total number of element changes.
    #[inline]
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len()
    }

    /// Records a value entering the projection.
    #[inline]
    pub fn add(&mut self, value: V) {
        self.added.push(value);
    }

    /// Records a value leaving the projection.
    #[inline]
    pub fn remove(&mut self, value: V) {
        self.removed.push(value);
    }
}
