//! The observable source contract.

use crate::subscription::Subscription;
use alloc::vec::Vec;
use vista_core::{ChangeEvent, SourceId};

/// A mutable collection that reports every mutation to its observers.
///
/// Implementors emit exactly one `ChangeEvent` per mutation, synchronously,
/// after the mutation has been applied. Handles are cheap to clone and all
/// clones refer to the same collection.
pub trait Observable {
    /// Key type (`usize` for indexed sources).
    type Key;
    /// Element type.
    type Value;

    /// Returns the identity carried by every event this source emits.
    fn source_id(&self) -> SourceId;

    /// Returns the current contents in iteration order.
    fn values(&self) -> Vec<Self::Value>;

    /// Registers `listener` for all future changes.
    ///
    /// The listener stays registered until the returned guard is dropped or
    /// cancelled.
    fn observe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ChangeEvent<Self::Key, Self::Value>) + 'static;
}
