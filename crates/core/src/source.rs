//! Source identity for observable collections.

use core::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for an observable source collection.
pub type SourceId = u64;

/// Global source ID counter.
static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Gets the next unique source ID.
///
/// IDs are never reused within a process, so a change event can always be
/// traced back to the one collection that emitted it.
pub fn next_source_id() -> SourceId {
    NEXT_SOURCE_ID.fetch_add(1, Ordering::SeqCst)
}
