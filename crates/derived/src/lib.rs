//! Vista Derived - Live filtered and sorted views over observable sources.
//!
//! A `DerivedList` is a read-only projection of an `Observable` source. It
//! is built once from the source's values and then patched for every change
//! event the source emits, instead of being recomputed from scratch.
//!
//! # Core Concepts
//!
//! - `DerivedList`: The live view; bound to one source for its lifetime
//! - `Projection`: The engine behind it, usable without a live source
//! - `Filter` / `Comparator`: Shared handles, compared by identity
//! - `ReadSequence`: The read-only operations a view supports
//! - `ChangeSet`: What a reaction or rebuild did to the projection
//! - `locator`: Binary search returning a hit or an insertion point
//!
//! # Incremental Reactions
//!
//! | source change | effect on the projection                                |
//! |---------------|---------------------------------------------------------|
//! | `Spliced`     | drop every occurrence of removed values, insert added   |
//! | `Added`       | insert                                                  |
//! | `Updated`     | drop every occurrence of the old value, insert the new  |
//! | `Removed`     | drop every occurrence                                   |
//!
//! Insertion appends when no comparator is set and otherwise goes to the
//! position the locator reports. A value comparing equal to one already
//! projected is dropped under `DuplicatePolicy::Skip` (the default) and
//! placed after its equals under `DuplicatePolicy::Keep`.
//!
//! # Example
//!
//! ```
//! use vista_derived::{Comparator, DerivedList, ReadSequence};
//! use vista_observable::ObservableMap;
//!
//! let scores = ObservableMap::new();
//! let ranking = DerivedList::builder(&scores)
//!     .sort(Comparator::new(|a: &u32, b: &u32| b.cmp(a)))
//!     .build();
//!
//! scores.insert("ada", 30);
//! scores.insert("bob", 50);
//! scores.insert("cy", 40);
//! assert_eq!(ranking.to_vec(), vec![50, 40, 30]);
//!
//! scores.insert("ada", 60);
//! assert_eq!(ranking.first(), Some(60));
//! ```

#![no_std]

extern crate alloc;

mod log;

pub mod change_set;
pub mod config;
pub mod derived;
pub mod locator;
pub mod projection;
pub mod sequence;

pub use change_set::ChangeSet;
pub use config::{Comparator, Config, ConfigUpdate, DuplicatePolicy, Filter};
pub use derived::{DerivedList, DerivedListBuilder, Iter};
pub use locator::{encode, locate, upper_bound};
pub use projection::Projection;
pub use sequence::ReadSequence;

// Re-export commonly used types from dependencies
pub use vista_core::{Change, ChangeEvent, Error, Result, SourceId};
pub use vista_observable::{Observable, ObservableMap, ObservableVec, Subscription, SubscriptionId};
