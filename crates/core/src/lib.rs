//! Vista Core - Core types shared by Vista observable sources and derived views.
//!
//! This crate provides the vocabulary every other Vista crate speaks:
//!
//! - `SourceId`: Process-unique identity of an observable source collection
//! - `Change`: A single structural change to a source (add, update, remove, splice)
//! - `ChangeEvent`: A change tagged with the source that emitted it
//! - `Error`: Error types for source and view operations
//!
//! # Example
//!
//! ```rust
//! use vista_core::{next_source_id, Change, ChangeEvent};
//!
//! let source = next_source_id();
//! let event: ChangeEvent<usize, i64> = ChangeEvent::new(
//!     source,
//!     Change::Spliced { index: 0, removed: vec![], added: vec![1, 2, 3] },
//! );
//!
//! assert_eq!(event.source, source);
//! assert_eq!(event.change.kind(), vista_core::ChangeKind::Spliced);
//! ```

#![no_std]

extern crate alloc;

mod change;
mod error;
mod source;

pub use change::{Change, ChangeEvent, ChangeKind};
pub use error::{Error, Result};
pub use source::{next_source_id, SourceId};
