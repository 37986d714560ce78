//! Vista Observable - Observable source collections.
//!
//! This crate implements the mutable side of Vista: collections that report
//! every mutation as a `ChangeEvent` to their observers. Derived views
//! (see `vista-derived`) are built on top of the `Observable` trait.
//!
//! # Core Concepts
//!
//! - `Observable`: The contract a source collection fulfils
//! - `ObservableVec`: Indexed source, emits splices and slot updates
//! - `ObservableMap`: Keyed, insertion-ordered source
//! - `Subscription`: Guard that detaches its listener on drop
//! - `SubscriptionManager`: Listener table owned by each source
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use vista_observable::{Observable, ObservableMap};
//!
//! let users = ObservableMap::new();
//! let changes = Rc::new(Cell::new(0));
//!
//! let counter = changes.clone();
//! let sub = users.observe(move |_| counter.set(counter.get() + 1));
//!
//! users.insert("ada", 36);
//! users.insert("ada", 37);
//! drop(sub);
//! users.remove(&"ada");
//!
//! assert_eq!(changes.get(), 2);
//! ```

#![no_std]

extern crate alloc;

mod log;

pub mod map;
pub mod observable;
pub mod subscription;
pub mod vec;

pub use map::ObservableMap;
pub use observable::Observable;
pub use subscription::{Listener, Subscription, SubscriptionId, SubscriptionManager, Unsubscribe};
pub use vec::ObservableVec;

// Re-export commonly used types from dependencies
pub use vista_core::{Change, ChangeEvent, ChangeKind, Error, Result, SourceId};
