//! Read-only sequence operations.
//!
//! `ReadSequence` is the whole public surface for reading a derived view.
//! Every operation works on the current contents and returns owned results;
//! nothing here can change the sequence. Implementors supply `len` and
//! `with_items`, everything else is provided.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write};
use core::ops::{Bound, Range, RangeBounds};

/// Read-only access to an ordered sequence.
///
/// Callbacks run while the sequence is borrowed. They must not mutate the
/// source the sequence is derived from.
pub trait ReadSequence {
    /// Element type.
    type Item: Clone;

    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Runs `f` against the current elements.
    fn with_items<R>(&self, f: impl FnOnce(&[Self::Item]) -> R) -> R;

    /// Returns true if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `index`.
    fn get(&self, index: usize) -> Option<Self::Item> {
        self.with_items(|items| items.get(index).cloned())
    }

    /// Returns the element at `index`, counting from the end when negative.
    fn at(&self, index: isize) -> Option<Self::Item> {
        self.with_items(|items| {
            let resolved = if index < 0 {
                items.len().checked_sub(index.unsigned_abs())?
            } else {
                index as usize
            };
            items.get(resolved).cloned()
        })
    }

    /// Returns the first element.
    fn first(&self) -> Option<Self::Item> {
        self.with_items(|items| items.first().cloned())
    }

    /// Returns the last element.
    fn last(&self) -> Option<Self::Item> {
        self.with_items(|items| items.last().cloned())
    }

    /// Copies the elements into a new vector.
    fn to_vec(&self) -> Vec<Self::Item> {
        self.with_items(|items| items.to_vec())
    }

    /// Returns `(index, element)` pairs.
    fn entries(&self) -> Vec<(usize, Self::Item)> {
        self.with_items(|items| items.iter().cloned().enumerate().collect())
    }

    /// Returns the valid indices.
    fn keys(&self) -> Range<usize> {
        0..self.len()
    }

    /// Returns true if `predicate` holds for every element.
    fn every(&self, mut predicate: impl FnMut(&Self::Item) -> bool) -> bool {
        self.with_items(|items| items.iter().all(|item| predicate(item)))
    }

    /// Returns true if `predicate` holds for some element.
    fn some(&self, mut predicate: impl FnMut(&Self::Item) -> bool) -> bool {
        self.with_items(|items| items.iter().any(|item| predicate(item)))
    }

    /// Returns the first element satisfying `predicate`.
    fn find(&self, mut predicate: impl FnMut(&Self::Item) -> bool) -> Option<Self::Item> {
        self.with_items(|items| items.iter().find(|item| predicate(item)).cloned())
    }

    /// Returns the index of the first element satisfying `predicate`.
    fn find_index(&self, predicate: impl FnMut(&Self::Item) -> bool) -> Option<usize> {
        self.with_items(|items| items.iter().position(predicate))
    }

    /// Returns the last element satisfying `predicate`.
    fn find_last(&self, mut predicate: impl FnMut(&Self::Item) -> bool) -> Option<Self::Item> {
        self.with_items(|items| items.iter().rev().find(|item| predicate(item)).cloned())
    }

    /// Returns the index of the last element satisfying `predicate`.
    fn find_last_index(&self, predicate: impl FnMut(&Self::Item) -> bool) -> Option<usize> {
        self.with_items(|items| items.iter().rposition(predicate))
    }

    /// Calls `f` on every element in order.
    fn for_each(&self, f: impl FnMut(&Self::Item)) {
        self.with_items(|items| items.iter().for_each(f))
    }

    /// Returns the index of the first element equal to `value`.
    fn index_of(&self, value: &Self::Item) -> Option<usize>
    where
        Self::Item: PartialEq,
    {
        self.with_items(|items| items.iter().position(|item| item == value))
    }

    /// Returns the index of the last element equal to `value`.
    fn last_index_of(&self, value: &Self::Item) -> Option<usize>
    where
        Self::Item: PartialEq,
    {
        self.with_items(|items| items.iter().rposition(|item| item == value))
    }

    /// Returns true if some element equals `value`.
    fn includes(&self, value: &Self::Item) -> bool
    where
        Self::Item: PartialEq,
    {
        self.with_items(|items| items.contains(value))
    }

    /// Maps every element into a new vector.
    fn map<U>(&self, f: impl FnMut(&Self::Item) -> U) -> Vec<U> {
        self.with_items(|items| items.iter().map(f).collect())
    }

    /// Maps every element to zero or more values and concatenates them.
    fn flat_map<U, I>(&self, f: impl FnMut(&Self::Item) -> I) -> Vec<U>
    where
        I: IntoIterator<Item = U>,
    {
        self.with_items(|items| items.iter().flat_map(f).collect())
    }

    /// Returns the elements satisfying `predicate`, in order.
    fn filter(&self, mut predicate: impl FnMut(&Self::Item) -> bool) -> Vec<Self::Item> {
        self.with_items(|items| items.iter().filter(|item| predicate(item)).cloned().collect())
    }

    /// Folds the elements front to back.
    fn reduce<A>(&self, init: A, f: impl FnMut(A, &Self::Item) -> A) -> A {
        self.with_items(|items| items.iter().fold(init, f))
    }

    /// Folds the elements back to front.
    fn reduce_right<A>(&self, init: A, f: impl FnMut(A, &Self::Item) -> A) -> A {
        self.with_items(|items| items.iter().rev().fold(init, f))
    }

    /// Copies a sub-range. Bounds past the end are clamped.
    fn slice(&self, range: impl RangeBounds<usize>) -> Vec<Self::Item> {
        self.with_items(|items| {
            let len = items.len();
            let start = match range.start_bound() {
                Bound::Included(&s) => s,
                Bound::Excluded(&s) => s.saturating_add(1),
                Bound::Unbounded => 0,
            }
            .min(len);
            let end = match range.end_bound() {
                Bound::Included(&e) => e.saturating_add(1),
                Bound::Excluded(&e) => e,
                Bound::Unbounded => len,
            }
            .min(len);
            if start >= end {
                Vec::new()
            } else {
                items[start..end].to_vec()
            }
        })
    }

    /// Copies the elements followed by `other` into a new vector.
    fn concat(&self, other: &[Self::Item]) -> Vec<Self::Item> {
        self.with_items(|items| {
            let mut out = Vec::with_capacity(items.len() + other.len());
            out.extend_from_slice(items);
            out.extend_from_slice(other);
            out
        })
    }

    /// Formats the elements separated by `separator`.
    fn join(&self, separator: &str) -> String
    where
        Self::Item: fmt::Display,
    {
        self.with_items(|items| {
            let mut out = String::new();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(separator);
                }
                // writing into a String cannot fail
                let _ = write!(out, "{}", item);
            }
            out
        })
    }
}
