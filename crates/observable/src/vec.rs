//! Observable indexed collection.

use crate::log::{debug, trace};
use crate::observable::Observable;
use crate::subscription::{dispatch, Subscription, SubscriptionManager, Unsubscribe};
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use vista_core::{next_source_id, Change, ChangeEvent, Error, Result, SourceId};

type VecEvent<V> = ChangeEvent<usize, V>;

struct Inner<V> {
    id: SourceId,
    items: RefCell<Vec<V>>,
    listeners: Rc<RefCell<SubscriptionManager<VecEvent<V>>>>,
}

/// An observable vector.
///
/// Structural edits (`push`, `insert`, `remove`, `splice`, ...) emit a single
/// `Change::Spliced`; assignments to an existing slot emit `Change::Updated`
/// keyed by index.
///
/// # Example
///
/// ```
/// use vista_observable::{Observable, ObservableVec};
///
/// let numbers = ObservableVec::new();
/// let _sub = numbers.observe(|event| println!("{:?}", event.change));
///
/// numbers.push(1);
/// numbers.splice(0, 1, [2, 3]).unwrap();
/// assert_eq!(numbers.values(), vec![2, 3]);
/// ```
pub struct ObservableVec<V> {
    inner: Rc<Inner<V>>,
}

impl<V> Clone for ObservableVec<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V> Default for ObservableVec<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ObservableVec<V> {
    /// Creates an empty vector.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Creates a vector with initial contents. No event is emitted.
    pub fn from_vec(items: Vec<V>) -> Self {
        Self {
            inner: Rc::new(Inner {
                id: next_source_id(),
                items: RefCell::new(items),
                listeners: Rc::new(RefCell::new(SubscriptionManager::new())),
            }),
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    /// Returns true if the vector is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    /// Runs `f` against the current contents.
    pub fn with_slice<R>(&self, f: impl FnOnce(&[V]) -> R) -> R {
        f(&self.inner.items.borrow())
    }

    /// Returns the number of active observers.
    pub fn observer_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn emit(&self, change: Change<usize, V>) {
        if change.is_noop() {
            return;
        }
        let event = ChangeEvent::new(self.inner.id, change);
        trace!(source = self.inner.id, kind = ?event.kind(), "vec change");
        dispatch(&self.inner.listeners, &event);
    }
}

impl<V: Clone> ObservableVec<V> {
    /// Returns a clone of the element at `index`.
    pub fn get(&self, index: usize) -> Option<V> {
        self.inner.items.borrow().get(index).cloned()
    }

    /// Appends an element.
    pub fn push(&self, value: V) {
        let index = {
            let mut items = self.inner.items.borrow_mut();
            items.push(value.clone());
            items.len() - 1
        };
        self.emit(Change::Spliced {
            index,
            removed: Vec::new(),
            added: alloc::vec![value],
        });
    }

    /// Removes and returns the last element.
    pub fn pop(&self) -> Option<V> {
        let (index, value) = {
            let mut items = self.inner.items.borrow_mut();
            let value = items.pop()?;
            (items.len(), value)
        };
        self.emit(Change::Spliced {
            index,
            removed: alloc::vec![value.clone()],
            added: Vec::new(),
        });
        Some(value)
    }

    /// Inserts an element at `index`, shifting later elements right.
    pub fn insert(&self, index: usize, value: V) -> Result<()> {
        self.splice(index, 0, [value]).map(|_| ())
    }

    /// Removes and returns the element at `index`.
    pub fn remove(&self, index: usize) -> Result<V> {
        let len = self.len();
        if index >= len {
            return Err(Error::index_out_of_bounds(index, len));
        }
        let mut removed = self.splice(index, 1, [])?;
        removed.pop().ok_or(Error::index_out_of_bounds(index, len))
    }

    /// Replaces the element at `index`, returning the previous one.
    pub fn set(&self, index: usize, value: V) -> Result<V> {
        let old = {
            let mut items = self.inner.items.borrow_mut();
            let len = items.len();
            let slot = items
                .get_mut(index)
                .ok_or(Error::index_out_of_bounds(index, len))?;
            core::mem::replace(slot, value.clone())
        };
        self.emit(Change::Updated {
            key: index,
            old: old.clone(),
            new: value,
        });
        Ok(old)
    }

    /// Mutates the element at `index` in place.
    ///
    /// Emits `Updated` with the element as it was before and after `f`. For
    /// shared handles (e.g. `Rc<RefCell<T>>`) both sides are the same
    /// element, which derived views treat as a re-placement.
    pub fn modify<F>(&self, index: usize, f: F) -> Result<()>
    where
        F: FnOnce(&mut V),
    {
        let (old, new) = {
            let mut items = self.inner.items.borrow_mut();
            let len = items.len();
            let slot = items
                .get_mut(index)
                .ok_or(Error::index_out_of_bounds(index, len))?;
            let old = slot.clone();
            f(slot);
            (old, slot.clone())
        };
        self.emit(Change::Updated { key: index, old, new });
        Ok(())
    }

    /// Removes `delete_count` elements starting at `index` and inserts
    /// `items` in their place. Returns the removed elements.
    ///
    /// `delete_count` is clamped to the end of the vector; `index` past the
    /// end is an error.
    pub fn splice<I>(&self, index: usize, delete_count: usize, items: I) -> Result<Vec<V>>
    where
        I: IntoIterator<Item = V>,
    {
        let added: Vec<V> = items.into_iter().collect();
        let removed: Vec<V> = {
            let mut current = self.inner.items.borrow_mut();
            let len = current.len();
            if index > len {
                return Err(Error::index_out_of_bounds(index, len));
            }
            let end = index + delete_count.min(len - index);
            current.splice(index..end, added.iter().cloned()).collect()
        };
        self.emit(Change::Spliced {
            index,
            removed: removed.clone(),
            added,
        });
        Ok(removed)
    }

    /// Removes all elements.
    pub fn clear(&self) {
        let len = self.len();
        // index 0 is always in bounds
        let _ = self.splice(0, len, []);
    }

    /// Replaces the whole contents in a single splice.
    pub fn replace<I>(&self, items: I) -> Vec<V>
    where
        I: IntoIterator<Item = V>,
    {
        let len = self.len();
        let removed = self.splice(0, len, items).unwrap_or_default();
        debug!(source = self.inner.id, removed = removed.len(), "vec replaced");
        removed
    }
}

impl<V: Clone + 'static> Observable for ObservableVec<V> {
    type Key = usize;
    type Value = V;

    #[inline]
    fn source_id(&self) -> SourceId {
        self.inner.id
    }

    fn values(&self) -> Vec<V> {
        self.inner.items.borrow().clone()
    }

    fn observe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&VecEvent<V>) + 'static,
    {
        let id = self.inner.listeners.borrow_mut().subscribe(listener);
        let registry: Rc<dyn Unsubscribe> = self.inner.listeners.clone();
        Subscription::new(id, Rc::downgrade(&registry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn recording(v: &ObservableVec<i32>) -> (Rc<RefCell<Vec<Change<usize, i32>>>>, Subscription) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let sub = v.observe(move |event| sink.borrow_mut().push(event.change.clone()));
        (log, sub)
    }

    #[test]
    fn test_push_emits_splice() {
        let v = ObservableVec::new();
        let (log, _sub) = recording(&v);

        v.push(1);
        v.push(2);

        assert_eq!(v.values(), vec![1, 2]);
        assert_eq!(
            log.borrow()[1],
            Change::Spliced {
                index: 1,
                removed: vec![],
                added: vec![2]
            }
        );
    }

    #[test]
    fn test_pop() {
        let v = ObservableVec::from_vec(vec![1, 2]);
        let (log, _sub) = recording(&v);

        assert_eq!(v.pop(), Some(2));
        assert_eq!(v.pop(), Some(1));
        assert_eq!(v.pop(), None);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_set_emits_update() {
        let v = ObservableVec::from_vec(vec![1, 2, 3]);
        let (log, _sub) = recording(&v);

        assert_eq!(v.set(1, 20), Ok(2));
        assert_eq!(v.values(), vec![1, 20, 3]);
        assert_eq!(
            log.borrow()[0],
            Change::Updated {
                key: 1,
                old: 2,
                new: 20
            }
        );
    }

    #[test]
    fn test_set_out_of_bounds() {
        let v = ObservableVec::from_vec(vec![1]);
        let (log, _sub) = recording(&v);

        assert_eq!(v.set(3, 0), Err(Error::index_out_of_bounds(3, 1)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_modify_reports_before_and_after() {
        let v = ObservableVec::from_vec(vec![5]);
        let (log, _sub) = recording(&v);

        v.modify(0, |x| *x += 1).unwrap();

        assert_eq!(
            log.borrow()[0],
            Change::Updated {
                key: 0,
                old: 5,
                new: 6
            }
        );
    }

    #[test]
    fn test_splice() {
        let v = ObservableVec::from_vec(vec![1, 2, 3, 4]);
        let (log, _sub) = recording(&v);

        let removed = v.splice(1, 2, [7, 8, 9]).unwrap();

        assert_eq!(removed, vec![2, 3]);
        assert_eq!(v.values(), vec![1, 7, 8, 9, 4]);
        assert_eq!(
            log.borrow()[0],
            Change::Spliced {
                index: 1,
                removed: vec![2, 3],
                added: vec![7, 8, 9]
            }
        );
    }

    #[test]
    fn test_splice_clamps_delete_count() {
        let v = ObservableVec::from_vec(vec![1, 2, 3]);
        assert_eq!(v.splice(2, 10, []).unwrap(), vec![3]);
        assert_eq!(v.values(), vec![1, 2]);
        assert!(v.splice(5, 0, [1]).is_err());
    }

    #[test]
    fn test_empty_splice_is_silent() {
        let v = ObservableVec::from_vec(vec![1]);
        let (log, _sub) = recording(&v);

        v.splice(0, 0, []).unwrap();
        ObservableVec::<i32>::new().clear();

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_insert_remove() {
        let v = ObservableVec::from_vec(vec![1, 3]);
        v.insert(1, 2).unwrap();
        assert_eq!(v.values(), vec![1, 2, 3]);
        assert_eq!(v.remove(0), Ok(1));
        assert_eq!(v.remove(5), Err(Error::index_out_of_bounds(5, 2)));
        assert_eq!(v.values(), vec![2, 3]);
    }

    #[test]
    fn test_clear_and_replace() {
        let v = ObservableVec::from_vec(vec![1, 2]);
        assert_eq!(v.replace([3, 4, 5]), vec![1, 2]);
        assert_eq!(v.values(), vec![3, 4, 5]);
        v.clear();
        assert!(v.is_empty());
    }

    #[test]
    fn test_events_carry_source_id() {
        let v = ObservableVec::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = v.observe(move |event| sink.borrow_mut().push(event.source));

        v.push(1);

        assert_eq!(*seen.borrow(), vec![v.source_id()]);
        assert_ne!(v.source_id(), ObservableVec::<i32>::new().source_id());
    }

    #[test]
    fn test_dropping_subscription_detaches() {
        let v = ObservableVec::new();
        let (log, sub) = recording(&v);
        assert_eq!(v.observer_count(), 1);

        drop(sub);
        v.push(1);

        assert_eq!(v.observer_count(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_with_slice() {
        let v = ObservableVec::from_vec(vec![1, 2, 3]);
        assert_eq!(v.with_slice(|items| items.iter().sum::<i32>()), 6);
        assert_eq!(v.get(2), Some(3));
        assert_eq!(v.get(3), None);
    }

    #[test]
    fn test_clones_share_contents() {
        let v = ObservableVec::new();
        let w = v.clone();
        w.push(1);
        assert_eq!(v.get(0), Some(1));
        assert_eq!(v.source_id(), w.source_id());
    }

    #[test]
    fn test_listener_can_read_source() {
        let v = ObservableVec::new();
        let lens = Rc::new(RefCell::new(Vec::new()));
        let (reader, sink) = (v.clone(), lens.clone());
        let _sub = v.observe(move |_| sink.borrow_mut().push(reader.len()));

        v.push(1);
        v.push(2);

        assert_eq!(*lens.borrow(), vec![1, 2]);
    }
}
