//! Observable keyed collection.

use crate::log::trace;
use crate::observable::Observable;
use crate::subscription::{dispatch, Subscription, SubscriptionManager, Unsubscribe};
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::hash::Hash;
use hashbrown::hash_map::DefaultHashBuilder;
use indexmap::IndexMap;
use vista_core::{next_source_id, Change, ChangeEvent, Error, Result, SourceId};

type MapEvent<K, V> = ChangeEvent<K, V>;

struct Inner<K, V> {
    id: SourceId,
    entries: RefCell<IndexMap<K, V, DefaultHashBuilder>>,
    listeners: Rc<RefCell<SubscriptionManager<MapEvent<K, V>>>>,
}

/// An observable map that iterates in insertion order.
///
/// Inserting under a new key emits `Added`, under an existing key `Updated`,
/// and removal emits `Removed`. Removal preserves the order of the remaining
/// entries.
pub struct ObservableMap<K, V> {
    inner: Rc<Inner<K, V>>,
}

impl<K, V> Clone for ObservableMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K, V> Default for ObservableMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ObservableMap<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                id: next_source_id(),
                entries: RefCell::new(IndexMap::default()),
                listeners: Rc::new(RefCell::new(SubscriptionManager::new())),
            }),
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    /// Returns true if the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    /// Returns the number of active observers.
    pub fn observer_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn emit(&self, change: Change<K, V>) {
        let event = ChangeEvent::new(self.inner.id, change);
        trace!(source = self.inner.id, kind = ?event.kind(), "map change");
        dispatch(&self.inner.listeners, &event);
    }
}

impl<K: Hash + Eq + Clone, V: Clone> ObservableMap<K, V> {
    /// Returns a clone of the value under `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.entries.borrow().get(key).cloned()
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.entries.borrow().contains_key(key)
    }

    /// Returns the keys in insertion order.
    pub fn keys(&self) -> Vec<K> {
        self.inner.entries.borrow().keys().cloned().collect()
    }

    /// Inserts or replaces the value under `key`, returning the previous one.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        let old = self
            .inner
            .entries
            .borrow_mut()
            .insert(key.clone(), value.clone());
        let change = match &old {
            Some(old) => Change::Updated {
                key,
                old: old.clone(),
                new: value,
            },
            None => Change::Added { key, value },
        };
        self.emit(change);
        old
    }

    /// Removes the value under `key`.
    pub fn remove(&self, key: &K) -> Option<V> {
        let value = self.inner.entries.borrow_mut().shift_remove(key)?;
        self.emit(Change::Removed {
            key: key.clone(),
            value: value.clone(),
        });
        Some(value)
    }

    /// Mutates the value under `key` in place.
    ///
    /// Emits `Updated` with the value as it was before and after `f`.
    pub fn modify<F>(&self, key: &K, f: F) -> Result<()>
    where
        F: FnOnce(&mut V),
    {
        let (old, new) = {
            let mut entries = self.inner.entries.borrow_mut();
            let slot = entries.get_mut(key).ok_or(Error::KeyNotFound)?;
            let old = slot.clone();
            f(slot);
            (old, slot.clone())
        };
        self.emit(Change::Updated {
            key: key.clone(),
            old,
            new,
        });
        Ok(())
    }

    /// Removes every entry, emitting one `Removed` per entry in order.
    pub fn clear(&self) {
        let drained: Vec<(K, V)> = self.inner.entries.borrow_mut().drain(..).collect();
        for (key, value) in drained {
            self.emit(Change::Removed { key, value });
        }
    }
}

impl<K, V> Observable for ObservableMap<K, V>
where
    K: Hash + Eq + Clone + 'static,
    V: Clone + 'static,
{
    type Key = K;
    type Value = V;

    #[inline]
    fn source_id(&self) -> SourceId {
        self.inner.id
    }

    fn values(&self) -> Vec<V> {
        self.inner.entries.borrow().values().cloned().collect()
    }

    fn observe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&MapEvent<K, V>) + 'static,
    {
        let id = self.inner.listeners.borrow_mut().subscribe(listener);
        let registry: Rc<dyn Unsubscribe> = self.inner.listeners.clone();
        Subscription::new(id, Rc::downgrade(&registry))
    }
}
