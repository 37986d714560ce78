//! Subscription management for observable sources.
//!
//! This module provides subscription IDs, a manager for tracking active
//! listeners of one source, and the `Subscription` guard handed back to
//! observers so they can detach again.

use crate::log::trace;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use hashbrown::HashMap;

/// Unique identifier for a subscription.
pub type SubscriptionId = u64;

/// Callback type for change notifications.
pub type Listener<E> = Rc<dyn Fn(&E)>;

/// Manages the listeners of a single source.
///
/// Listeners are dispatched in subscription order.
pub struct SubscriptionManager<E> {
    /// Active listeners
    listeners: HashMap<SubscriptionId, Listener<E>>,
    /// Next subscription ID to assign
    next_id: SubscriptionId,
}

impl<E> Default for SubscriptionManager<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> SubscriptionManager<E> {
    /// Creates a new subscription manager.
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_id: 1,
        }
    }

    /// Subscribes with the given callback.
    ///
    /// Returns the subscription ID that can be used to unsubscribe.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.insert(id, Rc::new(callback));
        trace!(subscription = id, "subscribed");
        id
    }

    /// Unsubscribes by ID.
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.listeners.remove(&id).is_some();
        if removed {
            trace!(subscription = id, "unsubscribed");
        }
        removed
    }

    /// Returns the active listeners in subscription order.
    ///
    /// Sources dispatch from this snapshot rather than from the manager
    /// itself, so a listener may subscribe or unsubscribe while being
    /// notified.
    pub fn snapshot(&self) -> Vec<Listener<E>> {
        let mut entries: Vec<_> = self.listeners.iter().collect();
        entries.sort_unstable_by_key(|(id, _)| **id);
        entries.into_iter().map(|(_, l)| Rc::clone(l)).collect()
    }

    /// Returns the number of active subscriptions.
    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if there are no subscriptions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Dispatches `event` to every listener of a shared manager.
///
/// The manager is only borrowed while the listener snapshot is taken.
pub(crate) fn dispatch<E>(manager: &RefCell<SubscriptionManager<E>>, event: &E) {
    let listeners = manager.borrow().snapshot();
    for listener in listeners {
        listener(event);
    }
}

/// Something a subscription can be cancelled against.
pub trait Unsubscribe {
    /// Removes the subscription with the given ID.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

impl<E> Unsubscribe for RefCell<SubscriptionManager<E>> {
    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.borrow_mut().unsubscribe(id)
    }
}

/// A live subscription to a source.
///
/// Dropping the guard unsubscribes. The guard only holds a weak reference to
/// the source's listener table, so it never keeps a source alive.
pub struct Subscription {
    /// Unique identifier
    id: SubscriptionId,
    /// Where to cancel; `None` once cancelled
    registry: Option<Weak<dyn Unsubscribe>>,
}

impl Subscription {
    /// Creates a guard for subscription `id` registered in `registry`.
    pub fn new(id: SubscriptionId, registry: Weak<dyn Unsubscribe>) -> Self {
        Self {
            id,
            registry: Some(registry),
        }
    }

    /// Returns the subscription ID.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns whether this subscription has not been cancelled yet.
    ///
    /// A subscription whose source has been dropped still reports active
    /// until it is cancelled, though it will never fire again.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.registry.is_some()
    }

    /// Cancels the subscription.
    ///
    /// Returns true if a listener was actually removed. Calling this more
    /// than once is harmless.
    pub fn unsubscribe(&mut self) -> bool {
        match self.registry.take().and_then(|weak| weak.upgrade()) {
            Some(registry) => registry.unsubscribe(self.id),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn test_subscription_manager_subscribe() {
        let mut manager: SubscriptionManager<i32> = SubscriptionManager::new();

        let id1 = manager.subscribe(|_| {});
        let id2 = manager.subscribe(|_| {});

        assert_eq!(id1, 1);
        assert_eq!(id2, 2);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_subscription_manager_unsubscribe() {
        let mut manager: SubscriptionManager<i32> = SubscriptionManager::new();

        let id = manager.subscribe(|_| {});
        assert_eq!(manager.len(), 1);

        assert!(manager.unsubscribe(id));
        assert_eq!(manager.len(), 0);

        assert!(!manager.unsubscribe(id)); // Already removed
    }

    #[test]
    fn test_dispatch_reaches_every_listener() {
        let manager = RefCell::new(SubscriptionManager::new());

        let count = Rc::new(Cell::new(0));
        let count1 = count.clone();
        let count2 = count.clone();

        manager
            .borrow_mut()
            .subscribe(move |v: &i32| count1.set(count1.get() + *v));
        manager
            .borrow_mut()
            .subscribe(move |v: &i32| count2.set(count2.get() + *v * 10));

        dispatch(&manager, &2);

        assert_eq!(count.get(), 22);
    }

    #[test]
    fn test_dispatch_in_subscription_order() {
        let manager = RefCell::new(SubscriptionManager::new());
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in 0..8 {
            let order = order.clone();
            manager
                .borrow_mut()
                .subscribe(move |_: &()| order.borrow_mut().push(tag));
        }
        dispatch(&manager, &());

        assert_eq!(*order.borrow(), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_guard_unsubscribes_on_drop() {
        let manager = Rc::new(RefCell::new(SubscriptionManager::<i32>::new()));
        let id = manager.borrow_mut().subscribe(|_| {});
        let weak: Weak<dyn Unsubscribe> = Rc::downgrade(&manager) as Weak<dyn Unsubscribe>;

        let guard = Subscription::new(id, weak);
        assert!(guard.is_active());
        assert_eq!(manager.borrow().len(), 1);

        drop(guard);
        assert!(manager.borrow().is_empty());
    }

    #[test]
    fn test_guard_unsubscribe_once() {
        let manager = Rc::new(RefCell::new(SubscriptionManager::<i32>::new()));
        let id = manager.borrow_mut().subscribe(|_| {});
        let mut guard = Subscription::new(id, Rc::downgrade(&manager) as Weak<dyn Unsubscribe>);

        assert!(guard.unsubscribe());
        assert!(!guard.is_active());
        assert!(!guard.unsubscribe());
    }

    #[test]
    fn test_guard_outlives_registry() {
        let manager = Rc::new(RefCell::new(SubscriptionManager::<i32>::new()));
        let id = manager.borrow_mut().subscribe(|_| {});
        let mut guard = Subscription::new(id, Rc::downgrade(&manager) as Weak<dyn Unsubscribe>);

        drop(manager);
        assert!(!guard.unsubscribe());
    }

    #[test]
    fn test_listener_may_unsubscribe_during_dispatch() {
        let manager = Rc::new(RefCell::new(SubscriptionManager::<i32>::new()));
        let hits = Rc::new(Cell::new(0));

        let m = Rc::downgrade(&manager);
        let h = hits.clone();
        manager.borrow_mut().subscribe(move |_| {
            h.set(h.get() + 1);
            if let Some(m) = m.upgrade() {
                m.borrow_mut().unsubscribe(1);
            }
        });

        dispatch(&manager, &0);
        dispatch(&manager, &0);

        assert_eq!(hits.get(), 1);
        assert!(manager.borrow().is_empty());
    }
}
