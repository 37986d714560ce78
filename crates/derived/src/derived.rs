//! Live derived views over observable sources.
//!
//! A `DerivedList` subscribes to a source, keeps a `Projection` of its values
//! up to date incrementally, and republishes what changed to its own
//! subscribers as `ChangeSet`s.

use crate::change_set::ChangeSet;
use crate::config::{Comparator, Config, ConfigUpdate, DuplicatePolicy, Filter};
use crate::log::debug;
use crate::projection::Projection;
use crate::sequence::ReadSequence;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use vista_core::{ChangeEvent, Error, Result, SourceId};
use vista_observable::{Observable, Subscription, SubscriptionId, SubscriptionManager};

/// State shared between a `DerivedList` and its source listener.
struct Shared<V> {
    source: SourceId,
    projection: RefCell<Projection<V>>,
    observers: RefCell<SubscriptionManager<ChangeSet<V>>>,
}

impl<V: Clone + PartialEq> Shared<V> {
    /// Patches the projection for one source event and publishes the result.
    fn react<K>(&self, event: &ChangeEvent<K, V>) -> Result<()> {
        if event.source != self.source {
            return Err(Error::foreign_source(self.source, event.source));
        }
        let changes = self.projection.borrow_mut().apply(&event.change);
        self.publish(changes);
        Ok(())
    }

    /// Rebuilds the projection from `values` and publishes the result.
    fn rebuild(&self, values: Vec<V>) {
        let changes = self.projection.borrow_mut().rebuild(values);
        self.publish(changes);
    }

    /// Delivers `changes` to subscribers.
    ///
    /// The projection is not borrowed while subscribers run, so they may
    /// read the view.
    fn publish(&self, mut changes: ChangeSet<V>) {
        if changes.is_empty() {
            return;
        }
        let listeners = self.observers.borrow().snapshot();
        if listeners.is_empty() {
            return;
        }
        changes.current_result = self.projection.borrow().items().to_vec();
        for listener in listeners {
            listener(&changes);
        }
    }
}

/// A live, read-only, filtered and optionally sorted view of an observable
/// source.
///
/// The view reacts to every source change synchronously, inside the
/// source's notification. All mutation goes through the source; the view
/// itself has no mutating sequence operations:
///
/// ```compile_fail
/// use vista_derived::DerivedList;
/// use vista_observable::ObservableVec;
///
/// let source = ObservableVec::from_vec(vec![1, 2, 3]);
/// let list = DerivedList::new(&source);
/// list.push(4);
/// ```
///
/// ```compile_fail
/// use vista_derived::DerivedList;
/// use vista_observable::ObservableVec;
///
/// let source = ObservableVec::from_vec(vec![1, 2, 3]);
/// let mut list = DerivedList::new(&source);
/// list.splice(0, 1, []);
/// ```
///
/// # Example
///
/// ```
/// use vista_derived::{Comparator, DerivedList, Filter, ReadSequence};
/// use vista_observable::ObservableVec;
///
/// let source = ObservableVec::from_vec(vec![5, 8, 1, 4]);
/// let evens = DerivedList::builder(&source)
///     .filter(Filter::new(|x: &i32| x % 2 == 0))
///     .sort(Comparator::natural())
///     .build();
/// assert_eq!(evens.to_vec(), vec![4, 8]);
///
/// source.push(2);
/// source.push(3);
/// assert_eq!(evens.to_vec(), vec![2, 4, 8]);
/// ```
///
/// Reentrancy: a source listener registered *before* the view that reads the
/// view during the same notification sees the pre-change projection;
/// mutating the source from inside a `ReadSequence` callback panics.
pub struct DerivedList<S: Observable> {
    source: S,
    shared: Rc<Shared<S::Value>>,
    subscription: Option<Subscription>,
}

impl<S> DerivedList<S>
where
    S: Observable + Clone,
    S::Key: 'static,
    S::Value: Clone + PartialEq + 'static,
{
    /// Creates an unfiltered, unsorted view of `source` and populates it.
    pub fn new(source: &S) -> Self {
        Self::builder(source).build()
    }

    /// Starts configuring a view of `source`.
    pub fn builder(source: &S) -> DerivedListBuilder<S> {
        DerivedListBuilder::new(source)
    }

    fn with_options(source: &S, config: Config<S::Value>, duplicates: DuplicatePolicy, silent: bool) -> Self {
        let shared = Rc::new(Shared {
            source: source.source_id(),
            projection: RefCell::new(Projection::new(config, duplicates)),
            observers: RefCell::new(SubscriptionManager::new()),
        });

        let weak: Weak<Shared<S::Value>> = Rc::downgrade(&shared);
        let subscription = source.observe(move |event| {
            if let Some(shared) = weak.upgrade() {
                if let Err(err) = shared.react(event) {
                    panic!("derived view invariant violated: {}", err);
                }
            }
        });

        if !silent {
            shared.rebuild(source.values());
        }
        debug!(source = shared.source, silent, "derived view created");

        Self {
            source: source.clone(),
            shared,
            subscription: Some(subscription),
        }
    }

    /// Returns the source this view is bound to.
    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the ID of the bound source.
    #[inline]
    pub fn source_id(&self) -> SourceId {
        self.shared.source
    }

    /// Returns the number of projected elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.shared.projection.borrow().len()
    }

    /// Returns true if nothing is projected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shared.projection.borrow().is_empty()
    }

    /// Returns true if `value` is projected.
    pub fn has(&self, value: &S::Value) -> bool {
        self.shared.projection.borrow().contains(value)
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: usize) -> Option<S::Value> {
        self.shared.projection.borrow().items().get(index).cloned()
    }

    /// Returns an iterator over clones of the projected elements.
    ///
    /// The iterator reads the live projection one element at a time, so it
    /// holds no borrow between steps.
    pub fn iter(&self) -> Iter<'_, S::Value> {
        Iter {
            shared: &self.shared,
            index: 0,
        }
    }

    /// Returns the active filter and comparator.
    pub fn config(&self) -> Config<S::Value> {
        self.shared.projection.borrow().config().clone()
    }

    /// Returns the duplicate policy used by sorted insertion.
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.shared.projection.borrow().duplicates()
    }

    /// Returns how many full rebuilds have run.
    pub fn rebuild_count(&self) -> u64 {
        self.shared.projection.borrow().rebuild_count()
    }

    /// Replaces the filter. Rebuilds unless `filter` is the active handle.
    pub fn set_filter(&mut self, filter: Option<Filter<S::Value>>) -> &mut Self {
        self.configure(ConfigUpdate::new().filter(filter))
    }

    /// Replaces the comparator. Rebuilds unless `sort` is the active handle.
    pub fn set_sort(&mut self, sort: Option<Comparator<S::Value>>) -> &mut Self {
        self.configure(ConfigUpdate::new().sort(sort))
    }

    /// Updates filter and comparator together, with at most one rebuild.
    pub fn configure(&mut self, update: ConfigUpdate<S::Value>) -> &mut Self {
        let changed = self.shared.projection.borrow_mut().reconfigure(update);
        if changed {
            self.shared.rebuild(self.source.values());
        }
        self
    }

    /// Rebuilds the projection from the source's current values.
    ///
    /// Views created `silent` start empty; this populates them.
    pub fn refresh(&mut self) -> &mut Self {
        self.shared.rebuild(self.source.values());
        self
    }

    /// Subscribes to projection changes.
    ///
    /// The callback runs after every reaction or rebuild that changed the
    /// projection, with the projection not borrowed.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeSet<S::Value>) + 'static,
    {
        self.shared.observers.borrow_mut().subscribe(callback)
    }

    /// Unsubscribes by ID.
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.observers.borrow_mut().unsubscribe(id)
    }

    /// Returns the number of projection subscribers.
    pub fn subscription_count(&self) -> usize {
        self.shared.observers.borrow().len()
    }

    /// Stops observing the source.
    ///
    /// The projection keeps its last contents. Returns true the first time;
    /// later calls do nothing. Dropping the view disposes it as well.
    pub fn dispose(&mut self) -> bool {
        match self.subscription.take() {
            Some(mut subscription) => {
                debug!(source = self.shared.source, "derived view disposed");
                subscription.unsubscribe()
            }
            None => false,
        }
    }

    /// Returns true once the view has stopped observing its source.
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.subscription.is_none()
    }
}

impl<S> ReadSequence for DerivedList<S>
where
    S: Observable + Clone,
    S::Key: 'static,
    S::Value: Clone + PartialEq + 'static,
{
    type Item = S::Value;

    fn len(&self) -> usize {
        DerivedList::len(self)
    }

    fn with_items<R>(&self, f: impl FnOnce(&[S::Value]) -> R) -> R {
        f(self.shared.projection.borrow().items())
    }
}

impl<S: Observable> core::fmt::Debug for DerivedList<S>
where
    S::Value: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DerivedList")
            .field("source", &self.shared.source)
            .field("items", &self.shared.projection.borrow().items())
            .field("disposed", &self.subscription.is_none())
            .finish()
    }
}

/// Iterator over a `DerivedList`, yielding clones.
pub struct Iter<'a, V> {
    shared: &'a Shared<V>,
    index: usize,
}

impl<V: Clone> Iterator for Iter<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        let item = self.shared.projection.borrow().items().get(self.index).cloned()?;
        self.index += 1;
        Some(item)
    }
}

impl<'a, S> IntoIterator for &'a DerivedList<S>
where
    S: Observable + Clone,
    S::Key: 'static,
    S::Value: Clone + PartialEq + 'static,
{
    type Item = S::Value;
    type IntoIter = Iter<'a, S::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builder for `DerivedList`.
///
/// # Example
///
/// ```
/// use vista_derived::{DerivedList, DuplicatePolicy, Comparator, ReadSequence};
/// use vista_observable::ObservableVec;
///
/// let source = ObservableVec::from_vec(vec![3, 1, 2]);
/// let mut view = DerivedList::builder(&source)
///     .sort(Comparator::natural())
///     .duplicates(DuplicatePolicy::Keep)
///     .silent()
///     .build();
///
/// assert!(view.is_empty());
/// view.refresh();
/// assert_eq!(view.to_vec(), vec![1, 2, 3]);
/// ```
pub struct DerivedListBuilder<S: Observable> {
    source: S,
    config: Config<S::Value>,
    duplicates: DuplicatePolicy,
    silent: bool,
}

impl<S> DerivedListBuilder<S>
where
    S: Observable + Clone,
    S::Key: 'static,
    S::Value: Clone + PartialEq + 'static,
{
    /// Creates a builder for a view of `source`.
    pub fn new(source: &S) -> Self {
        Self {
            source: source.clone(),
            config: Config::default(),
            duplicates: DuplicatePolicy::default(),
            silent: false,
        }
    }

    /// Only project values passing `filter`.
    pub fn filter(mut self, filter: Filter<S::Value>) -> Self {
        self.config.filter = Some(filter);
        self
    }

    /// Keep the projection ordered by `sort`.
    pub fn sort(mut self, sort: Comparator<S::Value>) -> Self {
        self.config.sort = Some(sort);
        self
    }

    /// Sets the duplicate policy for sorted insertion.
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Skip the initial build; only changes from now on are projected.
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    /// Builds the view and starts observing the source.
    pub fn build(self) -> DerivedList<S> {
        DerivedList::with_options(&self.source, self.config, self.duplicates, self.silent)
    }
}
