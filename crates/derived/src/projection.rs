//! The projection engine.
//!
//! `Projection` owns the derived sequence and knows how to rebuild it from a
//! snapshot of the source and how to patch it for a single `Change`. It has
//! no notion of subscriptions; `DerivedList` wires it to a live source.

use crate::change_set::ChangeSet;
use crate::config::{Config, ConfigUpdate, DuplicatePolicy};
use crate::locator::{locate, upper_bound};
use crate::log::{debug, trace};
use alloc::vec::Vec;
use vista_core::Change;

/// A filtered and optionally sorted projection of a source's values.
///
/// Invariants, holding after every call:
/// - every element passes the filter, if one is set;
/// - elements are ordered by the comparator, if one is set.
#[derive(Debug)]
pub struct Projection<V> {
    items: Vec<V>,
    config: Config<V>,
    duplicates: DuplicatePolicy,
    rebuild_count: u64,
}

impl<V> Projection<V> {
    /// Creates an empty projection. Nothing is built yet.
    pub fn new(config: Config<V>, duplicates: DuplicatePolicy) -> Self {
        Self {
            items: Vec::new(),
            config,
            duplicates,
            rebuild_count: 0,
        }
    }

    /// Returns the projected elements.
    #[inline]
    pub fn items(&self) -> &[V] {
        &self.items
    }

    /// Returns the number of projected elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is projected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the active configuration.
    #[inline]
    pub fn config(&self) -> &Config<V> {
        &self.config
    }

    /// Returns the duplicate policy used by sorted insertion.
    #[inline]
    pub fn duplicates(&self) -> DuplicatePolicy {
        self.duplicates
    }

    /// Returns how many full rebuilds have run.
    #[inline]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    /// Applies a configuration update.
    ///
    /// Returns true if the configuration changed, in which case the caller
    /// must rebuild; the projection is stale until it does.
    pub fn reconfigure(&mut self, update: ConfigUpdate<V>) -> bool {
        self.config.apply(update)
    }
}

impl<V: Clone + PartialEq> Projection<V> {
    /// Recomputes the projection from `values`, replacing it wholesale.
    ///
    /// Sorting is stable, so equal elements keep source order. Duplicates
    /// already present in the source are kept regardless of policy.
    pub fn rebuild<I>(&mut self, values: I) -> ChangeSet<V>
    where
        I: IntoIterator<Item = V>,
    {
        let mut items: Vec<V> = match &self.config.filter {
            Some(filter) => values.into_iter().filter(|v| filter.test(v)).collect(),
            None => values.into_iter().collect(),
        };
        if let Some(sort) = &self.config.sort {
            items.sort_by(|a, b| sort.compare(a, b));
        }

        self.rebuild_count += 1;
        debug!(
            len = items.len(),
            rebuilds = self.rebuild_count,
            filtered = self.config.filter.is_some(),
            sorted = self.config.sort.is_some(),
            "projection rebuilt"
        );

        let previous = core::mem::replace(&mut self.items, items);
        ChangeSet::rebuild(previous, self.items.clone())
    }

    /// Patches the projection for one source change.
    pub fn apply<K>(&mut self, change: &Change<K, V>) -> ChangeSet<V> {
        let mut changes = ChangeSet::new();
        match change {
            Change::Spliced { removed, added, .. } => {
                for value in removed {
                    self.remove_all(value, &mut changes);
                }
                for value in added {
                    self.insert(value.clone(), self.duplicates, &mut changes);
                }
            }
            Change::Added { value, .. } => self.insert(value.clone(), self.duplicates, &mut changes),
            Change::Updated { old, new, .. } => {
                // old == new: same element, possibly mutated in place. It is
                // still in the source, so it is re-placed even if its new key
                // collides with another element's.
                let policy = if old == new {
                    DuplicatePolicy::Keep
                } else {
                    self.duplicates
                };
                self.remove_all(old, &mut changes);
                self.insert(new.clone(), policy, &mut changes);
            }
            Change::Removed { value, .. } => self.remove_all(value, &mut changes),
        }
        trace!(
            kind = ?change.kind(),
            added = changes.added.len(),
            removed = changes.removed.len(),
            len = self.items.len(),
            "projection patched"
        );
        changes
    }

    /// Inserts `value` if it passes the filter, at its sorted position or at
    /// the end. `policy` decides what a comparator-equal hit does.
    fn insert(&mut self, value: V, policy: DuplicatePolicy, changes: &mut ChangeSet<V>) {
        if let Some(filter) = &self.config.filter {
            if !filter.test(&value) {
                return;
            }
        }
        let index = match &self.config.sort {
            None => self.items.len(),
            Some(sort) => match locate(&self.items, &value, |a, b| sort.compare(a, b)) {
                Err(index) => index,
                Ok(_) => match policy {
                    DuplicatePolicy::Skip => return,
                    DuplicatePolicy::Keep => {
                        upper_bound(&self.items, &value, |a, b| sort.compare(a, b))
                    }
                },
            },
        };
        self.items.insert(index, value.clone());
        changes.add(value);
    }

    /// Removes every occurrence of `value`.
    fn remove_all(&mut self, value: &V, changes: &mut ChangeSet<V>) {
        let before = self.items.len();
        self.items.retain(|item| item != value);
        for _ in self.items.len()..before {
            changes.remove(value.clone());
        }
    }

    /// Returns true if `value` is projected.
    pub fn contains(&self, value: &V) -> bool {
        self.items.contains(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Comparator, Filter};
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::Cell;

    fn splice(added: Vec<i32>) -> Change<usize, i32> {
        Change::Spliced {
            index: 0,
            removed: vec![],
            added,
        }
    }

    fn sorted() -> Projection<i32> {
        Projection::new(
            Config {
                filter: None,
                sort: Some(Comparator::new(|a: &i32, b: &i32| a.cmp(b))),
            },
            DuplicatePolicy::Skip,
        )
    }

    #[test]
    fn test_rebuild_filters_and_sorts() {
        let mut p = Projection::new(
            Config {
                filter: Some(Filter::new(|x: &i32| *x > 1)),
                sort: Some(Comparator::natural()),
            },
            DuplicatePolicy::Skip,
        );

        let cs = p.rebuild(vec![5, 1, 4, 2, 4]);

        assert_eq!(p.items(), &[2, 4, 4, 5]);
        assert!(cs.rebuilt);
        assert_eq!(p.rebuild_count(), 1);
    }

    #[test]
    fn test_rebuild_without_config_copies_source() {
        let mut p = Projection::new(Config::default(), DuplicatePolicy::Skip);
        p.rebuild(vec![3, 1, 2]);
        assert_eq!(p.items(), &[3, 1, 2]);
    }

    #[test]
    fn test_added_one_at_a_time_sorted() {
        let mut p = sorted();
        for value in [5, 1, 3] {
            p.apply(&Change::Added { key: "k", value });
        }
        assert_eq!(p.items(), &[1, 3, 5]);
    }

    #[test]
    fn test_splice_filter_only_keeps_source_order() {
        let mut p = Projection::new(
            Config {
                filter: Some(Filter::new(|x: &i32| x % 2 == 0)),
                sort: None,
            },
            DuplicatePolicy::Skip,
        );

        let cs = p.apply(&splice(vec![1, 2, 3, 4]));

        assert_eq!(p.items(), &[2, 4]);
        assert_eq!(cs.added, vec![2, 4]);
    }

    #[test]
    fn test_splice_sorted_inserts_individually() {
        let mut p = sorted();
        p.apply(&splice(vec![9, 2, 7]));
        p.apply(&splice(vec![8, 1]));
        assert_eq!(p.items(), &[1, 2, 7, 8, 9]);
    }

    #[test]
    fn test_splice_removes_then_adds() {
        let mut p = Projection::new(Config::default(), DuplicatePolicy::Skip);
        p.rebuild(vec![1, 2, 3]);

        let cs = p.apply(&Change::<usize, i32>::Spliced {
            index: 1,
            removed: vec![2],
            added: vec![5],
        });

        assert_eq!(p.items(), &[1, 3, 5]);
        assert_eq!(cs.removed, vec![2]);
        assert_eq!(cs.added, vec![5]);
    }

    #[test]
    fn test_delete_removes_all_occurrences() {
        let mut p = Projection::new(Config::default(), DuplicatePolicy::Skip);
        p.apply(&Change::Added { key: 1, value: 7 });
        p.apply(&Change::Added { key: 2, value: 7 });
        p.apply(&Change::Added { key: 3, value: 8 });
        assert_eq!(p.items(), &[7, 7, 8]);

        let cs = p.apply(&Change::Removed { key: 1, value: 7 });

        assert_eq!(p.items(), &[8]);
        assert_eq!(cs.removed, vec![7, 7]);
    }

    #[test]
    fn test_sorted_skip_policy_drops_equal() {
        let mut p = sorted();
        p.apply(&splice(vec![3, 3, 1]));
        assert_eq!(p.items(), &[1, 3]);
    }

    #[test]
    fn test_sorted_keep_policy_is_stable() {
        let mut p = Projection::new(
            Config {
                filter: None,
                sort: Some(Comparator::by_key(|pair: &(i32, char)| pair.0)),
            },
            DuplicatePolicy::Keep,
        );

        p.apply(&Change::<usize, _>::Spliced {
            index: 0,
            removed: vec![],
            added: vec![(2, 'a'), (1, 'b'), (2, 'c'), (2, 'd')],
        });

        assert_eq!(p.items(), &[(1, 'b'), (2, 'a'), (2, 'c'), (2, 'd')]);
    }

    #[test]
    fn test_update_with_different_values() {
        let mut p = sorted();
        p.rebuild(vec![1, 5, 9]);

        let cs = p.apply(&Change::Updated {
            key: 1usize,
            old: 5,
            new: 10,
        });

        assert_eq!(p.items(), &[1, 9, 10]);
        assert_eq!(cs.removed, vec![5]);
        assert_eq!(cs.added, vec![10]);
    }

    #[test]
    fn test_update_to_failing_value_drops_it() {
        let mut p = Projection::new(
            Config {
                filter: Some(Filter::new(|x: &i32| *x < 10)),
                sort: None,
            },
            DuplicatePolicy::Skip,
        );
        p.rebuild(vec![1, 2]);

        p.apply(&Change::Updated {
            key: 0usize,
            old: 2,
            new: 20,
        });

        assert_eq!(p.items(), &[1]);
    }

    #[test]
    fn test_in_place_update_repositions_shared_element() {
        #[derive(Debug)]
        struct Task {
            rank: Cell<i32>,
        }
        // identity equality, like comparing object references
        #[derive(Clone, Debug)]
        struct Handle(Rc<Task>);
        impl PartialEq for Handle {
            fn eq(&self, other: &Self) -> bool {
                Rc::ptr_eq(&self.0, &other.0)
            }
        }

        let task = |rank| Handle(Rc::new(Task { rank: Cell::new(rank) }));
        let (a, b, c) = (task(1), task(2), task(3));

        let mut p = Projection::new(
            Config {
                filter: None,
                sort: Some(Comparator::by_key(|h: &Handle| h.0.rank.get())),
            },
            DuplicatePolicy::Skip,
        );
        p.rebuild(vec![a.clone(), b.clone(), c.clone()]);

        a.0.rank.set(5);
        p.apply(&Change::Updated {
            key: 0usize,
            old: a.clone(),
            new: a.clone(),
        });

        assert_eq!(p.items(), &[b, c, a]);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn test_in_place_update_onto_equal_key_keeps_element() {
        #[derive(Debug)]
        struct Task {
            rank: Cell<i32>,
        }
        #[derive(Clone, Debug)]
        struct Handle(Rc<Task>);
        impl PartialEq for Handle {
            fn eq(&self, other: &Self) -> bool {
                Rc::ptr_eq(&self.0, &other.0)
            }
        }

        let task = |rank| Handle(Rc::new(Task { rank: Cell::new(rank) }));
        let (a, b) = (task(1), task(2));

        let mut p = Projection::new(
            Config {
                filter: None,
                sort: Some(Comparator::by_key(|h: &Handle| h.0.rank.get())),
            },
            DuplicatePolicy::Skip,
        );
        p.rebuild(vec![a.clone(), b.clone()]);

        b.0.rank.set(1);
        let cs = p.apply(&Change::Updated {
            key: 1usize,
            old: b.clone(),
            new: b.clone(),
        });

        assert_eq!(p.items(), &[a, b.clone()]);
        assert_eq!(cs.removed, vec![b.clone()]);
        assert_eq!(cs.added, vec![b]);
    }

    #[test]
    fn test_update_to_equal_value_still_skips_under_skip_policy() {
        let mut p = sorted();
        p.rebuild(vec![1, 5]);

        p.apply(&Change::Updated {
            key: 1usize,
            old: 5,
            new: 1,
        });

        assert_eq!(p.items(), &[1]);
    }

    #[test]
    fn test_reconfigure_reports_changes_only() {
        let mut p = Projection::new(Config::<i32>::default(), DuplicatePolicy::Skip);
        let even = Filter::new(|x: &i32| x % 2 == 0);

        assert!(p.reconfigure(ConfigUpdate::new().filter(Some(even.clone()))));
        assert!(!p.reconfigure(ConfigUpdate::new().filter(Some(even))));
        assert_eq!(p.rebuild_count(), 0);
    }

    #[test]
    fn test_contains() {
        let mut p = Projection::new(Config::default(), DuplicatePolicy::Skip);
        p.rebuild(vec![1, 2]);
        assert!(p.contains(&2));
        assert!(!p.contains(&3));
    }
}
