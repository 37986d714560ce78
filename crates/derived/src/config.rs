//! View configuration: filter predicates, comparators and duplicate policy.
//!
//! `Filter` and `Comparator` are shared handles. Two handles are equal only
//! when they are clones of the same handle, which is how a view decides
//! whether a reconfiguration is a no-op.

use alloc::rc::Rc;
use core::cmp::Ordering;
use core::fmt;

/// A shared filter predicate.
pub struct Filter<V>(Rc<dyn Fn(&V) -> bool>);

impl<V> Filter<V> {
    /// Wraps a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&V) -> bool + 'static,
    {
        Self(Rc::new(predicate))
    }

    /// Returns true if `value` passes.
    #[inline]
    pub fn test(&self, value: &V) -> bool {
        (self.0)(value)
    }
}

impl<V> Clone for Filter<V> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<V> PartialEq for Filter<V> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<V> fmt::Debug for Filter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Filter({:p})", Rc::as_ptr(&self.0))
    }
}

/// A shared total-order comparator.
pub struct Comparator<V>(Rc<dyn Fn(&V, &V) -> Ordering>);

impl<V> Comparator<V> {
    /// Wraps a comparison function.
    pub fn new<F>(compare: F) -> Self
    where
        F: Fn(&V, &V) -> Ordering + 'static,
    {
        Self(Rc::new(compare))
    }

    /// Orders values by a derived key.
    pub fn by_key<K, F>(key: F) -> Self
    where
        K: Ord,
        F: Fn(&V) -> K + 'static,
    {
        Self::new(move |a, b| key(a).cmp(&key(b)))
    }

    /// Compares two values.
    #[inline]
    pub fn compare(&self, a: &V, b: &V) -> Ordering {
        (self.0)(a, b)
    }
}

impl<V: Ord> Comparator<V> {
    /// Orders values by their `Ord` implementation.
    pub fn natural() -> Self {
        Self::new(|a: &V, b: &V| a.cmp(b))
    }
}

impl<V> Clone for Comparator<V> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<V> PartialEq for Comparator<V> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<V> fmt::Debug for Comparator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Comparator({:p})", Rc::as_ptr(&self.0))
    }
}

/// What to do when a sorted view receives a value that compares equal to
/// one it already holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Drop the incoming value.
    #[default]
    Skip,
    /// Insert it after the existing equal elements.
    Keep,
}

/// The active filter and sort of a view.
#[derive(Debug)]
pub struct Config<V> {
    /// Elements failing this predicate are excluded
    pub filter: Option<Filter<V>>,
    /// Elements are kept ordered by this comparator
    pub sort: Option<Comparator<V>>,
}

impl<V> Default for Config<V> {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
        }
    }
}

impl<V> Clone for Config<V> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            sort: self.sort.clone(),
        }
    }
}

impl<V> Config<V> {
    /// Applies `update`, returning true if anything actually changed.
    pub fn apply(&mut self, update: ConfigUpdate<V>) -> bool {
        let mut changed = false;
        if let Some(filter) = update.filter {
            if filter != self.filter {
                self.filter = filter;
                changed = true;
            }
        }
        if let Some(sort) = update.sort {
            if sort != self.sort {
                self.sort = sort;
                changed = true;
            }
        }
        changed
    }
}

/// A partial reconfiguration.
///
/// Each field is `None` to leave the setting alone, `Some(None)` to clear it
/// and `Some(Some(_))` to replace it.
#[derive(Debug)]
pub struct ConfigUpdate<V> {
    pub filter: Option<Option<Filter<V>>>,
    pub sort: Option<Option<Comparator<V>>>,
}

impl<V> Default for ConfigUpdate<V> {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
        }
    }
}

impl<V> ConfigUpdate<V> {
    /// Creates an update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or clears the filter.
    pub fn filter(mut self, filter: Option<Filter<V>>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets or clears the comparator.
    pub fn sort(mut self, sort: Option<Comparator<V>>) -> Self {
        self.sort = Some(sort);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_identity() {
        let even = Filter::new(|x: &i32| x % 2 == 0);
        let same = even.clone();
        let lookalike = Filter::new(|x: &i32| x % 2 == 0);

        assert_eq!(even, same);
        assert_ne!(even, lookalike);
        assert!(even.test(&4));
        assert!(!even.test(&3));
    }

    #[test]
    fn test_comparator_constructors() {
        let natural = Comparator::<i32>::natural();
        assert_eq!(natural.compare(&1, &2), Ordering::Less);

        let by_len = Comparator::by_key(|s: &&str| s.len());
        assert_eq!(by_len.compare(&"abc", &"z"), Ordering::Greater);
        assert_eq!(by_len, by_len.clone());
    }

    #[test]
    fn test_config_apply_detects_changes() {
        let even = Filter::new(|x: &i32| x % 2 == 0);
        let asc = Comparator::natural();
        let mut config = Config::default();

        assert!(!config.apply(ConfigUpdate::new()));
        assert!(config.apply(ConfigUpdate::new().filter(Some(even.clone()))));
        assert!(!config.apply(ConfigUpdate::new().filter(Some(even.clone()))));
        assert!(config.apply(ConfigUpdate::new().sort(Some(asc.clone()))));
        assert!(!config.apply(
            ConfigUpdate::new()
                .filter(Some(even))
                .sort(Some(asc))
        ));
        assert!(config.apply(ConfigUpdate::new().filter(None)));
        assert!(config.filter.is_none());
        assert!(config.sort.is_some());
    }

    #[test]
    fn test_clearing_absent_setting_is_noop() {
        let mut config = Config::<i32>::default();
        assert!(!config.apply(ConfigUpdate::new().filter(None).sort(None)));
    }
}
