//! Binary search over a sorted projection.
//!
//! `locate` follows the `slice::binary_search_by` convention: `Ok(i)` when an
//! element comparing equal sits at `i`, `Err(i)` for the position where the
//! value would be inserted to keep the slice ordered. `encode` folds both
//! cases into one signed integer, `-(insertion + 1)` for misses.

use core::cmp::Ordering;

/// Locates `value` in `items`, which must be ordered by `compare`.
///
/// When several elements compare equal, any one of them may be reported.
pub fn locate<T, F>(items: &[T], value: &T, mut compare: F) -> Result<usize, usize>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut low = 0;
    let mut high = items.len();
    while low < high {
        let mid = low + (high - low) / 2;
        match compare(&items[mid], value) {
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
            Ordering::Equal => return Ok(mid),
        }
    }
    Err(low)
}

/// Returns the index just past the last element comparing equal to `value`.
///
/// Inserting there keeps equal elements in arrival order.
pub fn upper_bound<T, F>(items: &[T], value: &T, mut compare: F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    items.partition_point(|item| compare(item, value) != Ordering::Greater)
}

/// Encodes a location as a single integer.
///
/// Hits map to their index, misses to `-(insertion + 1)`, which is always
/// negative.
#[inline]
pub fn encode(location: Result<usize, usize>) -> isize {
    match location {
        Ok(index) => index as isize,
        Err(insertion) => -(insertion as isize) - 1,
    }
}
