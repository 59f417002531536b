//! Sorted map with keys and values held in two parallel vectors.
//!
//! Lookups binary-search a dense key array, so a search never touches
//! value memory. Inserts shift both arrays, in the same way a leaf of a
//! B+ tree shifts its key and value columns.

mod get;
mod insert;
mod iterate;
mod merge;

pub use iterate::Items;

use crate::OrderedMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitMap<K, V> {
    /// Strictly ascending.
    keys: Vec<K>,
    /// `values[i]` belongs to `keys[i]`.
    values: Vec<V>,
}

impl<K, V> Default for SplitMap<K, V> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<K, V> SplitMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> bool
    where
        K: Ord,
    {
        self.keys.len() == self.values.len() && self.keys.windows(2).all(|w| w[0] < w[1])
    }
}

impl<K: Ord + Clone, V: Clone + PartialEq> OrderedMap<K, V> for SplitMap<K, V> {
    type Iter<'a>
        = Items<'a, K, V>
    where
        Self: 'a;

    fn insert_or_update(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.items()
    }

    fn merge(&mut self, other: Self) {
        self.merge_sorted(other);
    }

    fn bulk_insert<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.insert_unsorted(items);
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SplitMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = SplitMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
