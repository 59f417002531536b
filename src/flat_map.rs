use core::cmp::Ordering;
use core::slice;

use crate::OrderedMap;

/// Sorted-vector map with keys and values interleaved in one allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatMap<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for FlatMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Ord, V> FlatMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    fn search(&self, key: &K) -> Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| k.cmp(key))
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.search(&key) {
            Ok(idx) => Some(core::mem::replace(&mut self.entries[idx].1, value)),
            Err(idx) => {
                self.entries.insert(idx, (key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let idx = self.search(key).ok()?;
        Some(&self.entries[idx].1)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_ok()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

pub struct Iter<'a, K, V> {
    inner: slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<K: Ord + Clone, V: Clone + PartialEq> OrderedMap<K, V> for FlatMap<K, V> {
    type Iter<'a>
        = Iter<'a, K, V>
    where
        Self: 'a;

    fn insert_or_update(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        FlatMap::iter(self)
    }

    /// Linear two-way merge of both sorted runs into a fresh buffer.
    fn merge(&mut self, other: Self) {
        if other.is_empty() {
            return;
        }
        let ours = core::mem::take(&mut self.entries);
        let mut merged = Vec::with_capacity(ours.len() + other.entries.len());
        let mut left = ours.into_iter().peekable();
        let mut right = other.entries.into_iter().peekable();
        loop {
            let ord = match (left.peek(), right.peek()) {
                (Some((a, _)), Some((b, _))) => a.cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => break,
            };
            match ord {
                Ordering::Less => merged.extend(left.next()),
                Ordering::Greater => merged.extend(right.next()),
                Ordering::Equal => {
                    merged.extend(left.next());
                    right.next();
                }
            }
        }
        self.entries = merged;
    }

    /// Append, stable sort, then drop later duplicates. Receiver entries sit
    /// ahead of new ones after the stable sort, so they survive the dedup.
    fn bulk_insert<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.entries.extend(items);
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        self.entries.dedup_by(|later, earlier| later.0 == earlier.0);
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for FlatMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = FlatMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
