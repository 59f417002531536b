use crate::SplitMap;

impl<K: Ord, V> SplitMap<K, V> {
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.search(&key) {
            Ok(idx) => Some(core::mem::replace(&mut self.values[idx], value)),
            Err(idx) => {
                self.keys.insert(idx, key);
                self.values.insert(idx, value);
                None
            }
        }
    }

    /// Append `items` to the tail, then restore order with one sort.
    ///
    /// Existing entries win over incoming duplicates, and among incoming
    /// duplicates the first one wins.
    pub(crate) fn insert_unsorted<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let existing = self.keys.len();
        for (k, v) in items {
            self.keys.push(k);
            self.values.push(v);
        }
        if self.keys.len() == existing {
            return;
        }

        // Sort a permutation rather than the columns so both stay in step.
        let mut order: Vec<usize> = (0..self.keys.len()).collect();
        order.sort_by(|&a, &b| self.keys[a].cmp(&self.keys[b]));
        order.dedup_by(|later, earlier| self.keys[*later] == self.keys[*earlier]);

        let mut keys: Vec<Option<K>> = self.keys.drain(..).map(Some).collect();
        let mut values: Vec<Option<V>> = self.values.drain(..).map(Some).collect();
        self.keys.reserve(order.len());
        self.values.reserve(order.len());
        for idx in order {
            if let (Some(k), Some(v)) = (keys[idx].take(), values[idx].take()) {
                self.keys.push(k);
                self.values.push(v);
            }
        }
    }
}
