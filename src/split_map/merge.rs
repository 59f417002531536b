use core::cmp::Ordering;

use crate::SplitMap;

impl<K: Ord, V> SplitMap<K, V> {
    /// Two-way merge of the sorted columns. Receiver values win on
    /// duplicate keys; the donor's duplicates are dropped.
    pub(crate) fn merge_sorted(&mut self, other: SplitMap<K, V>) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other;
            return;
        }

        let total = self.keys.len() + other.keys.len();
        let mut keys = Vec::with_capacity(total);
        let mut values = Vec::with_capacity(total);

        let mut left = core::mem::take(&mut self.keys)
            .into_iter()
            .zip(core::mem::take(&mut self.values))
            .peekable();
        let mut right = other.keys.into_iter().zip(other.values).peekable();

        loop {
            let ord = match (left.peek(), right.peek()) {
                (Some((a, _)), Some((b, _))) => a.cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => break,
            };
            let next = match ord {
                Ordering::Less => left.next(),
                Ordering::Greater => right.next(),
                Ordering::Equal => {
                    right.next();
                    left.next()
                }
            };
            if let Some((k, v)) = next {
                keys.push(k);
                values.push(v);
            }
        }

        self.keys = keys;
        self.values = values;
    }
}
