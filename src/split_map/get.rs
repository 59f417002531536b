use crate::SplitMap;

impl<K: Ord, V> SplitMap<K, V> {
    #[inline(always)]
    pub(crate) fn search(&self, key: &K) -> Result<usize, usize> {
        self.keys.binary_search(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let idx = self.search(key).ok()?;
        Some(&self.values[idx])
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_ok()
    }
}
