use core::iter::Zip;
use core::slice;

use crate::SplitMap;

pub struct Items<'a, K, V> {
    pub(crate) inner: Zip<slice::Iter<'a, K>, slice::Iter<'a, V>>,
}

impl<'a, K, V> Iterator for Items<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Items<'a, K, V> {}

impl<K, V> SplitMap<K, V> {
    pub fn items(&self) -> Items<'_, K, V> {
        Items {
            inner: self.keys.iter().zip(self.values.iter()),
        }
    }

    pub fn keys(&self) -> slice::Iter<'_, K> {
        self.keys.iter()
    }
}
