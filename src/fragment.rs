use core::marker::PhantomData;

use crate::{BenchKey, BenchValue, OrderedMap};

/// Scratch maps that are grown in lockstep with the map under test.
///
/// Before each timed insert the runner calls [`Fragmenter::scatter`], which
/// writes one derived key into every scratch map. The scratch nodes land in
/// the same allocator size classes as the measured map's nodes, so the
/// measured map ends up spread across a fragmented heap rather than one
/// contiguous run of fresh pages.
pub struct Fragmenter<K, V, M> {
    scratch: Vec<M>,
    _marker: PhantomData<(K, V)>,
}

impl<K, V, M> Fragmenter<K, V, M>
where
    K: BenchKey,
    V: BenchValue,
    M: OrderedMap<K, V>,
{
    /// `factor` scratch maps; zero disables injection.
    pub fn new(factor: usize) -> Self {
        Self {
            scratch: (0..factor).map(|_| M::default()).collect(),
            _marker: PhantomData,
        }
    }

    pub fn factor(&self) -> usize {
        self.scratch.len()
    }

    /// One insert into each scratch map, keyed by `factor * raw + j`.
    #[inline]
    pub fn scatter(&mut self, raw: u64) {
        let factor = self.scratch.len() as u64;
        let base = raw.wrapping_mul(factor);
        for (j, map) in self.scratch.iter_mut().enumerate() {
            let aux = base.wrapping_add(j as u64);
            map.insert_or_update(K::make(aux), V::make(aux, 0));
        }
    }

    /// Total entries held across all scratch maps.
    pub fn scratch_len(&self) -> usize {
        self.scratch.iter().map(|m| m.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMap;
    use std::collections::BTreeMap;

    #[test]
    fn every_scratch_map_receives_one_key_per_scatter() {
        let mut frag: Fragmenter<u64, u64, BTreeMap<u64, u64>> = Fragmenter::new(4);
        for raw in [10, 11, 12] {
            frag.scatter(raw);
        }
        assert_eq!(frag.factor(), 4);
        assert_eq!(frag.scratch_len(), 12);
        // Key 41 = 4 * 10 + 1 lands in the second scratch map.
        assert!(frag.scratch[1].contains_key(&41));
    }

    #[test]
    fn derived_keys_do_not_collide_across_real_keys() {
        let mut frag: Fragmenter<String, String, FlatMap<String, String>> = Fragmenter::new(64);
        for raw in 0..32 {
            frag.scatter(raw);
        }
        assert_eq!(frag.scratch_len(), 64 * 32);
    }

    #[test]
    fn zero_factor_is_a_no_op() {
        let mut frag: Fragmenter<u64, u64, FlatMap<u64, u64>> = Fragmenter::new(0);
        frag.scatter(5);
        assert_eq!(frag.scratch_len(), 0);
    }
}
