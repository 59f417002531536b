//! Each container kind must behave exactly like `std::collections::BTreeMap`
//! for the operations the harness drives.

use mapbench::{FlatMap, MapKind, OrderedMap, SplitMap};
use std::collections::BTreeMap;
use test_utils::*;

fn populate<M: OrderedMap<u64, u64>>(data: &[u64]) -> (M, BTreeMap<u64, u64>) {
    let mut map = M::default();
    let mut reference = BTreeMap::new();
    for (i, &k) in data.iter().enumerate() {
        map.insert_or_update(k, i as u64);
        reference.insert(k, i as u64);
    }
    (map, reference)
}

struct Differential {
    data: Vec<u64>,
}

impl KindCheck for Differential {
    fn check<M: OrderedMap<u64, u64>>(&self, kind: MapKind) {
        let (map, reference) = populate::<M>(&self.data);

        assert_eq!(map.len(), reference.len(), "len mismatch for {kind}");
        let expected: Vec<_> = reference.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(entries(&map), expected, "iteration mismatch for {kind}");

        for key in 0..=self.data.iter().copied().max().unwrap_or(0) + 1 {
            assert_eq!(
                map.contains(&key),
                reference.contains_key(&key),
                "find({key}) mismatch for {kind}"
            );
        }
    }
}

#[test]
fn test_differential_sequential_and_reversed() {
    for_each_kind(&Differential {
        data: (0..100).collect(),
    });
    for_each_kind(&Differential {
        data: (0..100).rev().collect(),
    });
}

#[test]
fn test_differential_with_duplicates_updates_values() {
    // Later occurrences must replace earlier values.
    for_each_kind(&Differential {
        data: random_keys(400, 97, 0x9E3779B97F4A7C15),
    });
}

#[test]
fn test_differential_empty_and_single() {
    for_each_kind(&Differential { data: vec![] });
    for_each_kind(&Differential { data: vec![42] });
}

#[test]
fn test_equality_ignores_storage_capacity() {
    let mut roomy: FlatMap<u64, u64> = FlatMap::with_capacity(1024);
    let mut tight: FlatMap<u64, u64> = FlatMap::new();
    for k in [3, 1, 2] {
        roomy.insert(k, k);
    }
    for k in [1, 2, 3] {
        tight.insert(k, k);
    }
    assert_eq!(roomy, tight);

    let mut split_a: SplitMap<u64, u64> = SplitMap::with_capacity(64);
    let mut split_b: SplitMap<u64, u64> = SplitMap::new();
    split_a.insert(1, 1);
    split_b.insert(1, 1);
    assert_eq!(split_a, split_b);
    split_b.insert(1, 2);
    assert_ne!(split_a, split_b);
}

#[test]
fn test_string_keys_iterate_lexicographically() {
    let mut map: SplitMap<String, String> = SplitMap::new();
    for raw in [10u64, 9, 100, 1] {
        map.insert(raw.to_string(), String::new());
    }
    let keys: Vec<_> = map.keys().cloned().collect();
    assert_eq!(keys, vec!["1", "10", "100", "9"]);
}
