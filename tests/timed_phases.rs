
use mapbench::{
    find_phase, insert_phase, iterate_phase, run_case, CaseInputs, KeyShape, MapKind,
    OrderedMap, TestCase, UnionStrategy, Workload,
};
use std::collections::BTreeSet;
use test_utils::*;

struct InsertThenFind {
    keys: Vec<u64>,
    trials: usize,
    fragmentation: usize,
}

impl KindCheck for InsertThenFind {
    fn check<M: OrderedMap<u64, u64>>(&self, kind: MapKind) {
        let distinct = self.keys.iter().collect::<BTreeSet<_>>().len();
        let (maps, inserted) =
            insert_phase::<u64, u64, M>(&self.keys, self.trials, self.fragmentation);

        assert_eq!(inserted.samples.len(), self.trials);
        assert_eq!(maps.len(), self.trials);
        for map in &maps {
            assert_eq!(map.len(), distinct, "{kind}: size after insert phase");
        }

        // Same maps, no rebuild: every workload key must be found.
        let found = find_phase::<u64, u64, M>(&maps, &self.keys);
        assert_eq!(found.samples.len(), self.trials);
        assert_eq!(
            found.touched,
            (self.trials * self.keys.len()) as u64,
            "{kind}: find phase missed keys"
        );

        let iterated = iterate_phase::<u64, u64, M>(&maps);
        assert_eq!(iterated.touched, (self.trials * distinct) as u64);
    }
}

#[test]
fn test_insert_size_matches_distinct_keys() {
    let mut keys = random_keys(300, 120, 12345);
    for_each_kind(&InsertThenFind {
        keys: keys.clone(),
        trials: 3,
        fragmentation: 4,
    });
    // Presentation order must not matter.
    keys.reverse();
    for_each_kind(&InsertThenFind {
        keys,
        trials: 3,
        fragmentation: 0,
    });
}

#[test]
fn test_find_has_no_false_negatives_on_random_workload() {
    let keys = Workload::with_seed(99).keys(512);
    for_each_kind(&InsertThenFind {
        keys,
        trials: 5,
        fragmentation: 16,
    });
}

#[test]
fn test_find_counts_only_hits_for_foreign_keys() {
    let (maps, _) = insert_phase::<u64, u64, mapbench::FlatMap<u64, u64>>(&[1, 2, 3], 3, 2);
    let found = find_phase::<u64, u64, _>(&maps, &[2, 3, 4, 5]);
    assert_eq!(found.touched, 3 * 2);
}

#[test]
fn test_end_to_end_two_adapters_same_shape() {
    let keys = Workload::from_entropy().keys(8);
    let inputs = CaseInputs {
        keys: Some(&keys),
        operands: None,
        fragmentation: 64,
        union: UnionStrategy::Merge,
    };

    let std_case = TestCase::new(KeyShape::Int, MapKind::StdMap, 8, 7).unwrap();
    let flat_case = TestCase::new(KeyShape::Int, MapKind::FlatMap, 8, 7).unwrap();
    let std_result = run_case::<u64, u64>(&std_case, &inputs).unwrap();
    let flat_result = run_case::<u64, u64>(&flat_case, &inputs).unwrap();

    assert_eq!(std_result.size, 8);
    assert_eq!(flat_result.size, 8);
    assert_eq!(std_result.operations(), vec!["insert", "iterate", "find"]);
    assert_eq!(std_result.operations(), flat_result.operations());
}

#[test]
fn test_string_case_with_merge_reports_all_four_operations() {
    let mut workload = Workload::with_seed(3);
    let keys = workload.keys(16);
    let operands = workload.merge_operands(16);
    let inputs = CaseInputs {
        keys: Some(&keys),
        operands: Some(&operands),
        fragmentation: 8,
        union: UnionStrategy::BulkInsert,
    };
    let case = TestCase::new(KeyShape::Str, MapKind::SplitMap, 16, 3).unwrap();
    let result = run_case::<String, String>(&case, &inputs).unwrap();
    assert_eq!(
        result.operations(),
        vec!["insert", "iterate", "find", "merge"]
    );
    assert!(result.to_literal().starts_with("{'size': 16, 'insert': "));
}
