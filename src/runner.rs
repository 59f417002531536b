//! Timed trials for each measured operation.
//!
//! Every phase returns raw per-trial durations; reduction happens in
//! [`crate::trimmed_mean`]. Insert-phase maps are handed back to the caller
//! so iterate and find measure the very same populated containers.

use std::hint::black_box;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::{
    millis, trimmed_mean, BenchError, BenchKey, BenchResult, BenchValue, BenchmarkResult,
    Fragmenter, KeyShape, MapKind, MergeOperands, OrderedMap, UnionStrategy, MIN_TRIALS,
};

/// Operations the runner can time, in output order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    Insert,
    Iterate,
    Find,
    Merge,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Iterate => "iterate",
            Operation::Find => "find",
            Operation::Merge => "merge",
        }
    }
}

/// One cell of the test matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    pub shape: KeyShape,
    pub kind: MapKind,
    pub size: usize,
    pub trials: usize,
}

impl TestCase {
    pub fn new(shape: KeyShape, kind: MapKind, size: usize, trials: usize) -> BenchResult<Self> {
        if trials < MIN_TRIALS {
            return Err(BenchError::TooFewTrials { trials });
        }
        Ok(Self {
            shape,
            kind,
            size,
            trials,
        })
    }
}

/// Raw trial durations for one phase.
#[derive(Clone, Debug, Default)]
pub struct PhaseTimings {
    pub samples: Vec<Duration>,
    /// Elements copied or found across all trials. Only kept so the
    /// optimizer cannot discard the timed loops.
    pub touched: u64,
}

impl PhaseTimings {
    fn with_trials(trials: usize) -> Self {
        Self {
            samples: Vec::with_capacity(trials),
            touched: 0,
        }
    }

    pub fn reduce(&self) -> BenchResult<Duration> {
        trimmed_mean(&self.samples)
    }
}

/// Build `trials` maps from `keys`, timing only the insert calls.
///
/// Each trial owns `fragmentation` scratch maps that receive derived keys
/// right before every timed insert and are dropped when the trial ends.
pub fn insert_phase<K, V, M>(
    keys: &[u64],
    trials: usize,
    fragmentation: usize,
) -> (Vec<M>, PhaseTimings)
where
    K: BenchKey,
    V: BenchValue,
    M: OrderedMap<K, V>,
{
    let mut maps = Vec::with_capacity(trials);
    let mut timings = PhaseTimings::with_trials(trials);
    for _ in 0..trials {
        let mut map = M::default();
        let mut frag = Fragmenter::<K, V, M>::new(fragmentation);
        let mut elapsed = Duration::ZERO;
        for &raw in keys {
            frag.scatter(raw);
            let key = K::make(raw);
            let value = V::make(raw, 0);
            let start = Instant::now();
            map.insert_or_update(key, value);
            elapsed += start.elapsed();
        }
        black_box(frag.scratch_len());
        timings.samples.push(elapsed);
        maps.push(map);
    }
    (maps, timings)
}

/// Copy every entry of each map into a fresh buffer, in key order.
pub fn iterate_phase<K, V, M>(maps: &[M]) -> PhaseTimings
where
    K: Clone,
    V: Clone,
    M: OrderedMap<K, V>,
{
    let mut timings = PhaseTimings::with_trials(maps.len());
    for map in maps {
        let mut buf: Vec<(K, V)> = Vec::with_capacity(map.len());
        let start = Instant::now();
        buf.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
        timings.samples.push(start.elapsed());
        timings.touched += black_box(buf.len()) as u64;
    }
    timings
}

/// Look up every workload key in each map, timing each call.
pub fn find_phase<K, V, M>(maps: &[M], keys: &[u64]) -> PhaseTimings
where
    K: BenchKey,
    M: OrderedMap<K, V>,
{
    let mut timings = PhaseTimings::with_trials(maps.len());
    for map in maps {
        let mut elapsed = Duration::ZERO;
        let mut hits = 0u64;
        for &raw in keys {
            let key = K::make(raw);
            let start = Instant::now();
            let found = map.contains(&key);
            elapsed += start.elapsed();
            hits += found as u64;
        }
        timings.samples.push(elapsed);
        timings.touched += black_box(hits);
    }
    timings
}

/// Insert, iterate and find for one test case.
///
/// Maps built by the insert trials stay alive through the iterate and find
/// phases and are dropped together at the end.
pub fn measure_access<K, V, M>(
    case: &TestCase,
    keys: &[u64],
    fragmentation: usize,
) -> BenchResult<BenchmarkResult>
where
    K: BenchKey,
    V: BenchValue,
    M: OrderedMap<K, V>,
{
    let mut result = BenchmarkResult::new(keys.len());

    let (maps, inserted) = insert_phase::<K, V, M>(keys, case.trials, fragmentation);
    record(case, &mut result, Operation::Insert, &inserted)?;

    let iterated = iterate_phase::<K, V, M>(&maps);
    record(case, &mut result, Operation::Iterate, &iterated)?;

    let found = find_phase::<K, V, M>(&maps, keys);
    record(case, &mut result, Operation::Find, &found)?;

    black_box(iterated.touched + found.touched);
    drop(maps);
    Ok(result)
}

/// Time the union of copies of two operand maps.
///
/// Every trial result is compared against a reference built from the true
/// key union, with operand A's value kept on collision. The first mismatch
/// ends the measurement with [`BenchError::InvariantViolation`].
pub fn measure_merge<K, V, M>(
    case: &TestCase,
    operands: &MergeOperands,
    strategy: UnionStrategy,
) -> BenchResult<PhaseTimings>
where
    K: BenchKey,
    V: BenchValue,
    M: OrderedMap<K, V>,
{
    let a = build_map::<K, V, M>(&operands.a, 0);
    let b = build_map::<K, V, M>(&operands.b, 1);
    let expected = reference_union::<K, V, M>(operands);

    let mut timings = PhaseTimings::with_trials(case.trials);
    for _ in 0..case.trials {
        let mut merged = a.clone();
        let donor = b.clone();
        let start = Instant::now();
        merged.union_with(donor, strategy);
        timings.samples.push(start.elapsed());
        if merged != expected {
            return Err(BenchError::InvariantViolation {
                kind: case.kind,
                size: case.size,
                expected: expected.len(),
                actual: merged.len(),
                difference: first_difference::<K, V, M>(&expected, &merged),
            });
        }
        timings.touched += merged.len() as u64;
    }
    Ok(timings)
}

fn build_map<K, V, M>(raws: &[u64], salt: u64) -> M
where
    K: BenchKey,
    V: BenchValue,
    M: OrderedMap<K, V>,
{
    let mut map = M::default();
    for &raw in raws {
        map.insert_or_update(K::make(raw), V::make(raw, salt));
    }
    map
}

fn reference_union<K, V, M>(operands: &MergeOperands) -> M
where
    K: BenchKey,
    V: BenchValue,
    M: OrderedMap<K, V>,
{
    let mut map = M::default();
    for raw in operands.union() {
        let salt = if operands.a.binary_search(&raw).is_ok() {
            0
        } else {
            1
        };
        map.insert_or_update(K::make(raw), V::make(raw, salt));
    }
    map
}

/// Describe the first entry, in key order, where `actual` departs from
/// `expected`.
fn first_difference<K, V, M>(expected: &M, actual: &M) -> String
where
    K: BenchKey,
    V: BenchValue,
    M: OrderedMap<K, V>,
{
    let mut want = expected.iter();
    let mut got = actual.iter();
    loop {
        match (want.next(), got.next()) {
            (Some(w), Some(g)) if w == g => continue,
            (Some((wk, wv)), Some((gk, gv))) if wk == gk => {
                return format!("key {wk:?} holds {gv:?}, expected {wv:?}")
            }
            (Some((wk, _)), Some((gk, _))) => {
                return format!("found key {gk:?} where {wk:?} was expected")
            }
            (Some((wk, _)), None) => return format!("key {wk:?} is missing"),
            (None, Some((gk, _))) => return format!("unexpected key {gk:?}"),
            (None, None) => return "no differing entry".to_string(),
        }
    }
}

pub(crate) fn record(
    case: &TestCase,
    result: &mut BenchmarkResult,
    op: Operation,
    timings: &PhaseTimings,
) -> BenchResult<()> {
    for (trial, sample) in timings.samples.iter().enumerate() {
        debug!(kind = %case.kind, size = case.size, op = op.name(), trial, ms = millis(*sample));
    }
    let reduced = millis(timings.reduce()?);
    info!(
        kind = %case.kind,
        shape = case.shape.name(),
        size = case.size,
        op = op.name(),
        "{:<12}{:>14.6} ms {}",
        case.kind.label(),
        reduced,
        op.name()
    );
    result.push(op, reduced);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FlatMap, SplitMap};
    use std::collections::BTreeMap;

    fn case(kind: MapKind, size: usize) -> TestCase {
        TestCase::new(KeyShape::Int, kind, size, 5).unwrap()
    }

    #[test]
    fn insert_phase_keeps_one_map_per_trial() {
        let keys = vec![9, 3, 9, 1, 3, 7];
        let (maps, timings) = insert_phase::<u64, u64, SplitMap<u64, u64>>(&keys, 4, 8);
        assert_eq!(maps.len(), 4);
        assert_eq!(timings.samples.len(), 4);
        for map in &maps {
            assert_eq!(OrderedMap::len(map), 4);
        }
    }

    #[test]
    fn iterate_copies_every_entry() {
        let keys: Vec<u64> = (0..50).collect();
        let (maps, _) = insert_phase::<u64, u64, FlatMap<u64, u64>>(&keys, 3, 0);
        let timings = iterate_phase::<u64, u64, FlatMap<u64, u64>>(&maps);
        assert_eq!(timings.samples.len(), 3);
        assert_eq!(timings.touched, 150);
    }

    #[test]
    fn trial_count_below_three_is_rejected() {
        assert!(matches!(
            TestCase::new(KeyShape::Str, MapKind::StdMap, 8, 2),
            Err(BenchError::TooFewTrials { trials: 2 })
        ));
    }

    #[test]
    fn merge_detects_donor_wins_container() {
        // A map whose merge lets the donor overwrite the receiver.
        #[derive(Clone, Default, PartialEq)]
        struct DonorWins(BTreeMap<u64, u64>);

        impl OrderedMap<u64, u64> for DonorWins {
            type Iter<'a>
                = std::collections::btree_map::Iter<'a, u64, u64>
            where
                Self: 'a;

            fn insert_or_update(&mut self, key: u64, value: u64) {
                self.0.insert(key, value);
            }
            fn contains(&self, key: &u64) -> bool {
                self.0.contains_key(key)
            }
            fn len(&self) -> usize {
                self.0.len()
            }
            fn iter(&self) -> Self::Iter<'_> {
                self.0.iter()
            }
            fn merge(&mut self, mut other: Self) {
                self.0.append(&mut other.0);
            }
            fn bulk_insert<I: IntoIterator<Item = (u64, u64)>>(&mut self, items: I) {
                self.0.extend(items);
            }
        }

        let operands = MergeOperands {
            a: vec![1, 2, 3],
            b: vec![2, 4],
        };
        let err = measure_merge::<u64, u64, DonorWins>(
            &case(MapKind::StdMap, 3),
            &operands,
            UnionStrategy::Merge,
        )
        .unwrap_err();
        match &err {
            BenchError::InvariantViolation {
                expected: 4,
                actual: 4,
                difference,
                ..
            } => assert_eq!(difference, "key 2 holds 5, expected 4"),
            other => panic!("expected invariant violation, got {other}"),
        }
        assert!(err.to_string().contains("key 2 holds 5, expected 4"));
    }

    #[test]
    fn first_difference_names_missing_and_extra_keys() {
        let expected: BTreeMap<u64, u64> = [(1, 2), (3, 6)].into_iter().collect();
        let short: BTreeMap<u64, u64> = [(1, 2)].into_iter().collect();
        let shifted: BTreeMap<u64, u64> = [(1, 2), (4, 8)].into_iter().collect();
        assert_eq!(
            first_difference::<u64, u64, _>(&expected, &short),
            "key 3 is missing"
        );
        assert_eq!(
            first_difference::<u64, u64, _>(&short, &expected),
            "unexpected key 3"
        );
        assert_eq!(
            first_difference::<u64, u64, _>(&expected, &shifted),
            "found key 4 where 3 was expected"
        );
    }

    #[test]
    fn merge_reports_one_sample_per_trial() {
        let operands = MergeOperands {
            a: vec![0, 2, 4, 6],
            b: vec![1, 2, 3],
        };
        let timings = measure_merge::<String, String, BTreeMap<String, String>>(
            &case(MapKind::StdMap, 4),
            &operands,
            UnionStrategy::BulkInsert,
        )
        .unwrap();
        assert_eq!(timings.samples.len(), 5);
        assert_eq!(timings.touched, 5 * 6);
    }
}
