use tracing::{info, info_span};

use crate::adapter::MapVisitor;
use crate::runner::record;
use crate::{
    measure_access, measure_merge, BenchConfig, BenchKey, BenchResult, BenchValue,
    BenchmarkResult, KeyShape, MapKind, MergeOperands, Operation, OrderedMap, ResultSink,
    TestCase, UnionStrategy, Workload,
};

/// One written record of the matrix.
#[derive(Clone, Debug)]
pub struct MatrixRecord {
    pub shape: KeyShape,
    pub kind: MapKind,
    pub result: BenchmarkResult,
}

/// Inputs shared by every kind measured at one size.
pub struct CaseInputs<'a> {
    /// Workload for insert, iterate and find; `None` skips them.
    pub keys: Option<&'a [u64]>,
    /// Operands for the merge suite; `None` skips it.
    pub operands: Option<&'a MergeOperands>,
    pub fragmentation: usize,
    pub union: UnionStrategy,
}

struct CaseVisitor<'a> {
    case: &'a TestCase,
    inputs: &'a CaseInputs<'a>,
}

impl<K: BenchKey, V: BenchValue> MapVisitor<K, V> for CaseVisitor<'_> {
    type Output = BenchResult<BenchmarkResult>;

    fn visit<M: OrderedMap<K, V>>(self, _kind: MapKind) -> Self::Output {
        let case = self.case;
        let mut result = match self.inputs.keys {
            Some(keys) => measure_access::<K, V, M>(case, keys, self.inputs.fragmentation)?,
            None => BenchmarkResult::new(case.size),
        };
        if let Some(operands) = self.inputs.operands {
            let timings = measure_merge::<K, V, M>(case, operands, self.inputs.union)?;
            record(case, &mut result, Operation::Merge, &timings)?;
        }
        Ok(result)
    }
}

/// Measure one test case against the concrete map its kind selects.
pub fn run_case<K: BenchKey, V: BenchValue>(
    case: &TestCase,
    inputs: &CaseInputs<'_>,
) -> BenchResult<BenchmarkResult> {
    case.kind.dispatch::<K, V, _>(CaseVisitor { case, inputs })
}

/// Walk the configured matrix, writing every record to `sink`.
///
/// Every configured kind must already have a stream in `sink`. The first
/// error stops the run; records written so far stay in the sink.
pub fn run_matrix(config: &BenchConfig, sink: &mut ResultSink) -> BenchResult<Vec<MatrixRecord>> {
    config.validate()?;
    sink.ensure_kinds(&config.kinds)?;
    let mut workload = Workload::new(config.seed);
    let mut records = Vec::new();
    for &shape in &config.shapes {
        sink.begin_section(shape)?;
        match shape {
            KeyShape::Int => {
                run_shape::<u64, u64>(config, shape, &mut workload, sink, &mut records)?
            }
            KeyShape::Str => {
                run_shape::<String, String>(config, shape, &mut workload, sink, &mut records)?
            }
        }
        sink.end_section()?;
    }
    Ok(records)
}

fn run_shape<K: BenchKey, V: BenchValue>(
    config: &BenchConfig,
    shape: KeyShape,
    workload: &mut Workload,
    sink: &mut ResultSink,
    records: &mut Vec<MatrixRecord>,
) -> BenchResult<()> {
    for size in config.sizes() {
        let _span = info_span!("case", shape = shape.name(), size).entered();
        info!("<{}, {}>, {} elements", K::TAG, V::TAG, size);

        let keys = config.suite.runs_access().then(|| workload.keys(size));
        let operands = config
            .suite
            .runs_merge()
            .then(|| workload.merge_operands(size));
        let inputs = CaseInputs {
            keys: keys.as_deref(),
            operands: operands.as_ref(),
            fragmentation: config.fragmentation,
            union: config.union,
        };

        for &kind in &config.kinds {
            let case = TestCase::new(shape, kind, size, config.trials)?;
            let result = run_case::<K, V>(&case, &inputs)?;
            sink.record(kind, &result)?;
            records.push(MatrixRecord {
                shape,
                kind,
                result,
            });
        }
    }
    Ok(())
}
