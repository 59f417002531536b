//! Timing harness for ordered associative containers.
//!
//! Containers are driven through the [`OrderedMap`] capability trait and
//! measured for insert, iterate, find and merge. Inserts run against a heap
//! that is deliberately fragmented with same-size-class scratch maps, and
//! each operation's trial set is reduced to a trimmed mean before being
//! written out per container kind.

mod adapter;
mod config;
mod driver;
mod flat_map;
mod fragment;
mod runner;
mod sink;
mod split_map;
mod stats;
mod workload;

pub use adapter::{MapKind, MapVisitor, OrderedMap, UnionStrategy};
pub use config::{BenchConfig, KeyShape, Suite};
pub use driver::{run_case, run_matrix, CaseInputs, MatrixRecord};
pub use flat_map::FlatMap;
pub use fragment::Fragmenter;
pub use runner::{
    find_phase, insert_phase, iterate_phase, measure_access, measure_merge, Operation,
    PhaseTimings, TestCase,
};
pub use sink::{BenchmarkResult, ResultSink, ResultStream};
pub use split_map::SplitMap;
pub use stats::{millis, trimmed_mean, MIN_TRIALS};
pub use workload::{BenchKey, BenchValue, MergeOperands, Workload};

use std::path::PathBuf;

/// Errors that stop a benchmark run. None of them are recovered locally.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("trial count {trials} is below the minimum of {min}", min = MIN_TRIALS)]
    TooFewTrials { trials: usize },
    #[error("size exponent range {min}..={max} is empty")]
    EmptySizeRange { min: u32, max: u32 },
    #[error("size exponent {max} is too large; sizes must stay below 2^{limit}")]
    SizeTooLarge { max: u32, limit: u32 },
    #[error("container kind {0} is listed more than once")]
    DuplicateKind(MapKind),
    #[error("no result stream is open for container kind {0}")]
    MissingStream(MapKind),
    #[error("unknown container kind: {0}")]
    UnknownKind(String),
    #[error("unknown key shape: {0}")]
    UnknownShape(String),
    #[error(
        "{kind} union of size {size} does not match the reference: {difference} \
         (expected {expected} entries, got {actual})"
    )]
    InvariantViolation {
        kind: MapKind,
        size: usize,
        expected: usize,
        actual: usize,
        /// First entry where the union and the reference disagree.
        difference: String,
    },
    #[error("cannot open output {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BenchError {
    /// True for errors that must be reported before any measurement starts.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BenchError::TooFewTrials { .. }
                | BenchError::EmptySizeRange { .. }
                | BenchError::SizeTooLarge { .. }
                | BenchError::DuplicateKind(_)
                | BenchError::MissingStream(_)
                | BenchError::UnknownKind(_)
                | BenchError::UnknownShape(_)
        )
    }
}

pub type BenchResult<T> = Result<T, BenchError>;
