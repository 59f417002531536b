use std::path::PathBuf;
use std::str::FromStr;

use crate::{BenchError, BenchResult, MapKind, UnionStrategy, MIN_TRIALS};

/// Key/value type pair of one matrix section.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyShape {
    /// `u64` keys and values.
    Int,
    /// Decimal `String` keys and values.
    Str,
}

impl KeyShape {
    pub const ALL: [KeyShape; 2] = [KeyShape::Int, KeyShape::Str];

    pub fn name(self) -> &'static str {
        match self {
            KeyShape::Int => "int",
            KeyShape::Str => "string",
        }
    }

    /// Name of the top-level sequence this shape's records are written to.
    pub fn section(self) -> &'static str {
        match self {
            KeyShape::Int => "int_timings",
            KeyShape::Str => "string_timings",
        }
    }
}

impl FromStr for KeyShape {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(KeyShape::Int),
            "string" | "str" => Ok(KeyShape::Str),
            other => Err(BenchError::UnknownShape(other.to_string())),
        }
    }
}

/// Which operations a run measures.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Suite {
    /// insert, iterate and find.
    Access,
    Merge,
    #[default]
    All,
}

impl Suite {
    pub fn runs_access(self) -> bool {
        matches!(self, Suite::Access | Suite::All)
    }

    pub fn runs_merge(self) -> bool {
        matches!(self, Suite::Merge | Suite::All)
    }
}

impl FromStr for Suite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(Suite::Access),
            "merge" => Ok(Suite::Merge),
            "all" => Ok(Suite::All),
            other => Err(format!("unknown suite: {other}")),
        }
    }
}

/// Settings for one benchmark run. `Default` is the fixed matrix:
/// sizes `8 << 0` through `8 << 15`, 7 trials, fragmentation factor 64.
#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub trials: usize,
    pub fragmentation: usize,
    pub min_exp: u32,
    pub max_exp: u32,
    pub kinds: Vec<MapKind>,
    pub shapes: Vec<KeyShape>,
    pub suite: Suite,
    pub union: UnionStrategy,
    pub output_dir: PathBuf,
    pub seed: Option<u64>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            trials: 7,
            fragmentation: 64,
            min_exp: 0,
            max_exp: 15,
            kinds: MapKind::ALL.to_vec(),
            shapes: KeyShape::ALL.to_vec(),
            suite: Suite::All,
            union: UnionStrategy::Merge,
            output_dir: PathBuf::from("."),
            seed: None,
        }
    }
}

impl BenchConfig {
    pub const BASE_SIZE: usize = 8;

    /// Reject settings that would make any measurement meaningless.
    pub fn validate(&self) -> BenchResult<()> {
        if self.trials < MIN_TRIALS {
            return Err(BenchError::TooFewTrials {
                trials: self.trials,
            });
        }
        if self.min_exp > self.max_exp {
            return Err(BenchError::EmptySizeRange {
                min: self.min_exp,
                max: self.max_exp,
            });
        }
        // BASE_SIZE << max_exp must leave the top bit clear.
        if self.max_exp >= usize::BITS - 4 {
            return Err(BenchError::SizeTooLarge {
                max: self.max_exp,
                limit: usize::BITS - 1,
            });
        }
        for (i, kind) in self.kinds.iter().enumerate() {
            if self.kinds[..i].contains(kind) {
                return Err(BenchError::DuplicateKind(*kind));
            }
        }
        Ok(())
    }

    pub fn sizes(&self) -> impl Iterator<Item = usize> {
        (self.min_exp..=self.max_exp).map(|exp| Self::BASE_SIZE << exp)
    }
}
