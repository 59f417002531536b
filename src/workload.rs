//! Randomized key sequences for the timed phases.

use core::fmt::Debug;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Upper bound (exclusive) for raw keys of the single-sequence workload.
pub const RAW_KEY_LIMIT: u64 = 1 << 31;

/// Key types the harness can render from a raw integer.
pub trait BenchKey: Ord + Clone + Debug {
    /// Short tag used in log output.
    const TAG: &'static str;

    fn make(raw: u64) -> Self;
}

/// Value types the harness can render from a raw integer.
///
/// `salt` distinguishes values written for the same key by different
/// operands, so a union can be checked for which side won.
pub trait BenchValue: Clone + PartialEq + Debug {
    const TAG: &'static str;

    fn make(raw: u64, salt: u64) -> Self;
}

impl BenchKey for u64 {
    const TAG: &'static str = "u64";

    #[inline]
    fn make(raw: u64) -> Self {
        raw
    }
}

impl BenchKey for String {
    const TAG: &'static str = "String";

    #[inline]
    fn make(raw: u64) -> Self {
        raw.to_string()
    }
}

impl BenchValue for u64 {
    const TAG: &'static str = "u64";

    #[inline]
    fn make(raw: u64, salt: u64) -> Self {
        raw.wrapping_mul(2).wrapping_add(salt)
    }
}

impl BenchValue for String {
    const TAG: &'static str = "String";

    #[inline]
    fn make(raw: u64, salt: u64) -> Self {
        format!("{raw}.{salt}")
    }
}

/// Source of raw key sequences.
pub struct Workload {
    rng: SmallRng,
}

/// Two sorted, duplicate-free operands drawn from `[0, 2N)`.
#[derive(Clone, Debug)]
pub struct MergeOperands {
    pub a: Vec<u64>,
    pub b: Vec<u64>,
}

impl Workload {
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::from_entropy(),
        }
    }

    /// `n` raw keys, uniform over `[0, RAW_KEY_LIMIT)`. Duplicates are kept.
    pub fn keys(&mut self, n: usize) -> Vec<u64> {
        (0..n).map(|_| self.rng.gen_range(0..RAW_KEY_LIMIT)).collect()
    }

    /// Two independent operands of target size `n`. Roughly half of each
    /// draw collides with the other side.
    pub fn merge_operands(&mut self, n: usize) -> MergeOperands {
        MergeOperands {
            a: self.sorted_unique(n),
            b: self.sorted_unique(n),
        }
    }

    fn sorted_unique(&mut self, n: usize) -> Vec<u64> {
        let upper = (n as u64).saturating_mul(2).max(1);
        let mut v: Vec<u64> = (0..n).map(|_| self.rng.gen_range(0..upper)).collect();
        v.sort_unstable();
        v.dedup();
        v
    }
}

impl MergeOperands {
    /// Sorted union of both operands.
    pub fn union(&self) -> Vec<u64> {
        let mut out = Vec::with_capacity(self.a.len() + self.b.len());
        let (mut i, mut j) = (0, 0);
        while i < self.a.len() && j < self.b.len() {
            let (x, y) = (self.a[i], self.b[j]);
            if x <= y {
                out.push(x);
                i += 1;
                if x == y {
                    j += 1;
                }
            } else {
                out.push(y);
                j += 1;
            }
        }
        out.extend_from_slice(&self.a[i..]);
        out.extend_from_slice(&self.b[j..]);
        out
    }
}
