use std::time::Duration;

use crate::{BenchError, BenchResult};

/// Smallest trial set the trimmed mean is defined for.
pub const MIN_TRIALS: usize = 3;

/// Mean of `samples` after dropping the single smallest and largest value.
///
/// Sample order does not matter. Fewer than [`MIN_TRIALS`] samples is an
/// error.
pub fn trimmed_mean(samples: &[Duration]) -> BenchResult<Duration> {
    if samples.len() < MIN_TRIALS {
        return Err(BenchError::TooFewTrials {
            trials: samples.len(),
        });
    }
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();
    let kept = &sorted[1..sorted.len() - 1];
    let total: Duration = kept.iter().sum();
    Ok(total / kept.len() as u32)
}

/// Milliseconds as a float, the unit of every written result.
#[inline]
pub fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: &[u64]) -> Vec<Duration> {
        v.iter().map(|&x| Duration::from_millis(x)).collect()
    }

    #[test]
    fn drops_one_min_and_one_max() {
        let got = trimmed_mean(&ms(&[5, 1, 9, 3, 7])).unwrap();
        assert_eq!(got, Duration::from_millis(5));
    }

    #[test]
    fn single_outlier_is_ignored() {
        let got = trimmed_mean(&ms(&[10, 10, 10, 10, 10, 10, 900])).unwrap();
        assert_eq!(got, Duration::from_millis(10));
    }

    #[test]
    fn only_one_copy_of_a_repeated_extreme_is_dropped() {
        // Sorted: [1, 1, 4, 9, 9] -> mean(1, 4, 9)
        let got = trimmed_mean(&ms(&[9, 1, 4, 1, 9])).unwrap();
        assert_eq!(got, Duration::from_nanos(4_666_666));
    }

    #[test]
    fn three_samples_return_the_median() {
        assert_eq!(
            trimmed_mean(&ms(&[30, 10, 20])).unwrap(),
            Duration::from_millis(20)
        );
    }

    #[test]
    fn fewer_than_three_samples_is_an_error() {
        for n in 0..MIN_TRIALS {
            let samples = vec![Duration::from_millis(1); n];
            assert!(matches!(
                trimmed_mean(&samples),
                Err(BenchError::TooFewTrials { trials }) if trials == n
            ));
        }
    }

    #[test]
    fn millis_converts_fractional_durations() {
        assert!((millis(Duration::from_micros(1500)) - 1.5).abs() < 1e-9);
    }
}
