//! Sweep reports and timing statistics.
//!
//! A [`RunReport`] is an explicit value built and returned by a sweep,
//! never accumulated through ambient mutable state. It records one timing
//! entry per configuration, in sweep order, and keeps only the final
//! configuration's result sequence: the sweep's purpose is timing, not
//! data production, and the persisted output file reflects that.

use std::time::Duration;

use serde_json::Value;

/// Timing of one trial within a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialTiming {
    /// Worker count of the trial.
    pub workers: usize,
    /// Elapsed wall-clock time.
    pub elapsed: Duration,
}

/// Collected timings across a worker-count sweep.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Name of the benchmarked workload.
    pub workload: String,
    /// One entry per configuration, in sweep order.
    pub entries: Vec<TrialTiming>,
    /// Per-item results of the last configuration only.
    pub last_results: Option<Vec<Value>>,
}

impl RunReport {
    /// Format the per-configuration timing lines, one per entry, with
    /// two-decimal seconds.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!(
                "Time of {} workers: {:.2} secs\n",
                entry.workers,
                entry.elapsed.as_secs_f64()
            ));
        }
        out
    }
}

/// Median of a set of durations.
///
/// For an even count the median is the midpoint of the two middle samples.
/// An empty slice yields zero; callers always record at least one sample.
pub fn median(durations: &[Duration]) -> Duration {
    if durations.is_empty() {
        return Duration::ZERO;
    }

    let mut sorted = durations.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|&v| Duration::from_millis(v)).collect()
    }

    #[test]
    fn test_median_single_sample() {
        assert_eq!(median(&ms(&[42])), Duration::from_millis(42));
    }

    #[test]
    fn test_median_odd_count() {
        assert_eq!(median(&ms(&[30, 10, 20])), Duration::from_millis(20));
    }

    #[test]
    fn test_median_even_count_is_midpoint() {
        assert_eq!(median(&ms(&[10, 20, 30, 40])), Duration::from_millis(25));
    }

    #[test]
    fn test_median_robust_to_outlier() {
        assert_eq!(
            median(&ms(&[10, 11, 12, 11, 5000])),
            Duration::from_millis(11)
        );
    }

    #[test]
    fn test_median_empty_is_zero() {
        assert_eq!(median(&[]), Duration::ZERO);
    }

    #[test]
    fn test_summary_two_decimal_seconds() {
        let report = RunReport {
            workload: "tag-count".to_string(),
            entries: vec![
                TrialTiming {
                    workers: 6,
                    elapsed: Duration::from_millis(1234),
                },
                TrialTiming {
                    workers: 1,
                    elapsed: Duration::from_millis(3456),
                },
            ],
            last_results: None,
        };

        let summary = report.summary();
        assert!(summary.contains("Time of 6 workers: 1.23 secs"));
        assert!(summary.contains("Time of 1 workers: 3.46 secs"));
    }

    #[test]
    fn test_summary_empty_report() {
        let report = RunReport {
            workload: "line-scan".to_string(),
            entries: Vec::new(),
            last_results: None,
        };
        assert!(report.summary().is_empty());
    }
}
