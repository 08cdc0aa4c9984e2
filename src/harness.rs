//! The benchmark harness.
//!
//! Runs a [`Workload`] over a read-only collection of work items under
//! varying worker-count configurations and records elapsed wall-clock time
//! per configuration. The harness only reports; it never picks a winner.
//!
//! Timing starts immediately before dispatch and stops after the last
//! result is collected and the pool is torn down, so worker creation and
//! teardown overhead is part of every measurement on purpose.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use wikibench::{ExecStrategy, Harness};
//! use wikibench::workloads::WORD_COUNT;
//!
//! # fn main() -> wikibench::Result<()> {
//! let harness = Harness::new(ExecStrategy::Threads);
//! let items = Arc::new(vec!["<p>hello parallel world</p>".to_string()]);
//!
//! let trial = harness.run_concurrent(&WORD_COUNT, &items, 2)?;
//! assert_eq!(trial.results.len(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{BenchError, Result};
use crate::report::{median, RunReport, TrialTiming};
use crate::strategy::{self, ExecStrategy};
use crate::workloads::Workload;

/// Default safety-net deadline per trial.
const DEFAULT_TRIAL_TIMEOUT: Duration = Duration::from_secs(300);

/// One timed execution of a workload across all items at a fixed
/// worker count.
#[derive(Debug, Clone)]
pub struct Trial {
    /// Worker count this trial ran with.
    pub workers: usize,
    /// Elapsed wall-clock time, dispatch through teardown.
    pub elapsed: Duration,
    /// Per-item results, in input order.
    pub results: Vec<Value>,
}

/// Benchmark harness: an execution strategy plus trial policy.
#[derive(Debug, Clone)]
pub struct Harness {
    strategy: ExecStrategy,
    trial_timeout: Duration,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(ExecStrategy::Threads)
    }
}

impl Harness {
    /// Create a harness with the given worker-isolation strategy.
    pub fn new(strategy: ExecStrategy) -> Self {
        Self {
            strategy,
            trial_timeout: DEFAULT_TRIAL_TIMEOUT,
        }
    }

    /// Set the per-trial safety-net timeout.
    ///
    /// Benchmarks run to completion by design; the deadline only guards
    /// against an accidental infinite loop in a workload.
    pub fn with_trial_timeout(mut self, timeout: Duration) -> Self {
        self.trial_timeout = timeout;
        self
    }

    /// The configured worker-isolation strategy.
    pub fn strategy(&self) -> ExecStrategy {
        self.strategy
    }

    /// Execute the workload on every item sequentially, on the caller's
    /// own thread.
    ///
    /// This is the no-pool baseline: a worker-count-1 concurrent trial
    /// should be comparable to it plus fixed worker-creation overhead. A
    /// failure on any item aborts the trial.
    #[instrument(skip(self, workload, items), fields(workload = workload.name(), items = items.len()))]
    pub fn run_single(&self, workload: &'static dyn Workload, items: &[String]) -> Result<Trial> {
        let start = Instant::now();

        let results = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                workload.run(item).map_err(|e| BenchError::Item {
                    index,
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<Value>>>()?;

        let elapsed = start.elapsed();
        debug!(?elapsed, "sequential trial finished");
        Ok(Trial {
            workers: 1,
            elapsed,
            results,
        })
    }

    /// Execute the workload over all items with `workers` workers.
    ///
    /// Items are distributed across the pool under the configured strategy
    /// and results come back in input order. A worker count of 0 is
    /// clamped to 1; a count above the item count leaves the excess
    /// workers idle. Any item failure, worker loss, or deadline overrun
    /// aborts the trial.
    #[instrument(skip(self, workload, items), fields(workload = workload.name(), items = items.len()))]
    pub fn run_concurrent(
        &self,
        workload: &'static dyn Workload,
        items: &Arc<Vec<String>>,
        workers: usize,
    ) -> Result<Trial> {
        let workers = workers.max(1);

        let start = Instant::now();
        let results = strategy::execute(
            self.strategy,
            workload,
            items,
            workers,
            self.trial_timeout,
        )?;
        let elapsed = start.elapsed();

        debug!(?elapsed, workers, "concurrent trial finished");
        Ok(Trial {
            workers,
            elapsed,
            results,
        })
    }

    /// Run one concurrent trial per configuration, in the given order.
    ///
    /// The report records one duration per configuration and keeps only
    /// the final configuration's result sequence. The sweep halts at the
    /// first failed trial; nothing from that trial is recorded.
    pub fn sweep(
        &self,
        workload: &'static dyn Workload,
        items: &Arc<Vec<String>>,
        worker_counts: &[usize],
    ) -> Result<RunReport> {
        let mut entries = Vec::with_capacity(worker_counts.len());
        let mut last_results = None;

        for &workers in worker_counts {
            let trial = self.run_concurrent(workload, items, workers)?;
            entries.push(TrialTiming {
                workers: trial.workers,
                elapsed: trial.elapsed,
            });
            last_results = Some(trial.results);
        }

        Ok(RunReport {
            workload: workload.name().to_string(),
            entries,
            last_results,
        })
    }
}

/// Repeat a timed operation and summarize with the median.
///
/// The operation reports its own elapsed duration; `repetitions` is
/// clamped to a minimum of 1, and with a single repetition the median is
/// that one duration. The median is used instead of the mean because it is
/// robust to scheduler-noise outliers.
pub fn repeat_and_summarize<F>(mut op: F, repetitions: usize) -> Result<Duration>
where
    F: FnMut() -> Result<Duration>,
{
    let repetitions = repetitions.max(1);
    let mut durations = Vec::with_capacity(repetitions);
    for _ in 0..repetitions {
        durations.push(op()?);
    }
    Ok(median(&durations))
}
