//! Worker execution strategies.
//!
//! A trial distributes its items across N workers. How those workers are
//! isolated is a real performance decision, not a runtime default, so it is
//! an explicit parameter on the harness:
//!
//! - [`ExecStrategy::Threads`] — one OS thread per worker inside this
//!   process. Suited to I/O-bound workloads; workers share the item
//!   collection read-only.
//! - [`ExecStrategy::Processes`] — one child process per worker, each a
//!   re-invocation of the current executable in worker mode. Suited to
//!   CPU-bound workloads that should not contend inside one process.
//!
//! Both strategies honor the same contract: items are split into contiguous
//! per-worker chunks and results are reassembled in chunk order, so the
//! output sequence always matches the input sequence regardless of which
//! worker finished first. The pool is scoped to a single trial; on the
//! success path every worker has reported (and threads are joined) before
//! the trial's clock is stopped.

mod processes;
mod threads;

pub use processes::serve as serve_worker;

use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::error::{BenchError, Result};
use crate::workloads::Workload;

/// How trial workers are isolated from one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStrategy {
    /// Worker threads inside this process (shared-memory, I/O-bound work).
    Threads,
    /// Worker child processes (isolated memory, CPU-bound work).
    Processes,
}

impl ExecStrategy {
    /// Stable lowercase name, as accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Threads => "threads",
            Self::Processes => "processes",
        }
    }
}

impl fmt::Display for ExecStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "threads" => Ok(Self::Threads),
            "processes" => Ok(Self::Processes),
            other => Err(format!(
                "unknown strategy '{other}' (expected 'threads' or 'processes')"
            )),
        }
    }
}

/// Run `workload` over every item with `workers` workers under the given
/// strategy, returning results in input order.
pub(crate) fn execute(
    strategy: ExecStrategy,
    workload: &'static dyn Workload,
    items: &Arc<Vec<String>>,
    workers: usize,
    timeout: Duration,
) -> Result<Vec<Value>> {
    match strategy {
        ExecStrategy::Threads => threads::execute(workload, items, workers, timeout),
        ExecStrategy::Processes => processes::execute(workload, items, workers, timeout),
    }
}

/// Split `len` items into `workers` contiguous chunks of near-equal size.
///
/// The first `len % workers` chunks carry one extra item; when `workers`
/// exceeds `len` the trailing chunks are empty and those workers simply
/// idle.
pub(crate) fn chunk_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    let base = len / workers;
    let extra = len % workers;
    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for worker in 0..workers {
        let size = base + usize::from(worker < extra);
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

/// Collect one chunk result per worker, reassembled in chunk order.
///
/// Enforces the per-trial deadline: if the pool has not fully reported
/// before `timeout` elapses the trial is aborted with
/// [`BenchError::TrialTimeout`]. A worker that disappears without reporting
/// (thread panic, killed child) surfaces as [`BenchError::WorkerLost`]; a
/// reported item failure is propagated as-is.
pub(crate) fn collect_ordered(
    rx: &Receiver<(usize, Result<Vec<Value>>)>,
    workers: usize,
    timeout: Duration,
) -> Result<Vec<Value>> {
    let deadline = Instant::now() + timeout;
    let mut chunks: Vec<Option<Vec<Value>>> = vec![None; workers];

    for _ in 0..workers {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((worker, Ok(values))) => chunks[worker] = Some(values),
            Ok((_, Err(e))) => return Err(e),
            Err(RecvTimeoutError::Timeout) => {
                return Err(BenchError::TrialTimeout { workers, timeout })
            }
            Err(RecvTimeoutError::Disconnected) => {
                let worker = chunks.iter().position(Option::is_none).unwrap_or(0);
                return Err(BenchError::WorkerLost { worker });
            }
        }
    }

    Ok(chunks.into_iter().flat_map(Option::unwrap_or_default).collect())
}
