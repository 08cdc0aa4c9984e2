//! Thread-pool execution.
//!
//! One OS thread per worker, each given a contiguous chunk of the shared
//! item collection. The collection is shared read-only through an `Arc`;
//! no worker mutates it, so no locks are involved.

use std::ops::Range;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{BenchError, Result};
use crate::strategy::{chunk_ranges, collect_ordered};
use crate::workloads::Workload;

pub(crate) fn execute(
    workload: &'static dyn Workload,
    items: &Arc<Vec<String>>,
    workers: usize,
    timeout: Duration,
) -> Result<Vec<Value>> {
    let ranges = chunk_ranges(items.len(), workers);
    let (tx, rx) = mpsc::channel();
    let mut handles = Vec::with_capacity(workers);

    debug!(workers, items = items.len(), "spawning worker threads");
    for (worker, range) in ranges.into_iter().enumerate() {
        let tx = tx.clone();
        let items = Arc::clone(items);
        handles.push(thread::spawn(move || {
            let result = run_range(workload, &items, range);
            // Receiver may already be gone if another worker failed first.
            let _ = tx.send((worker, result));
        }));
    }
    drop(tx);

    let results = collect_ordered(&rx, workers, timeout)?;

    // Every worker has reported, so the joins are immediate; the pool is
    // fully torn down before the trial's clock stops.
    for handle in handles {
        let _ = handle.join();
    }

    Ok(results)
}

fn run_range(
    workload: &'static dyn Workload,
    items: &[String],
    range: Range<usize>,
) -> Result<Vec<Value>> {
    range
        .map(|index| {
            workload.run(&items[index]).map_err(|e| BenchError::Item {
                index,
                message: e.to_string(),
            })
        })
        .collect()
}
