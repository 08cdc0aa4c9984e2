//! The four benchmark scenarios.
//!
//! Each scenario loads its input once, runs its trials, and prints timing
//! lines on stdout; the HTML sweeps additionally persist the final
//! configuration's per-item results. Logging goes to stderr via `tracing`,
//! so stdout carries nothing but benchmark output.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::harness::{repeat_and_summarize, Harness};
use crate::input;
use crate::report::RunReport;
use crate::workloads::{Workload, LINE_SCAN};

/// Compare sequential and multi-worker line scanning over a text file.
///
/// Both variants are repeated `runs` times and summarized with the median,
/// mirroring the classic threaded-vs-unthreaded file read comparison.
pub fn run_read(harness: &Harness, input_path: &Path, runs: usize, workers: usize) -> Result<()> {
    let items = Arc::new(input::load_lines(input_path)?);
    let runs = runs.max(1);
    info!(
        runs,
        workers,
        strategy = %harness.strategy(),
        "starting read comparison"
    );

    let unthreaded = repeat_and_summarize(
        || harness.run_single(&LINE_SCAN, &items).map(|t| t.elapsed),
        runs,
    )?;
    let threaded = repeat_and_summarize(
        || {
            harness
                .run_concurrent(&LINE_SCAN, &items, workers)
                .map(|t| t.elapsed)
        },
        runs,
    )?;

    println!(
        "Median time of unthreaded read (runs {}): {:.2}",
        runs,
        unthreaded.as_secs_f64()
    );
    println!(
        "Median time of threaded read (runs {}): {:.2}",
        runs,
        threaded.as_secs_f64()
    );
    Ok(())
}

/// Sweep an HTML workload over worker counts and persist the last
/// configuration's results.
///
/// Prints one timing line per configuration. Only the final
/// configuration's result sequence is written to `output_path`; the sweep
/// exists to produce timings, the output file is a byproduct.
pub fn run_sweep(
    harness: &Harness,
    workload: &'static dyn Workload,
    input_path: &Path,
    output_path: Option<&Path>,
    worker_counts: &[usize],
) -> Result<RunReport> {
    let items = Arc::new(input::load_documents(input_path)?);
    info!(
        workload = workload.name(),
        documents = items.len(),
        strategy = %harness.strategy(),
        ?worker_counts,
        "starting sweep"
    );

    let report = harness.sweep(workload, &items, worker_counts)?;
    print!("{}", report.summary());

    if let (Some(path), Some(results)) = (output_path, report.last_results.as_deref()) {
        input::write_results(path, results)?;
    }

    Ok(report)
}
