//! Error types for the benchmark harness.
//!
//! Every failure mode is fatal for the enclosing trial (or the whole run):
//! benchmark correctness requires that a failed trial's timing never appears
//! in a report, so there is no retry or partial-failure recovery anywhere.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BenchError>;

/// Benchmark error taxonomy.
#[derive(Error, Debug)]
pub enum BenchError {
    // =========================================================================
    // Input / output errors
    // =========================================================================
    /// Input file missing or unreadable.
    #[error("failed to read input file {path}: {source}")]
    Input {
        /// Path that failed to open or read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Input file readable but not the expected JSON shape.
    #[error("malformed input in {path}: {source}")]
    MalformedInput {
        /// Path of the malformed file.
        path: PathBuf,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Result file could not be written.
    #[error("failed to write output file {path}: {source}")]
    Output {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Trial errors
    // =========================================================================
    /// A workload failed on one item; the trial is aborted.
    #[error("work item {index} failed: {message}")]
    Item {
        /// Zero-based index of the failing item in the input collection.
        index: usize,
        /// Workload-reported failure message.
        message: String,
    },

    /// A worker thread panicked or disappeared before reporting.
    #[error("worker {worker} terminated without reporting a result")]
    WorkerLost {
        /// Zero-based worker index.
        worker: usize,
    },

    /// A trial ran past the safety-net deadline.
    #[error("trial with {workers} workers exceeded the {timeout:?} timeout")]
    TrialTimeout {
        /// Worker count of the timed-out trial.
        workers: usize,
        /// Configured per-trial timeout.
        timeout: Duration,
    },

    // =========================================================================
    // Process-strategy errors
    // =========================================================================
    /// A worker process could not be launched.
    #[error("failed to spawn worker process: {0}")]
    Spawn(#[source] std::io::Error),

    /// A worker process exited abnormally or broke the wire protocol.
    #[error("worker process failed: {0}")]
    WorkerProcess(String),

    /// Process-mode dispatch received a name with no registered workload.
    #[error("unknown workload '{0}'")]
    UnknownWorkload(String),

    // =========================================================================
    // Workload errors
    // =========================================================================
    /// A workload rejected an item.
    #[error("{0}")]
    Workload(String),
}

impl BenchError {
    /// Build a workload-level failure from any displayable cause.
    pub fn workload(message: impl Into<String>) -> Self {
        Self::Workload(message.into())
    }
}
