//! wikibench - Repeatable Throughput Micro-Benchmarks
//!
//! This crate provides a small benchmark harness that runs a pure unit of
//! work over a fixed, read-only collection of work items under varying
//! worker-count configurations, records elapsed wall-clock time per
//! configuration, and reports a central-tendency statistic.
//!
//! # Features
//!
//! - **Benchmark Harness**: sequential baseline, concurrent trials, and
//!   worker-count sweeps with ordered results
//! - **Execution Strategies**: worker threads for I/O-bound workloads,
//!   worker processes for CPU-bound workloads, selected explicitly
//! - **Built-in Workloads**: line scanning, HTML content-region
//!   extraction, tag-name counting, long-word counting
//! - **Reports**: per-configuration timings, median summaries, optional
//!   JSON persistence of the final configuration's per-item results
//! - **Error Handling**: propagate-and-halt policy so a failed trial's
//!   timing never reaches a report
//!
//! # Architecture
//!
//! ```text
//! input file ──▶ Vec<String> (read-only, loaded once)
//!                    │
//!                    ▼
//!              ┌──────────┐    per configuration    ┌──────────────┐
//!              │ Harness  │────────────────────────▶│ worker pool  │
//!              │  sweep   │   threads | processes   │ (per trial)  │
//!              └────┬─────┘                         └──────┬───────┘
//!                   │              ordered results         │
//!                   ◀──────────────────────────────────────┘
//!                   ▼
//!             ┌──────────────┐
//!             │  RunReport   │──▶ timing lines + last results file
//!             └──────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use wikibench::{ExecStrategy, Harness};
//! use wikibench::workloads::TAG_COUNT;
//!
//! # fn main() -> wikibench::Result<()> {
//! let harness = Harness::new(ExecStrategy::Threads);
//! let documents = Arc::new(vec![
//!     "<div id=\"content\"><p>first page</p></div>".to_string(),
//!     "<div id=\"content\"><p>second page</p></div>".to_string(),
//! ]);
//!
//! let report = harness.sweep(&TAG_COUNT, &documents, &[1, 2])?;
//! assert_eq!(report.entries.len(), 2);
//! print!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod harness;
pub mod input;
pub mod report;
pub mod scenarios;
pub mod strategy;
pub mod workloads;

// Re-exports for convenience
pub use error::{BenchError, Result};
pub use harness::{repeat_and_summarize, Harness, Trial};
pub use report::{median, RunReport, TrialTiming};
pub use strategy::ExecStrategy;
pub use workloads::Workload;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
