//! Line-oriented workload for the threaded-read comparison.

use serde_json::Value;

use crate::error::Result;
use crate::workloads::Workload;

/// Scans one line of text and reports its byte length.
///
/// Deliberately trivial: the read benchmark measures how line traversal
/// scales with worker threads, so the per-item work is a single pass over
/// the line with no allocation.
#[derive(Debug, Clone, Copy)]
pub struct LineScan;

impl Workload for LineScan {
    fn name(&self) -> &'static str {
        "line-scan"
    }

    fn run(&self, item: &str) -> Result<Value> {
        Ok(Value::from(item.len() as u64))
    }
}
