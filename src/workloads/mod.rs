//! Benchmarked units of work.
//!
//! A [`Workload`] is a pure function from one work item to one JSON result.
//! It must be safe to apply concurrently with no shared mutable state; the
//! harness relies on that to fan items out across threads or processes
//! without locks. Results are `serde_json::Value` so they can cross a
//! process boundary and be persisted verbatim.
//!
//! Built-in workloads are zero-sized statics addressable through
//! [`by_name`]; the stable names are what the process execution strategy
//! passes to worker children on the command line.

mod html;
mod lines;

pub use html::{ExtractContent, TagCount, WordCount};
pub use lines::LineScan;

use serde_json::Value;

use crate::error::Result;

/// One unit of benchmarked work.
///
/// Implementations must be stateless with respect to items: `run` may be
/// called for the same or different items from any number of workers at
/// once, in any order.
pub trait Workload: Send + Sync {
    /// Stable name, used for reporting and for process-mode dispatch.
    fn name(&self) -> &'static str;

    /// Apply the workload to one item.
    fn run(&self, item: &str) -> Result<Value>;
}

/// Scan a line and report its byte length.
pub static LINE_SCAN: LineScan = LineScan;
/// Extract the `div#content` region of an HTML document.
pub static EXTRACT_CONTENT: ExtractContent = ExtractContent;
/// Count tag-name occurrences in an HTML document.
pub static TAG_COUNT: TagCount = TagCount;
/// Count long lowercase words in an HTML document's visible text.
pub static WORD_COUNT: WordCount = WordCount;

/// Look up a built-in workload by its stable name.
pub fn by_name(name: &str) -> Option<&'static dyn Workload> {
    match name {
        "line-scan" => Some(&LINE_SCAN),
        "extract-content" => Some(&EXTRACT_CONTENT),
        "tag-count" => Some(&TAG_COUNT),
        "word-count" => Some(&WORD_COUNT),
        _ => None,
    }
}

/// Names of all built-in workloads.
pub fn names() -> &'static [&'static str] {
    &["line-scan", "extract-content", "tag-count", "word-count"]
}
