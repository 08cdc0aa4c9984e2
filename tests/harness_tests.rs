//! Harness contract tests.
//!
//! Exercises the harness's externally observable guarantees: result
//! ordering across worker counts, sequential/concurrent equivalence at one
//! worker, sweep shape, median summarization, and failure propagation.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use wikibench::workloads::LINE_SCAN;
use wikibench::{repeat_and_summarize, BenchError, ExecStrategy, Harness, Result, Workload};

// ============================================================================
// Test workloads
// ============================================================================

/// Returns each item unchanged.
struct Identity;

impl Workload for Identity {
    fn name(&self) -> &'static str {
        "identity"
    }
    fn run(&self, item: &str) -> Result<Value> {
        Ok(Value::String(item.to_string()))
    }
}

static IDENTITY: Identity = Identity;

/// Fails on one marker item, succeeds on everything else.
struct FailOnMarker;

impl Workload for FailOnMarker {
    fn name(&self) -> &'static str {
        "fail-on-marker"
    }
    fn run(&self, item: &str) -> Result<Value> {
        if item == "marker" {
            Err(BenchError::workload("refused the marker item"))
        } else {
            Ok(Value::String(item.to_string()))
        }
    }
}

static FAIL_ON_MARKER: FailOnMarker = FailOnMarker;

fn documents(n: usize) -> Arc<Vec<String>> {
    Arc::new((0..n).map(|i| format!("item-{i}")).collect())
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn identity_preserves_order_for_every_worker_count() {
    let harness = Harness::new(ExecStrategy::Threads);
    let items = documents(6);
    let expected: Vec<Value> = items
        .iter()
        .map(|item| Value::String(item.clone()))
        .collect();

    for workers in 1..=6 {
        let trial = harness.run_concurrent(&IDENTITY, &items, workers).unwrap();
        assert_eq!(trial.results, expected, "order broken at {workers} workers");
    }
}

#[test]
fn order_holds_when_workers_exceed_items() {
    let harness = Harness::new(ExecStrategy::Threads);
    let items = documents(3);
    let trial = harness.run_concurrent(&IDENTITY, &items, 10).unwrap();

    assert_eq!(trial.results.len(), 3);
    assert_eq!(trial.results[0], Value::String("item-0".to_string()));
    assert_eq!(trial.results[2], Value::String("item-2".to_string()));
}

// ============================================================================
// Sequential baseline
// ============================================================================

#[test]
fn one_worker_matches_run_single_exactly() {
    let harness = Harness::new(ExecStrategy::Threads);
    let items = documents(9);

    let sequential = harness.run_single(&IDENTITY, &items).unwrap();
    let concurrent = harness.run_concurrent(&IDENTITY, &items, 1).unwrap();

    assert_eq!(sequential.results, concurrent.results);
    assert_eq!(concurrent.workers, 1);
}

// ============================================================================
// Sweeps
// ============================================================================

#[test]
fn sweep_records_one_entry_per_configuration() {
    let harness = Harness::new(ExecStrategy::Threads);
    let items = documents(12);

    let report = harness.sweep(&LINE_SCAN, &items, &[1, 2, 3]).unwrap();

    assert_eq!(report.entries.len(), 3);
    for (entry, expected_workers) in report.entries.iter().zip([1, 2, 3]) {
        assert_eq!(entry.workers, expected_workers);
        assert!(entry.elapsed >= Duration::ZERO);
    }
}

#[test]
fn sweep_keeps_only_last_configuration_results() {
    let harness = Harness::new(ExecStrategy::Threads);
    let items = documents(4);

    let report = harness.sweep(&IDENTITY, &items, &[3, 1]).unwrap();
    let last = report.last_results.expect("last results recorded");
    assert_eq!(last.len(), 4);
    assert_eq!(last[3], Value::String("item-3".to_string()));
}

// ============================================================================
// Failure propagation
// ============================================================================

#[test]
fn failing_item_aborts_trial_with_its_index() {
    let harness = Harness::new(ExecStrategy::Threads);
    let items = Arc::new(vec![
        "a".to_string(),
        "b".to_string(),
        "marker".to_string(),
        "d".to_string(),
        "e".to_string(),
    ]);

    let err = harness
        .run_concurrent(&FAIL_ON_MARKER, &items, 2)
        .unwrap_err();
    match err {
        BenchError::Item { index, message } => {
            assert_eq!(index, 2);
            assert!(message.contains("refused the marker item"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn failed_trial_produces_no_report() {
    let harness = Harness::new(ExecStrategy::Threads);
    let items = Arc::new(vec!["ok".to_string(), "marker".to_string()]);

    assert!(harness.sweep(&FAIL_ON_MARKER, &items, &[1, 2]).is_err());
}

// ============================================================================
// Median summarization
// ============================================================================

#[test]
fn repeat_and_summarize_returns_median_of_n() {
    let mut samples = [50u64, 10, 40, 20, 30].into_iter();
    let duration = repeat_and_summarize(
        || Ok(Duration::from_millis(samples.next().unwrap())),
        5,
    )
    .unwrap();
    assert_eq!(duration, Duration::from_millis(30));
}

#[test]
fn repeat_and_summarize_single_run_is_that_duration() {
    let duration = repeat_and_summarize(|| Ok(Duration::from_millis(123)), 1).unwrap();
    assert_eq!(duration, Duration::from_millis(123));
}

#[test]
fn repeated_trials_over_real_workload() {
    let harness = Harness::new(ExecStrategy::Threads);
    let items = documents(16);

    let duration = repeat_and_summarize(
        || {
            harness
                .run_concurrent(&LINE_SCAN, &items, 2)
                .map(|t| t.elapsed)
        },
        3,
    )
    .unwrap();
    assert!(duration >= Duration::ZERO);
}
