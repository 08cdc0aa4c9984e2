//! Child-process execution and the worker wire protocol.
//!
//! Each worker is a re-invocation of the current executable with the hidden
//! `worker` subcommand. The parent writes the worker's chunk to its stdin
//! as a JSON array of strings; the child applies the named workload to each
//! item in order, then writes a single [`WorkerReply`] to stdout. Children
//! read all input before producing any output, so parent and child never
//! block on each other's pipes.
//!
//! The pool is scoped to its trial on every exit path: on success each
//! child has exited and been reaped before the trial's clock stops; on any
//! failure (item error, timeout, spawn error) the remaining children are
//! killed and reaped before the error propagates, so a runaway worker
//! cannot outlive its trial.
//!
//! Workloads must be registry-named for this to work: a closure cannot
//! cross a process boundary, a name can.

use std::io::{self, Read};
use std::ops::Range;
use std::path::Path;
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{BenchError, Result};
use crate::strategy::{chunk_ranges, collect_ordered};
use crate::workloads::{self, Workload};

/// What a worker child reports back on stdout.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum WorkerReply {
    /// All items processed; results are in input order.
    Ok { results: Vec<Value> },
    /// An item failed; `index` is chunk-local.
    Err { index: usize, message: String },
}

/// The pipe ends owned by the thread driving one child.
struct WorkerPipes {
    stdin: ChildStdin,
    stdout: ChildStdout,
    stderr: ChildStderr,
}

pub(crate) fn execute(
    workload: &'static dyn Workload,
    items: &Arc<Vec<String>>,
    workers: usize,
    timeout: Duration,
) -> Result<Vec<Value>> {
    let exe = std::env::current_exe().map_err(BenchError::Spawn)?;
    let ranges = chunk_ranges(items.len(), workers);
    let (tx, rx) = mpsc::channel();
    let mut children: Vec<Arc<Mutex<Child>>> = Vec::with_capacity(workers);
    let mut handles = Vec::with_capacity(workers);
    let mut spawn_error = None;

    debug!(workers, items = items.len(), "spawning worker processes");
    for (worker, range) in ranges.into_iter().enumerate() {
        let (child, pipes) = match spawn_worker(&exe, workload.name()) {
            Ok(spawned) => spawned,
            Err(e) => {
                spawn_error = Some(e);
                break;
            }
        };
        let child = Arc::new(Mutex::new(child));
        children.push(Arc::clone(&child));

        let tx = tx.clone();
        let items = Arc::clone(items);
        handles.push(thread::spawn(move || {
            let result = drive_child(&child, pipes, &items, range);
            // Receiver may already be gone if another worker failed first.
            let _ = tx.send((worker, result));
        }));
    }
    drop(tx);

    let outcome = match spawn_error {
        Some(e) => Err(e),
        None => collect_ordered(&rx, workers, timeout),
    };

    // Guaranteed teardown: any failure kills the remaining children before
    // the error propagates, which also unblocks their driver threads.
    if outcome.is_err() {
        terminate_pool(&children);
    }
    for handle in handles {
        let _ = handle.join();
    }

    outcome
}

/// Spawn one worker child and take ownership of its pipes.
///
/// The `Child` handle stays with the caller (for kill/reap); the pipes go
/// to the driver thread.
fn spawn_worker(exe: &Path, workload_name: &str) -> Result<(Child, WorkerPipes)> {
    let mut child = Command::new(exe)
        .arg("worker")
        .arg("--workload")
        .arg(workload_name)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(BenchError::Spawn)?;

    match take_pipes(&mut child) {
        Some(pipes) => Ok((child, pipes)),
        None => {
            let _ = child.kill();
            let _ = child.wait();
            Err(BenchError::WorkerProcess(
                "worker pipes unavailable".to_string(),
            ))
        }
    }
}

fn take_pipes(child: &mut Child) -> Option<WorkerPipes> {
    Some(WorkerPipes {
        stdin: child.stdin.take()?,
        stdout: child.stdout.take()?,
        stderr: child.stderr.take()?,
    })
}

/// Kill and reap every child in the pool.
///
/// Used on the failure path; killing closes the children's pipes, which
/// also unblocks any driver thread still reading a reply. Children that
/// already exited are reaped harmlessly.
fn terminate_pool(children: &[Arc<Mutex<Child>>]) {
    for child in children {
        if let Ok(mut child) = child.lock() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Feed one child its chunk and interpret its reply.
fn drive_child(
    child: &Mutex<Child>,
    pipes: WorkerPipes,
    items: &[String],
    range: Range<usize>,
) -> Result<Vec<Value>> {
    let chunk = &items[range.clone()];

    // Dropping the writer closes the pipe; the child sees EOF and starts.
    serde_json::to_writer(io::BufWriter::new(pipes.stdin), chunk)
        .map_err(|e| BenchError::WorkerProcess(format!("failed to send work items: {e}")))?;

    let mut reply_bytes = Vec::new();
    let mut stdout = pipes.stdout;
    stdout
        .read_to_end(&mut reply_bytes)
        .map_err(|e| BenchError::WorkerProcess(format!("failed to read reply: {e}")))?;

    // Stdout EOF means the child is done (or was killed); drain its stderr
    // for diagnostics, then reap it without holding the lock while blocked
    // on the pipes.
    let mut stderr_text = String::new();
    let mut stderr = pipes.stderr;
    let _ = stderr.read_to_string(&mut stderr_text);

    let status = child
        .lock()
        .map_err(|_| BenchError::WorkerProcess("worker handle poisoned".to_string()))?
        .wait()
        .map_err(BenchError::Spawn)?;

    match serde_json::from_slice::<WorkerReply>(&reply_bytes) {
        Ok(WorkerReply::Ok { results }) => {
            if results.len() != range.len() {
                return Err(BenchError::WorkerProcess(format!(
                    "expected {} results, worker returned {}",
                    range.len(),
                    results.len()
                )));
            }
            Ok(results)
        }
        Ok(WorkerReply::Err { index, message }) => Err(BenchError::Item {
            index: range.start + index,
            message,
        }),
        Err(_) => Err(BenchError::WorkerProcess(format!(
            "{} ({})",
            stderr_text.trim(),
            status
        ))),
    }
}

/// Worker-mode entry point: run the named workload over the items on stdin
/// and write a [`WorkerReply`] to stdout.
///
/// Called by the hidden `worker` subcommand; never by library users.
pub fn serve(workload_name: &str) -> Result<()> {
    let workload = workloads::by_name(workload_name)
        .ok_or_else(|| BenchError::UnknownWorkload(workload_name.to_string()))?;

    let mut payload = String::new();
    io::stdin()
        .read_to_string(&mut payload)
        .map_err(|e| BenchError::WorkerProcess(format!("failed to read work items: {e}")))?;
    let items: Vec<String> = serde_json::from_str(&payload)
        .map_err(|e| BenchError::WorkerProcess(format!("invalid work item payload: {e}")))?;

    let reply = run_items(workload, &items);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer(&mut out, &reply)
        .map_err(|e| BenchError::WorkerProcess(format!("failed to write reply: {e}")))?;
    use std::io::Write as _;
    out.flush()
        .map_err(|e| BenchError::WorkerProcess(format!("failed to flush reply: {e}")))?;
    Ok(())
}

fn run_items(workload: &dyn Workload, items: &[String]) -> WorkerReply {
    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match workload.run(item) {
            Ok(value) => results.push(value),
            Err(e) => {
                return WorkerReply::Err {
                    index,
                    message: e.to_string(),
                }
            }
        }
    }
    WorkerReply::Ok { results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workloads::{LINE_SCAN, WORD_COUNT};

    #[test]
    fn test_run_items_in_order() {
        let items = vec!["a".to_string(), "bb".to_string(), "ccc".to_string()];
        match run_items(&LINE_SCAN, &items) {
            WorkerReply::Ok { results } => {
                assert_eq!(
                    results,
                    vec![Value::from(1u64), Value::from(2u64), Value::from(3u64)]
                );
            }
            WorkerReply::Err { .. } => panic!("unexpected failure"),
        }
    }

    #[test]
    fn test_run_items_reports_chunk_local_index() {
        struct FailSecond;
        impl Workload for FailSecond {
            fn name(&self) -> &'static str {
                "fail-second"
            }
            fn run(&self, item: &str) -> Result<Value> {
                if item == "bad" {
                    Err(BenchError::workload("rejected"))
                } else {
                    Ok(Value::Null)
                }
            }
        }

        let items = vec!["ok".to_string(), "bad".to_string(), "ok".to_string()];
        match run_items(&FailSecond, &items) {
            WorkerReply::Err { index, message } => {
                assert_eq!(index, 1);
                assert!(message.contains("rejected"));
            }
            WorkerReply::Ok { .. } => panic!("expected failure"),
        }
    }

    #[test]
    fn test_reply_serialization_round_trip() {
        let reply = WorkerReply::Ok {
            results: vec![Value::from(7u64)],
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert!(json.contains(r#""status":"ok""#));

        match serde_json::from_str::<WorkerReply>(&json).unwrap() {
            WorkerReply::Ok { results } => assert_eq!(results, vec![Value::from(7u64)]),
            WorkerReply::Err { .. } => panic!("round trip changed variant"),
        }
    }

    #[test]
    fn test_serve_rejects_unknown_workload() {
        let err = serve("no-such-workload").unwrap_err();
        assert!(matches!(err, BenchError::UnknownWorkload(_)));
    }

    #[test]
    fn test_run_items_word_count() {
        let items = vec!["<p>parallel parallel worker</p>".to_string()];
        match run_items(&WORD_COUNT, &items) {
            WorkerReply::Ok { results } => {
                assert_eq!(results[0]["parallel"], Value::from(2u64));
                assert_eq!(results[0]["worker"], Value::from(1u64));
            }
            WorkerReply::Err { .. } => panic!("unexpected failure"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_terminate_pool_kills_and_reaps() {
        let child = Command::new("sleep").arg("60").spawn().unwrap();
        let pool = vec![Arc::new(Mutex::new(child))];

        terminate_pool(&pool);

        let status = pool[0].lock().unwrap().try_wait().unwrap();
        assert!(status.is_some(), "child should be reaped after teardown");
    }
}
