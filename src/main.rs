//! wikibench CLI
//!
//! Throughput micro-benchmarks over text and HTML inputs.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use wikibench::workloads::{EXTRACT_CONTENT, TAG_COUNT, WORD_COUNT};
use wikibench::{scenarios, strategy, ExecStrategy, Harness, Result};

/// wikibench benchmark runner
#[derive(Parser, Debug)]
#[command(name = "wikibench")]
#[command(version)]
#[command(about = "Repeatable throughput micro-benchmarks for text and HTML workloads")]
#[command(long_about = r#"Repeatable throughput micro-benchmarks for text and HTML workloads.

Each subcommand runs one benchmark scenario: a sequential-vs-threaded line
read comparison, or an HTML workload sweep over a range of worker counts.
Workers are either threads (I/O-bound work) or child processes (CPU-bound
work); the strategy is an explicit flag, never a hidden default.

Flag defaults reproduce the classic wiki benchmark scripts, so flag-less
invocations behave like the originals.

EXAMPLES:
  # Sequential vs 2-thread line read over Emails.csv, 100 runs each
  wikibench read

  # Tag-count sweep over 6..1 worker processes
  wikibench tags --input wiki_content_extracted.txt

  # Same sweep, but with worker threads and a custom worker range
  wikibench tags --strategy threads --workers 1,2,4,8
"#)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Per-trial safety-net timeout in seconds
    #[arg(long, global = true, default_value_t = 300)]
    trial_timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare sequential and threaded reading of a line-oriented file
    Read {
        /// Line-oriented input file
        #[arg(long, default_value = "Emails.csv")]
        input: PathBuf,

        /// Repetitions per variant (median is reported)
        #[arg(long, default_value_t = 100)]
        runs: usize,

        /// Worker count for the threaded variant
        #[arg(long, default_value_t = 2)]
        workers: usize,

        /// Worker isolation strategy
        #[arg(long, default_value_t = ExecStrategy::Threads)]
        strategy: ExecStrategy,
    },

    /// Sweep content-region extraction over worker counts
    Extract {
        /// JSON array of HTML-document strings
        #[arg(long, default_value = "wiki_content.txt")]
        input: PathBuf,

        /// Where to write the last configuration's extracted regions
        #[arg(long, default_value = "wiki_content_extracted.txt")]
        output: PathBuf,

        /// Worker counts to sweep, in order
        #[arg(long, value_delimiter = ',', default_values_t = [6, 5, 4, 3, 2, 1])]
        workers: Vec<usize>,

        /// Worker isolation strategy
        #[arg(long, default_value_t = ExecStrategy::Processes)]
        strategy: ExecStrategy,
    },

    /// Sweep tag-name counting over worker counts
    Tags {
        /// JSON array of HTML-document strings
        #[arg(long, default_value = "wiki_content_extracted.txt")]
        input: PathBuf,

        /// Where to write the last configuration's tag counters
        #[arg(long, default_value = "wiki_content_count.txt")]
        output: PathBuf,

        /// Worker counts to sweep, in order
        #[arg(long, value_delimiter = ',', default_values_t = [6, 5, 4, 3, 2, 1])]
        workers: Vec<usize>,

        /// Worker isolation strategy
        #[arg(long, default_value_t = ExecStrategy::Processes)]
        strategy: ExecStrategy,
    },

    /// Sweep long-word counting over worker counts
    Words {
        /// JSON array of HTML-document strings
        #[arg(long, default_value = "wiki_content_extracted.txt")]
        input: PathBuf,

        /// Where to write the last configuration's word counters
        #[arg(long, default_value = "wiki_word_count.txt")]
        output: PathBuf,

        /// Worker counts to sweep, in order
        #[arg(long, value_delimiter = ',', default_values_t = [1, 2, 3, 4, 5, 6])]
        workers: Vec<usize>,

        /// Worker isolation strategy
        #[arg(long, default_value_t = ExecStrategy::Processes)]
        strategy: ExecStrategy,
    },

    /// Process-strategy worker mode (spawned internally, not for direct use)
    #[command(hide = true)]
    Worker {
        /// Registered workload name to apply
        #[arg(long)]
        workload: String,
    },
}

fn main() {
    let args = Args::parse();

    // Benchmark output owns stdout; logging goes to stderr.
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let timeout = Duration::from_secs(args.trial_timeout);
    if let Err(e) = run(args.command, timeout) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(command: Command, timeout: Duration) -> Result<()> {
    match command {
        Command::Read {
            input,
            runs,
            workers,
            strategy,
        } => {
            let harness = Harness::new(strategy).with_trial_timeout(timeout);
            scenarios::run_read(&harness, &input, runs, workers)
        }
        Command::Extract {
            input,
            output,
            workers,
            strategy,
        } => {
            let harness = Harness::new(strategy).with_trial_timeout(timeout);
            scenarios::run_sweep(&harness, &EXTRACT_CONTENT, &input, Some(&output), &workers)
                .map(|_| ())
        }
        Command::Tags {
            input,
            output,
            workers,
            strategy,
        } => {
            let harness = Harness::new(strategy).with_trial_timeout(timeout);
            scenarios::run_sweep(&harness, &TAG_COUNT, &input, Some(&output), &workers)
                .map(|_| ())
        }
        Command::Words {
            input,
            output,
            workers,
            strategy,
        } => {
            let harness = Harness::new(strategy).with_trial_timeout(timeout);
            scenarios::run_sweep(&harness, &WORD_COUNT, &input, Some(&output), &workers)
                .map(|_| ())
        }
        Command::Worker { workload } => strategy::serve_worker(&workload),
    }
}
