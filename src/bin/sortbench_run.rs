//! sortbench-run: time a threaded merge sort at every thread count
//!
//! Each run sorts a fresh random vector with 1..=N threads and writes a
//! `test_<n>.txt` result file that `sortbench` can chart.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;

use sortbench::bench::{
    format_results, run_benchmark, write_results, BenchConfig, DEFAULT_RESULTS_DIR,
};
use sortbench::init_logging;

#[derive(Parser)]
#[command(name = "sortbench-run")]
#[command(about = "Run the merge sort benchmark and record results")]
#[command(version)]
struct Cli {
    /// Number of elements to sort
    #[arg(short, long, default_value = "100000")]
    size: usize,

    /// Highest thread count measured (defaults to available parallelism)
    #[arg(short = 't', long)]
    max_threads: Option<usize>,

    /// Number of runs, each written to its own file
    #[arg(short, long, default_value = "1")]
    runs: u64,

    /// Index of the first result file
    #[arg(long, default_value = "1")]
    first_index: u64,

    /// Directory result files are written to
    #[arg(short, long, default_value = DEFAULT_RESULTS_DIR)]
    output_dir: PathBuf,

    /// Seed for the input vectors
    #[arg(long)]
    seed: Option<u64>,

    /// Smallest value in the input vectors
    #[arg(long, default_value = "-10000", allow_negative_numbers = true)]
    min_value: i32,

    /// Largest value in the input vectors
    #[arg(long, default_value = "10000", allow_negative_numbers = true)]
    max_value: i32,

    /// Print results of a single run instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.stdout && cli.runs != 1 {
        bail!("--stdout only supports a single run");
    }

    let defaults = BenchConfig::default();
    let config = BenchConfig {
        size: cli.size,
        min_value: cli.min_value,
        max_value: cli.max_value,
        max_threads: cli.max_threads.unwrap_or(defaults.max_threads),
        seed: cli.seed,
    };

    for run in 0..cli.runs {
        info!(run = run + 1, of = cli.runs, max_threads = config.max_threads, "starting run");
        let measurements = run_benchmark(&config, run)?;

        if cli.stdout {
            let mut out = io::stdout().lock();
            out.write_all(format_results(&measurements).as_bytes())?;
        } else {
            write_results(&cli.output_dir, cli.first_index + run, &measurements)?;
        }
    }

    Ok(())
}
