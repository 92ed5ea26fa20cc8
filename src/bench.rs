//! Merge sort benchmark driver.
//!
//! Sorts one random vector once per thread count and records wall time in
//! whole microseconds. Results are written in the same
//! `<threads>,<time>us` line format that [`crate::results`] reads back.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::results::TIME_SUFFIX;
use crate::sort::{is_sorted, merge_sort};

/// Default directory result files are written to.
pub const DEFAULT_RESULTS_DIR: &str = "TestResults";

/// Benchmark settings.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Number of elements to sort.
    pub size: usize,
    pub min_value: i32,
    pub max_value: i32,
    /// Thread counts `1..=max_threads` are measured.
    pub max_threads: usize,
    /// Seed for the input vector; random when unset.
    pub seed: Option<u64>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            size: 100_000,
            min_value: -10_000,
            max_value: 10_000,
            max_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            seed: None,
        }
    }
}

/// Time taken to sort with a given thread count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Measurement {
    pub threads: usize,
    pub elapsed_us: u64,
}

/// Uniformly distributed integers in `[min, max]`.
pub fn random_vector<R: Rng>(rng: &mut R, size: usize, min: i32, max: i32) -> Vec<i32> {
    (0..size).map(|_| rng.random_range(min..=max)).collect()
}

/// Run one benchmark pass. `run` offsets the seed so that successive runs
/// with the same seed sort different inputs.
pub fn run_benchmark(config: &BenchConfig, run: u64) -> Result<Vec<Measurement>> {
    if config.min_value > config.max_value {
        bail!(
            "Invalid value range: min {} is greater than max {}",
            config.min_value,
            config.max_value
        );
    }
    if config.max_threads == 0 {
        bail!("max_threads must be at least 1");
    }

    let seed = match config.seed {
        Some(seed) => seed.wrapping_add(run),
        None => rand::random(),
    };
    debug!(seed, size = config.size, "generating input");

    let mut rng = StdRng::seed_from_u64(seed);
    let values = random_vector(&mut rng, config.size, config.min_value, config.max_value);

    let mut measurements = Vec::with_capacity(config.max_threads);
    for threads in 1..=config.max_threads {
        let start = Instant::now();
        let sorted = merge_sort(&values, threads);
        let elapsed = start.elapsed();

        if sorted.len() != values.len() || !is_sorted(&sorted) {
            bail!("merge sort with {threads} threads produced unsorted output");
        }

        let elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        debug!(threads, elapsed_us, "sorted");
        measurements.push(Measurement {
            threads,
            elapsed_us,
        });
    }

    Ok(measurements)
}

/// Render measurements as result file contents.
pub fn format_results(measurements: &[Measurement]) -> String {
    let mut out = String::new();
    for m in measurements {
        let _ = writeln!(out, "{},{}{}", m.threads, m.elapsed_us, TIME_SUFFIX);
    }
    out
}

/// Path of the result file for run `index` inside `dir`.
pub fn result_file_path(dir: &Path, index: u64) -> PathBuf {
    dir.join(format!("test_{index}.txt"))
}

/// Write one run's measurements to `dir/test_<index>.txt`, creating `dir`
/// if needed and replacing any existing file.
pub fn write_results(dir: &Path, index: u64, measurements: &[Measurement]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create results directory: {}", dir.display()))?;

    let path = result_file_path(dir, index);
    fs::write(&path, format_results(measurements))
        .with_context(|| format!("Failed to write results: {}", path.display()))?;

    info!(path = %path.display(), rows = measurements.len(), "wrote benchmark results");
    Ok(path)
}
