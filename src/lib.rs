//! Sortbench library - shared modules for the sortbench and sortbench-run
//! binaries.
//!
//! `sortbench-run` times a threaded merge sort at every thread count and
//! writes one result file per run. `sortbench` loads those files, averages
//! them per thread count and charts the outcome.
//!
//! # Modules
//!
//! - [`results`] - Result file parsing and discovery
//! - [`analyze`] - Per-test grouping and per-thread averages
//! - [`plot`] - Chart layout and PNG rendering
//! - [`output`] - Summary tables and JSON on stdout
//! - [`sort`] - Fork-join merge sort
//! - [`bench`] - Benchmark driver
//!
//! # Example
//!
//! ```no_run
//! use sortbench::{plot, read_and_aggregate_data};
//! use std::path::Path;
//!
//! let table = read_and_aggregate_data("TestResults/test_*.txt").expect("Failed to load results");
//! let dest = Path::new("Plots");
//! plot::plot_all_tests(&table, dest).expect("Failed to plot tests");
//! plot::plot_average_performance(&table, dest).expect("Failed to plot average");
//! ```

pub mod analyze;
pub mod bench;
pub mod output;
pub mod plot;
pub mod results;
pub mod sort;

// Re-export for convenience
pub use analyze::{average_by_threads, per_test_series, summarize, AveragePoint, Summary};
pub use output::OutputFormat;
pub use plot::{plot_all_tests, plot_average_performance};
pub use results::{read_and_aggregate_data, Record, ResultsTable};

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber shared by both binaries. `RUST_LOG`
/// takes precedence over `verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
