use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use sortbench::output::{write_summary, OutputFormat};
use sortbench::plot::DEFAULT_OUTPUT_DIR;
use sortbench::results::DEFAULT_PATTERN;
use sortbench::{init_logging, plot_all_tests, plot_average_performance, read_and_aggregate_data};

/// Chart merge sort benchmark results.
#[derive(Debug, Parser)]
#[command(name = "sortbench")]
#[command(version)]
struct Command {
    /// Glob pattern selecting result files
    #[arg(short, long, default_value = DEFAULT_PATTERN)]
    input: String,
    /// Directory the charts are written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
    /// Summary format: table, json
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
    /// Do not print the summary
    #[arg(short, long)]
    quiet: bool,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(opts: Command) -> Result<()> {
    let table = read_and_aggregate_data(&opts.input)?;
    info!(rows = table.len(), pattern = %opts.input, "loaded results");

    plot_all_tests(&table, &opts.output_dir)?;
    plot_average_performance(&table, &opts.output_dir)?;

    if !opts.quiet {
        let summary = sortbench::summarize(&table);
        write_summary(&mut io::stdout().lock(), &summary, opts.format)?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let opts = Command::parse();
    init_logging(opts.verbose);

    run(opts)
}
