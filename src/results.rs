//! Loading benchmark result files into an in-memory table.
//!
//! Each result file holds one measurement per line in the form
//! `<threads>,<time>us`, with no header. The file stem (e.g. `test_3` for
//! `TestResults/test_3.txt`) identifies the test run the rows belong to.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

/// Default glob pattern for result files.
pub const DEFAULT_PATTERN: &str = "TestResults/test_*.txt";

/// Unit suffix carried by every time value.
pub const TIME_SUFFIX: &str = "us";

/// Splits a row into its two columns, trimming surrounding whitespace.
static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^,]*?)\s*,\s*([^,]*?)\s*$").expect("Invalid result row regex pattern")
});

/// A single measurement: one line of one result file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub threads: i64,
    pub time_us: u64,
    pub test_id: String,
}

/// All records loaded in one run, in file discovery order then line order.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ResultsTable {
    records: Vec<Record>,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append the rows of one file, preserving their order.
    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        self.records.extend(records);
    }

    /// Largest time across every record, ignoring grouping.
    pub fn max_time_us(&self) -> Option<u64> {
        self.records.iter().map(|r| r.time_us).max()
    }

    /// Distinct thread counts in order of first appearance.
    pub fn unique_threads(&self) -> Vec<i64> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.threads) {
                seen.push(record.threads);
            }
        }
        seen
    }
}

impl FromIterator<Record> for ResultsTable {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Derive the test identifier from a result file path: its file name
/// without directory or extension.
pub fn test_id_from_path(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .with_context(|| format!("No file name in result path: {}", path.display()))?;
    Ok(stem.to_string_lossy().into_owned())
}

/// Parse the `<time>us` column into whole microseconds.
pub fn parse_time_us(field: &str) -> Result<u64> {
    let Some(digits) = field.strip_suffix(TIME_SUFFIX) else {
        bail!("time value '{field}' is missing the '{TIME_SUFFIX}' suffix");
    };
    digits
        .trim()
        .parse::<u64>()
        .with_context(|| format!("time value '{field}' is not a non-negative integer"))
}

/// Parse one non-blank row into a record for `test_id`.
pub fn parse_row(line: &str, test_id: &str) -> Result<Record> {
    let Some(caps) = ROW_RE.captures(line) else {
        bail!("expected '<threads>,<time>{TIME_SUFFIX}', got '{line}'");
    };

    let threads = caps[1]
        .parse::<i64>()
        .with_context(|| format!("thread count '{}' is not an integer", &caps[1]))?;
    let time_us = parse_time_us(&caps[2])?;

    Ok(Record {
        threads,
        time_us,
        test_id: test_id.to_string(),
    })
}

/// Parse the full contents of a result file. Blank lines are skipped.
pub fn parse_results(contents: &str, test_id: &str) -> Result<Vec<Record>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_row(line, test_id).with_context(|| format!("line {}", idx + 1))
        })
        .collect()
}

/// Read and parse a single result file.
pub fn read_result_file(path: &Path) -> Result<Vec<Record>> {
    let test_id = test_id_from_path(path)?;
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read result file: {}", path.display()))?;
    parse_results(&contents, &test_id)
        .with_context(|| format!("Malformed result file: {}", path.display()))
}

/// Load every file matching `pattern` into one table.
///
/// Files are visited in the sorted order the glob yields them. A pattern
/// that matches nothing produces an empty table; any unreadable or
/// malformed file aborts the load.
pub fn read_and_aggregate_data(pattern: &str) -> Result<ResultsTable> {
    let paths =
        glob::glob(pattern).with_context(|| format!("Invalid result file pattern: {pattern}"))?;

    let mut table = ResultsTable::new();
    let mut files = 0usize;
    for entry in paths {
        let path = entry.with_context(|| format!("Failed to access match for {pattern}"))?;
        let records = read_result_file(&path)?;
        debug!(path = %path.display(), rows = records.len(), "loaded result file");
        table.extend(records);
        files += 1;
    }

    if files == 0 {
        warn!(pattern, "no result files matched");
    } else {
        debug!(files, rows = table.len(), "aggregated results");
    }

    Ok(table)
}
