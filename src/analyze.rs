//! Grouping and aggregation over a loaded results table.
//!
//! Both views used for charting live here: one series per test run, and
//! the mean time per thread count across every run.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::results::ResultsTable;

/// Measurements of a single test run, in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestSeries {
    pub test_id: String,
    /// `(threads, time_us)` pairs.
    pub points: Vec<(i64, u64)>,
}

/// Mean execution time for one thread count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AveragePoint {
    pub threads: i64,
    pub mean_time_us: f64,
    pub samples: usize,
}

/// Everything reported on stdout after a run.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub tests: Vec<String>,
    pub record_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_time_us: Option<u64>,
    pub averages: Vec<AveragePoint>,
}

/// Group records by test id. Series come back sorted by id; points keep
/// the order they appear in the table.
pub fn per_test_series(table: &ResultsTable) -> Vec<TestSeries> {
    let mut groups: BTreeMap<&str, Vec<(i64, u64)>> = BTreeMap::new();
    for record in table.records() {
        groups
            .entry(record.test_id.as_str())
            .or_default()
            .push((record.threads, record.time_us));
    }

    groups
        .into_iter()
        .map(|(test_id, points)| TestSeries {
            test_id: test_id.to_string(),
            points,
        })
        .collect()
}

/// Arithmetic mean of every time recorded at each thread count, across
/// all tests, ordered by thread count.
pub fn average_by_threads(table: &ResultsTable) -> Vec<AveragePoint> {
    let mut sums: BTreeMap<i64, (u128, usize)> = BTreeMap::new();
    for record in table.records() {
        let entry = sums.entry(record.threads).or_default();
        entry.0 += u128::from(record.time_us);
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(threads, (total, samples))| AveragePoint {
            threads,
            mean_time_us: total as f64 / samples as f64,
            samples,
        })
        .collect()
}

pub fn summarize(table: &ResultsTable) -> Summary {
    Summary {
        tests: per_test_series(table)
            .into_iter()
            .map(|s| s.test_id)
            .collect(),
        record_count: table.len(),
        max_time_us: table.max_time_us(),
        averages: average_by_threads(table),
    }
}
