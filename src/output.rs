//! Rendering the run summary on stdout.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use anyhow::{bail, Result};

use crate::analyze::{AveragePoint, Summary};

/// Output format for the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => bail!("Unknown output format '{other}', expected 'table' or 'json'"),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Write `summary` to `out` in the requested format.
pub fn write_summary<W: Write>(out: &mut W, summary: &Summary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(summary)?)?;
        }
        OutputFormat::Table => {
            writeln!(
                out,
                "{} records from {} tests: {}",
                summary.record_count,
                summary.tests.len(),
                summary.tests.join(", ")
            )?;
            writeln!(out)?;
            write_averages(out, &summary.averages)?;
        }
    }
    Ok(())
}

const AVERAGE_HEADERS: [&str; 3] = ["threads", "avg_time_us", "samples"];

/// Write the per-thread averages as a right-aligned table.
pub fn write_averages<W: Write>(out: &mut W, averages: &[AveragePoint]) -> Result<()> {
    if averages.is_empty() {
        writeln!(out, "(no results)")?;
        return Ok(());
    }

    let rows: Vec<[String; 3]> = averages
        .iter()
        .map(|p| {
            [
                p.threads.to_string(),
                format!("{:.1}", p.mean_time_us),
                p.samples.to_string(),
            ]
        })
        .collect();

    // Every cell is ASCII, so byte length is the display width.
    let mut widths = AVERAGE_HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let [w0, w1, w2] = widths;
    let [h0, h1, h2] = AVERAGE_HEADERS;
    writeln!(out, "{h0:>w0$} | {h1:>w1$} | {h2:>w2$}")?;
    writeln!(out, "{}-+-{}-+-{}", "-".repeat(w0), "-".repeat(w1), "-".repeat(w2))?;
    for [threads, mean, samples] in &rows {
        writeln!(out, "{threads:>w0$} | {mean:>w1$} | {samples:>w2$}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> Summary {
        Summary {
            tests: vec!["test_a".to_string(), "test_b".to_string()],
            record_count: 4,
            max_time_us: Some(200),
            averages: vec![
                AveragePoint {
                    threads: 1,
                    mean_time_us: 150.0,
                    samples: 2,
                },
                AveragePoint {
                    threads: 2,
                    mean_time_us: 55.0,
                    samples: 2,
                },
            ],
        }
    }

    fn render(format: OutputFormat) -> String {
        let mut buf = Vec::new();
        write_summary(&mut buf, &summary(), format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_table_summary() {
        let text = render(OutputFormat::Table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "4 records from 2 tests: test_a, test_b");
        assert_eq!(lines[2], "threads | avg_time_us | samples");
        assert_eq!(lines[3], "--------+-------------+--------");
        assert_eq!(lines[4], "      1 |       150.0 |       2");
        assert_eq!(lines[5], "      2 |        55.0 |       2");
    }

    #[test]
    fn test_json_summary() {
        let text = render(OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["averages"][1]["threads"], 2);
        assert_eq!(value["averages"][1]["mean_time_us"], 55.0);
    }

    #[test]
    fn test_no_averages() {
        let mut buf = Vec::new();
        write_averages(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "(no results)\n");
    }

    #[test]
    fn test_wide_values_widen_columns() {
        let averages = [AveragePoint {
            threads: 128,
            mean_time_us: 123_456_789.3,
            samples: 10_000_000,
        }];
        let mut buf = Vec::new();
        write_averages(&mut buf, &averages).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "threads | avg_time_us |  samples");
        assert_eq!(lines[2], "    128 | 123456789.2 | 10000000");
    }

    #[test]
    fn test_unicode_test_ids_in_header() {
        let unicode = Summary {
            tests: vec!["prüfung_ü".to_string()],
            ..summary()
        };
        let mut buf = Vec::new();
        write_summary(&mut buf, &unicode, OutputFormat::Table).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("4 records from 1 tests: prüfung_ü\n"));
    }
}
