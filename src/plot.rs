//! Chart generation for benchmark results.
//!
//! Charts are first described as a [`LineChart`] (series, ticks, axis
//! bounds) and then rasterized to PNG with plotters. Keeping the
//! description separate lets the layout rules be checked without fonts or
//! a drawing backend.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::analyze::{average_by_threads, per_test_series};
use crate::results::ResultsTable;

/// Default directory charts are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "Plots";

pub const ALL_TESTS_FILE: &str = "all_tests_performance.png";
pub const AVERAGE_FILE: &str = "average_performance_across_tests.png";

/// Rendered image size, in pixels.
pub const CHART_SIZE: (u32, u32) = (1000, 600);

/// Headroom above the slowest measurement on the y axis.
const Y_HEADROOM: f64 = 1.1;

const AVERAGE_COLOR: RGBColor = RGBColor(214, 39, 40);

const SERIES_COLORS: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// One line on a chart.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub label: String,
    pub color: RGBColor,
    pub points: Vec<(f64, f64)>,
}

/// Everything needed to draw a line chart.
#[derive(Debug, Clone)]
pub struct LineChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    /// Thread counts that get a labelled tick.
    pub x_ticks: Vec<i64>,
    pub y_max: f64,
    pub series: Vec<ChartSeries>,
}

impl LineChart {
    /// X bounds padded so the outermost points are not drawn on the frame.
    pub fn x_range(&self) -> (f64, f64) {
        let lo = self.x_ticks.iter().copied().min().unwrap_or(0) as f64;
        let hi = self.x_ticks.iter().copied().max().unwrap_or(1) as f64;
        let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
        (lo - pad, hi + pad)
    }
}

/// Linear x axis that places ticks only at the observed thread counts.
#[derive(Clone)]
struct ThreadAxis {
    inner: RangedCoordf64,
    ticks: Vec<f64>,
}

impl ThreadAxis {
    fn new(chart: &LineChart) -> Self {
        let (lo, hi) = chart.x_range();
        Self {
            inner: (lo..hi).into(),
            ticks: chart.x_ticks.iter().map(|&t| t as f64).collect(),
        }
    }
}

impl Ranged for ThreadAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.inner.map(value, limit)
    }

    // Every thread count gets a tick regardless of the hint.
    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.inner.range()
    }
}

fn y_max(table: &ResultsTable) -> f64 {
    match table.max_time_us() {
        Some(max) if max > 0 => max as f64 * Y_HEADROOM,
        _ => 1.0,
    }
}

/// Describe the per-test chart: one series per test id.
pub fn all_tests_chart(table: &ResultsTable) -> Result<LineChart> {
    if table.is_empty() {
        bail!("no benchmark results to plot");
    }

    let series = per_test_series(table)
        .into_iter()
        .enumerate()
        .map(|(idx, s)| ChartSeries {
            label: s.test_id,
            color: SERIES_COLORS[idx % SERIES_COLORS.len()],
            points: s
                .points
                .into_iter()
                .map(|(threads, time)| (threads as f64, time as f64))
                .collect(),
        })
        .collect();

    Ok(LineChart {
        title: "Merge Sort Performance Across All Tests".to_string(),
        x_desc: "Number of Threads".to_string(),
        y_desc: "Execution Time (Microseconds)".to_string(),
        x_ticks: table.unique_threads(),
        y_max: y_max(table),
        series,
    })
}

/// Describe the averaged chart. The y axis is scaled from the raw table,
/// not from the averages, so both charts share a scale.
pub fn average_chart(table: &ResultsTable) -> Result<LineChart> {
    if table.is_empty() {
        bail!("no benchmark results to plot");
    }

    let averages = average_by_threads(table);
    let x_ticks = averages.iter().map(|p| p.threads).collect();
    let points = averages
        .iter()
        .map(|p| (p.threads as f64, p.mean_time_us))
        .collect();

    Ok(LineChart {
        title: "Average Merge Sort Performance Across Tests".to_string(),
        x_desc: "Number of Threads".to_string(),
        y_desc: "Average Execution Time (Microseconds)".to_string(),
        x_ticks,
        y_max: y_max(table),
        series: vec![ChartSeries {
            label: "Average Performance".to_string(),
            color: AVERAGE_COLOR,
            points,
        }],
    })
}

fn draw_chart<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    chart: &LineChart,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let x_axis = ThreadAxis::new(chart);

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(x_axis, 0f64..chart.y_max)?;

    ctx.configure_mesh()
        .x_desc(chart.x_desc.as_str())
        .y_desc(chart.y_desc.as_str())
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .draw()?;

    for series in &chart.series {
        let color = series.color;
        ctx.draw_series(
            LineSeries::new(series.points.iter().copied(), color.stroke_width(2)).point_size(4),
        )?
        .label(series.label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Whether a sans-serif font can be loaded for chart text.
pub fn fonts_available() -> bool {
    ("sans-serif", 12).into_font().box_size("0").is_ok()
}

/// Rasterize `chart` to a PNG at `path`, replacing any existing file.
pub fn render_png(chart: &LineChart, path: &Path) -> Result<()> {
    if !fonts_available() {
        bail!("No sans-serif font found to render {}", path.display());
    }
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    draw_chart(root, chart).map_err(|e| anyhow!("Failed to render {}: {e}", path.display()))
}

/// Draw every test as its own line into `dest_folder`, creating the
/// folder if needed. Returns the path of the written image.
pub fn plot_all_tests(table: &ResultsTable, dest_folder: &Path) -> Result<PathBuf> {
    let chart = all_tests_chart(table)?;

    fs::create_dir_all(dest_folder).with_context(|| {
        format!("Failed to create output directory: {}", dest_folder.display())
    })?;

    let path = dest_folder.join(ALL_TESTS_FILE);
    render_png(&chart, &path)?;
    info!(path = %path.display(), series = chart.series.len(), "wrote per-test chart");
    Ok(path)
}

/// Draw the mean time per thread count into `dest_folder`.
///
/// The folder must already exist; [`plot_all_tests`] creates it when the
/// two are run in sequence.
pub fn plot_average_performance(table: &ResultsTable, dest_folder: &Path) -> Result<PathBuf> {
    let chart = average_chart(table)?;

    if !dest_folder.is_dir() {
        bail!("Output directory does not exist: {}", dest_folder.display());
    }

    let path = dest_folder.join(AVERAGE_FILE);
    render_png(&chart, &path)?;
    info!(path = %path.display(), points = chart.series[0].points.len(), "wrote average chart");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Record;

    fn sample_table() -> ResultsTable {
        [
            ("test_b", 1, 200),
            ("test_b", 2, 60),
            ("test_a", 1, 100),
            ("test_a", 2, 50),
            ("test_a", 4, 40),
        ]
        .into_iter()
        .map(|(test_id, threads, time_us)| Record {
            threads,
            time_us,
            test_id: test_id.to_string(),
        })
        .collect()
    }

    #[test]
    fn test_all_tests_chart_one_series_per_test() {
        let chart = all_tests_chart(&sample_table()).unwrap();
        let labels: Vec<&str> = chart.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["test_a", "test_b"]);
        assert_eq!(chart.series[0].points, vec![(1.0, 100.0), (2.0, 50.0), (4.0, 40.0)]);
        assert_ne!(chart.series[0].color, chart.series[1].color);
        assert_eq!(chart.x_ticks, vec![1, 2, 4]);
    }

    #[test]
    fn test_y_axis_uses_raw_max() {
        let table = sample_table();
        let all = all_tests_chart(&table).unwrap();
        let avg = average_chart(&table).unwrap();
        assert!((all.y_max - 220.0).abs() < 1e-9);
        assert_eq!(all.y_max, avg.y_max);
    }

    #[test]
    fn test_average_chart_points() {
        let chart = average_chart(&sample_table()).unwrap();
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].label, "Average Performance");
        assert_eq!(
            chart.series[0].points,
            vec![(1.0, 150.0), (2.0, 55.0), (4.0, 40.0)]
        );
        assert_eq!(chart.x_ticks, vec![1, 2, 4]);
    }

    #[test]
    fn test_empty_table_fails() {
        let table = ResultsTable::new();
        assert!(all_tests_chart(&table).is_err());
        assert!(average_chart(&table).is_err());
    }

    #[test]
    fn test_x_range_padding() {
        let chart = all_tests_chart(&sample_table()).unwrap();
        let (lo, hi) = chart.x_range();
        assert!(lo < 1.0 && lo > 0.0);
        assert!(hi > 4.0 && hi < 5.0);
    }

    #[test]
    fn test_x_range_single_tick() {
        let mut chart = all_tests_chart(&sample_table()).unwrap();
        chart.x_ticks = vec![3];
        assert_eq!(chart.x_range(), (2.0, 4.0));
    }

    #[test]
    fn test_zero_times_still_have_axis() {
        let table: ResultsTable = std::iter::once(Record {
            threads: 1,
            time_us: 0,
            test_id: "t".to_string(),
        })
        .collect();
        assert_eq!(all_tests_chart(&table).unwrap().y_max, 1.0);
    }

    #[test]
    fn test_average_requires_existing_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("Plots");
        let err = plot_average_performance(&sample_table(), &missing).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(!missing.exists());
    }

    #[test]
    fn test_thread_axis_ticks() {
        let chart = all_tests_chart(&sample_table()).unwrap();
        let axis = ThreadAxis::new(&chart);
        assert_eq!(axis.key_points(3usize), vec![1.0, 2.0, 4.0]);
        assert_eq!(axis.key_points(100usize), vec![1.0, 2.0, 4.0]);
        let range = axis.range();
        assert_eq!((range.start, range.end), chart.x_range());
    }

    #[test]
    fn test_tick_labels_only_at_thread_counts() {
        if !fonts_available() {
            eprintln!("skipping: no sans-serif font for chart text");
            return;
        }

        let chart = all_tests_chart(&sample_table()).unwrap();
        let mut svg = String::new();
        draw_chart(
            SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area(),
            &chart,
        )
        .unwrap();

        for label in [">1</text>", ">2</text>", ">4</text>", ">test_a</text>"] {
            assert!(svg.contains(label), "missing {label}");
        }
        assert!(!svg.contains(">3</text>"));
    }

    #[test]
    fn test_plot_both_charts() {
        if !fonts_available() {
            eprintln!("skipping: no sans-serif font for chart text");
            return;
        }

        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("Plots");
        let table = sample_table();

        let all = plot_all_tests(&table, &dest).unwrap();
        let avg = plot_average_performance(&table, &dest).unwrap();

        assert!(dest.is_dir());
        assert_eq!(all, dest.join(ALL_TESTS_FILE));
        assert_eq!(avg, dest.join(AVERAGE_FILE));
        for path in [all, avg] {
            let bytes = fs::read(&path).unwrap();
            assert!(bytes.starts_with(b"\x89PNG"));
        }
    }

    #[test]
    fn test_plot_overwrites_existing_files() {
        if !fonts_available() {
            eprintln!("skipping: no sans-serif font for chart text");
            return;
        }

        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path();
        fs::write(dest.join(ALL_TESTS_FILE), b"junk").unwrap();
        fs::write(dest.join(AVERAGE_FILE), b"junk").unwrap();

        let table = sample_table();
        plot_all_tests(&table, dest).unwrap();
        plot_average_performance(&table, dest).unwrap();

        for name in [ALL_TESTS_FILE, AVERAGE_FILE] {
            let bytes = fs::read(dest.join(name)).unwrap();
            assert!(bytes.starts_with(b"\x89PNG"), "{name} not replaced");
        }
    }
}
