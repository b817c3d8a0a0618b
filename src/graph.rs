//! Grouped-bar charts of the summary rows, keyed by direction.

use crate::labels::Labels;
use crate::record::Metric;
use crate::result_set::ResultSet;
use serde::Serialize;

#[cfg(feature = "web")]
use crate::error::{ReportError, Result};

/// Category used for records seen before any direction marker
pub const UNSET_DIRECTION: &str = "-";

/// The four summary charts of the dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    AvgDelay,
    StopCount,
    TotalDelay,
    StopTime,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::AvgDelay,
        ChartKind::StopCount,
        ChartKind::TotalDelay,
        ChartKind::StopTime,
    ];

    pub fn metric(&self) -> Metric {
        match self {
            ChartKind::AvgDelay => Metric::AvgDelaySecVeh,
            ChartKind::StopCount => Metric::StopCount,
            ChartKind::TotalDelay => Metric::TotalDelayMin,
            ChartKind::StopTime => Metric::StopTimeMin,
        }
    }

    pub fn title<'a>(&self, labels: &'a Labels) -> &'a str {
        match self {
            ChartKind::AvgDelay => &labels.chart_avg_delay,
            ChartKind::StopCount => &labels.chart_stop_count,
            ChartKind::TotalDelay => &labels.chart_total_delay,
            ChartKind::StopTime => &labels.chart_stop_time,
        }
    }
}

/// Bar heights per (category, series)
///
/// `series[s].values[c]` is the height of series `s` in category `c`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GroupedBars {
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

impl GroupedBars {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Y axis range: always includes zero, with headroom above the tallest bar
    pub fn value_range(&self) -> (f64, f64) {
        let values = self.series.iter().flat_map(|series| series.values.iter());
        let (min, max) = values.fold((0.0f64, 0.0f64), |(min, max), v| (min.min(*v), max.max(*v)));
        if max <= min {
            (min, min + 1.0)
        } else {
            (min, max * 1.1)
        }
    }
}

/// Group records by direction (first-seen order) with one series per source file.
///
/// Values of the same direction and file are summed; absent measurements
/// count as zero.
pub fn grouped_bars(records: &ResultSet, metric: Metric) -> GroupedBars {
    let mut bars = GroupedBars::default();

    for sourced in records {
        let direction = sourced
            .record
            .direction
            .as_deref()
            .unwrap_or(UNSET_DIRECTION);

        let category = match bars.categories.iter().position(|c| c == direction) {
            Some(index) => index,
            None => {
                bars.categories.push(direction.to_string());
                for series in &mut bars.series {
                    series.values.push(0.0);
                }
                bars.categories.len() - 1
            }
        };

        let series = match bars
            .series
            .iter()
            .position(|s| s.name == sourced.source_file)
        {
            Some(index) => index,
            None => {
                bars.series.push(BarSeries {
                    name: sourced.source_file.clone(),
                    values: vec![0.0; bars.categories.len()],
                });
                bars.series.len() - 1
            }
        };

        let value = sourced
            .record
            .measurements
            .get(metric)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        bars.series[series].values[category] += value;
    }

    bars
}

/// Configuration options for chart rendering
#[derive(Clone, Debug)]
pub struct GraphOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Label for the X-axis
    pub x_label: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            width: 640,
            height: 400,
        }
    }
}

/// Render grouped bars as an SVG document
///
/// # Arguments
/// * `bars` - Bar heights per direction and source file
/// * `options` - Chart styling options
///
/// # Returns
/// * The SVG markup, ready to be inlined in an HTML page
#[cfg(feature = "web")]
pub fn render_svg(bars: &GroupedBars, options: &GraphOptions) -> Result<String> {
    let mut svg = String::new();
    draw_grouped_bars(&mut svg, bars, options).map_err(|e| ReportError::Chart(e.to_string()))?;
    Ok(svg)
}

#[cfg(feature = "web")]
fn draw_grouped_bars(
    svg: &mut String,
    bars: &GroupedBars,
    options: &GraphOptions,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    use plotters::prelude::*;

    let root = SVGBackend::with_string(svg, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let groups = bars.categories.len().max(1) as f64;
    let (min_y, max_y) = bars.value_range();

    let mut chart = ChartBuilder::on(&root)
        .caption(&options.title, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..groups - 0.5, min_y..max_y)?;

    let categories = &bars.categories;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(categories.len() + 1)
        .x_label_formatter(&|x| category_label(categories, *x))
        .x_desc(&options.x_label)
        .y_desc(&options.y_label)
        .draw()?;

    // Bars of one category share 80% of its slot
    let width = 0.8 / bars.series.len().max(1) as f64;
    for (index, series) in bars.series.iter().enumerate() {
        let color = Palette99::pick(index).to_rgba();
        let offset = -0.4 + width * index as f64;

        chart
            .draw_series(series.values.iter().enumerate().map(|(category, value)| {
                let x0 = category as f64 + offset;
                Rectangle::new([(x0, 0.0), (x0 + width, *value)], color.filled())
            }))?
            .label(series.name.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if !bars.series.is_empty() {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Category name for an axis tick sitting on a category centre
#[cfg(feature = "web")]
fn category_label(categories: &[String], x: f64) -> String {
    let index = x.round();
    if index < 0.0 || (x - index).abs() > 1e-6 {
        return String::new();
    }
    categories.get(index as usize).cloned().unwrap_or_default()
}
