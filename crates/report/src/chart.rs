//! Bar chart series and their tooltips.

use bmxp_core::html::escape_html;
use bmxp_core::normalize::{NormalizedMetrics, NormalizedResults};
use bmxp_core::units::{display_number, display_or_placeholder, to_fixed_number, PLACEHOLDER};
use bmxp_core::{BenchmarkRecord, Metric};
use serde::Serialize;

use crate::table::Renderer;

/// Normalized columns that get a chart, with their titles and reading hint.
pub const CHARTED_COLUMNS: [(Metric, &str, &str); 5] = [
    (Metric::BytesPerSecond, "B/s", "(more is better)"),
    (Metric::ItemsPerSecond, "items/s", "(more is better)"),
    (Metric::Iterations, "Iterations", "(more is better)"),
    (Metric::RealTime, "Clock time", "(less is better)"),
    (Metric::CpuTime, "CPU time", "(less is better)"),
];

/// One bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Record display name, used as the bar label
    pub label: String,
    /// Bar height; `None` when the ratio is undefined
    pub y: Option<f64>,
    /// Tooltip markup for the record
    pub tooltip: String,
}

/// One bar chart: a bar per record for a single normalized column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Normalized column name, unique within a panel
    pub column: &'static str,
    /// Chart title
    pub title: &'static str,
    /// Reading hint shown under the title
    pub observation: &'static str,
    /// Bars, in record order
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Build the chart of one normalized column.
    pub fn from_column(
        results: &NormalizedResults,
        metric: Metric,
        title: &'static str,
        observation: &'static str,
    ) -> Self {
        let points = results
            .iter()
            .map(|(record, metrics)| {
                let y = metrics.get(metric);
                ChartPoint {
                    label: record.name.clone(),
                    y: y.is_finite().then_some(y),
                    tooltip: tooltip(record, metrics),
                }
            })
            .collect();
        Self {
            column: metric.normalized_column(),
            title,
            observation,
            points,
        }
    }

    /// The five charts shown for a loaded benchmark.
    pub fn all(results: &NormalizedResults) -> Vec<Self> {
        CHARTED_COLUMNS
            .iter()
            .map(|&(metric, title, observation)| Self::from_column(results, metric, title, observation))
            .collect()
    }
}

/// Tooltip markup: the record name and a small table with absolute and
/// normalized values of all five metrics.
pub fn tooltip(record: &BenchmarkRecord, normalized: &NormalizedMetrics) -> String {
    let human = |m: Metric| Renderer::Human.render_number(record.metric(m));
    let nanos = |m: Metric| {
        display_or_placeholder(record.metric(m), |v| {
            format!("{}ns", display_number(to_fixed_number(v, 0)))
        })
    };

    let mut table = String::from("<table><tr><th></th><th>Absolute</th><th>Normalized</th></tr>");
    let mut row = |name: &str, absolute: String, metric: Metric| {
        let value = normalized.get(metric);
        let relative = if value.is_finite() {
            format!("{}x min", display_number(to_fixed_number(value, 3)))
        } else {
            PLACEHOLDER.to_string()
        };
        table.push_str(&format!(
            "<tr><td>{name}</td><td>{absolute}</td><td>{relative}</td></tr>"
        ));
    };
    row("B/s", human(Metric::BytesPerSecond), Metric::BytesPerSecond);
    row("items/s", human(Metric::ItemsPerSecond), Metric::ItemsPerSecond);
    row("CPU", nanos(Metric::CpuTime), Metric::CpuTime);
    row("Clock", nanos(Metric::RealTime), Metric::RealTime);
    row("Iterations", human(Metric::Iterations), Metric::Iterations);
    table.push_str("</table>");

    format!("<h4>{}</h4>{}", escape_html(&record.name), table)
}
