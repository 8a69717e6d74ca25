//! Table view-models.
//!
//! Each loaded benchmark shows two tables over the same records: absolute
//! values and values normalized by the column minimum. The column layout
//! and cell renderers are described here; the grid widget only draws them.

use bmxp_core::html::escape_html;
use bmxp_core::normalize::{NormalizedMetrics, NormalizedResults};
use bmxp_core::units::{
    display_number, display_or_placeholder, human_readable, to_fixed_number, UnitBase,
};
use bmxp_core::{BenchmarkRecord, Metric};
use serde::Serialize;

/// Number of rows above which the grid offers a search box.
pub const SEARCH_THRESHOLD: usize = 20;

/// How a cell value is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Renderer {
    /// Rounded to an integer.
    Int,
    /// Divided by one million, three decimals.
    Megas,
    /// Three decimals.
    Fixed,
    /// Decimal unit prefix, three decimals.
    Human,
    /// HTML-escaped text.
    Escaped,
}

impl Renderer {
    /// Render a numeric value. Absent or non-finite values become the
    /// placeholder.
    pub fn render_number(self, value: Option<f64>) -> String {
        display_or_placeholder(value, |v| match self {
            Self::Int => display_number(to_fixed_number(v, 0)),
            Self::Megas => display_number(to_fixed_number(v / 1.0e6, 3)),
            Self::Fixed => display_number(to_fixed_number(v, 3)),
            Self::Human => human_readable(v, UnitBase::Decimal, 3),
            Self::Escaped => escape_html(&display_number(v)),
        })
    }

    /// Render a text value.
    pub fn render_text(self, value: &str) -> String {
        match self {
            Self::Escaped => escape_html(value),
            _ => value.to_string(),
        }
    }

    /// Unit prefix shown in column titles.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Megas => "M",
            _ => "",
        }
    }
}

/// Data type hint for the grid's sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Numeric column
    Num,
    /// Text column
    Text,
}

/// Where a column takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "metric")]
pub enum ColumnSource {
    /// Record id
    Id,
    /// Record display name
    Name,
    /// Absolute metric value
    Absolute(Metric),
    /// Normalized metric value
    Normalized(Metric),
}

impl ColumnSource {
    /// Field name the value comes from.
    pub fn data_key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Absolute(m) => m.column(),
            Self::Normalized(m) => m.normalized_column(),
        }
    }

    fn value(self, record: &BenchmarkRecord, normalized: &NormalizedMetrics) -> Option<f64> {
        match self {
            Self::Id => Some(record.id as f64),
            Self::Name => None,
            Self::Absolute(m) => record.metric(m),
            Self::Normalized(m) => Some(normalized.get(m)),
        }
    }
}

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    /// Header text
    pub title: String,
    /// Field the column shows
    pub data_key: &'static str,
    /// Sorting hint
    pub kind: ColumnKind,
    /// CSS class for the cells
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<&'static str>,
    /// Cell renderer
    pub renderer: Renderer,
    #[serde(skip)]
    source: ColumnSource,
}

impl ColumnDescriptor {
    fn new(title: impl Into<String>, source: ColumnSource, renderer: Renderer) -> Self {
        let (kind, class_name) = match source {
            ColumnSource::Id => (ColumnKind::Num, None),
            ColumnSource::Name => (ColumnKind::Text, None),
            _ => (ColumnKind::Num, Some("text-right")),
        };
        Self {
            title: title.into(),
            data_key: source.data_key(),
            kind,
            class_name,
            renderer,
            source,
        }
    }

    /// Where the column takes its value from.
    pub fn source(&self) -> ColumnSource {
        self.source
    }
}

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    /// Rendered text, safe to insert into markup
    pub display: String,
    /// Numeric sort key, when the column is numeric and the value finite
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<f64>,
}

/// One row per benchmark record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// Record id
    pub id: usize,
    /// Cells, in column order
    pub cells: Vec<TableCell>,
}

/// Renderers for the three groups of metric columns.
#[derive(Debug, Clone, Copy)]
struct Renderers {
    ns: Renderer,
    iters: Renderer,
    rates: Renderer,
}

/// A complete table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    /// Suffix distinguishing the table within its panel (`_pretty`, `_normalized`)
    pub suffix: &'static str,
    /// Heading above the table
    pub heading: &'static str,
    /// Whether the grid shows a search box
    pub searching: bool,
    /// Column layout
    pub columns: Vec<ColumnDescriptor>,
    /// Rows, in record order
    pub rows: Vec<TableRow>,
}

impl TableView {
    /// Absolute values: integer nanoseconds, rates and iterations in millions.
    pub fn pretty(results: &NormalizedResults) -> Self {
        let renderers = Renderers {
            ns: Renderer::Int,
            iters: Renderer::Megas,
            rates: Renderer::Megas,
        };
        Self::build("_pretty", "Results", false, renderers, results)
    }

    /// Normalized values, three decimals.
    pub fn normalized(results: &NormalizedResults) -> Self {
        let renderers = Renderers {
            ns: Renderer::Fixed,
            iters: Renderer::Fixed,
            rates: Renderer::Fixed,
        };
        Self::build("_normalized", "Normalized by column min", true, renderers, results)
    }

    fn build(
        suffix: &'static str,
        heading: &'static str,
        normalized: bool,
        renderers: Renderers,
        results: &NormalizedResults,
    ) -> Self {
        let source = |m: Metric| {
            if normalized {
                ColumnSource::Normalized(m)
            } else {
                ColumnSource::Absolute(m)
            }
        };
        let rate = renderers.rates.prefix();
        let iter = renderers.iters.prefix();
        let clock = if normalized { "" } else { "(ns)" };

        let columns = vec![
            ColumnDescriptor::new("ID", ColumnSource::Id, Renderer::Int),
            ColumnDescriptor::new("Name", ColumnSource::Name, Renderer::Escaped),
            ColumnDescriptor::new(
                format!("{rate}B/s"),
                source(Metric::BytesPerSecond),
                renderers.rates,
            ),
            ColumnDescriptor::new(
                format!("{rate}items/s"),
                source(Metric::ItemsPerSecond),
                renderers.rates,
            ),
            ColumnDescriptor::new(format!("Clock{clock}"), source(Metric::RealTime), renderers.ns),
            ColumnDescriptor::new(format!("CPU{clock}"), source(Metric::CpuTime), renderers.ns),
            ColumnDescriptor::new(
                format!("{iter}Iterations"),
                source(Metric::Iterations),
                renderers.iters,
            ),
        ];

        let rows = results
            .iter()
            .map(|(record, metrics)| TableRow {
                id: record.id,
                cells: columns
                    .iter()
                    .map(|column| render_cell(column, record, metrics))
                    .collect(),
            })
            .collect::<Vec<_>>();

        Self {
            suffix,
            heading,
            searching: rows.len() > SEARCH_THRESHOLD,
            columns,
            rows,
        }
    }
}

fn render_cell(
    column: &ColumnDescriptor,
    record: &BenchmarkRecord,
    metrics: &NormalizedMetrics,
) -> TableCell {
    match column.source {
        ColumnSource::Name => TableCell {
            display: column.renderer.render_text(&record.name),
            sort: None,
        },
        source => {
            let value = source.value(record, metrics);
            TableCell {
                display: column.renderer.render_number(value),
                sort: value.filter(|v| v.is_finite()),
            }
        }
    }
}
