//! Presentation layer for benchmark results.
//!
//! This crate turns normalized results into view-models for the grid and
//! chart widgets, and renders whole pages as HTML or Markdown.
//!
//! # Quick Start
//!
//! ```
//! use bmxp_core::{BenchmarkResults, NormalizedResults};
//! use bmxp_report::{LoadedPanel, PageView, PanelBody, PanelView};
//!
//! let text = r#"{"benchmarks": [{"name": "BM_a", "iterations": 10, "real_time": 2.0}]}"#;
//! let results = NormalizedResults::new(BenchmarkResults::parse(text).unwrap());
//!
//! let panel = PanelView {
//!     key: "a".to_string(),
//!     title: "a".to_string(),
//!     body: PanelBody::Loaded(LoadedPanel::build(&results, None)),
//! };
//! let page = PageView::new("demo", vec![], vec![panel], None);
//! let html = bmxp_report::html::render_page(&page, "").unwrap();
//! assert!(html.contains("bm-results-a"));
//! ```
//!
//! # Modules
//!
//! - [`table`] - Table columns, renderers and rows
//! - [`chart`] - Bar chart series and tooltips
//! - [`page`] - Panels and the page view-model
//! - [`html`] - HTML page rendering
//! - [`markdown`] - Markdown report generation
//! - [`io`] - Writing reports to disk

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod chart;
pub mod html;
pub mod io;
pub mod markdown;
pub mod page;
pub mod table;

pub use chart::{ChartPoint, ChartSeries};
pub use io::ReportFormat;
pub use page::{
    CodeView, LinkStyle, LoadedPanel, PageSection, PageView, PanelBody, PanelView, TocEntry,
};
pub use table::{ColumnDescriptor, Renderer, TableCell, TableRow, TableView};
