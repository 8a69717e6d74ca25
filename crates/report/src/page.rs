//! Page view-model.
//!
//! A page is the suite title, a table of contents listing every benchmark,
//! and one panel per requested benchmark. Consecutive panels are separated
//! by exactly one divider.

use bmxp_core::normalize::NormalizedResults;
use serde::Serialize;
use std::path::Path;

use crate::chart::ChartSeries;
use crate::table::TableView;

/// Language assumed for source files with an unknown extension.
pub const DEFAULT_LANGUAGE: &str = "c++";

/// Table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Benchmark key
    pub key: String,
    /// Benchmark description
    pub desc: String,
    /// Link target
    pub href: String,
}

/// How table of contents links are formed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkStyle {
    /// `?bm=<key>`: selecting a benchmark reloads the page.
    #[default]
    Query,
    /// `#bm-results-<key>`: every panel is on the page already.
    Anchor,
    /// Standalone file: anchors for panels on the page, no link for the rest.
    Static,
}

/// Source code shown under a benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeView {
    /// Highlighter language name
    pub language: String,
    /// Source text, verbatim
    pub text: String,
}

impl CodeView {
    /// Create a code view, inferring the language from the source path.
    pub fn new(path: &str, text: impl Into<String>) -> Self {
        Self {
            language: language_for(path).to_string(),
            text: text.into(),
        }
    }
}

/// Highlighter language for a source path.
pub fn language_for(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("c") => "c",
        Some("cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" | "h") => "c++",
        Some("rs") => "rust",
        Some("py") => "python",
        Some("go") => "go",
        Some("java") => "java",
        Some("js") => "javascript",
        _ => DEFAULT_LANGUAGE,
    }
}

/// Everything shown for a loaded benchmark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedPanel {
    /// Absolute and normalized tables
    pub tables: Vec<TableView>,
    /// One chart per normalized metric
    pub charts: Vec<ChartSeries>,
    /// Source code, when the benchmark has a source document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeView>,
}

impl LoadedPanel {
    /// Build tables, charts and code from normalized results.
    pub fn build(results: &NormalizedResults, code: Option<CodeView>) -> Self {
        Self {
            tables: vec![TableView::pretty(results), TableView::normalized(results)],
            charts: ChartSeries::all(results),
            code,
        }
    }
}

/// Panel content by load state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PanelBody {
    /// Resources still in flight
    Loading,
    /// Everything arrived
    Loaded(LoadedPanel),
    /// A resource could not be fetched or parsed
    Failed {
        /// What went wrong
        message: String,
    },
}

/// One benchmark panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    /// Benchmark key
    pub key: String,
    /// Panel heading
    pub title: String,
    /// Content
    pub body: PanelBody,
}

/// A page section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageSection {
    /// A benchmark panel
    Panel(PanelView),
    /// Divider between panels
    Separator,
}

/// The whole page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    /// Page heading
    pub title: String,
    /// Table of contents
    pub toc: Vec<TocEntry>,
    /// Panels and separators
    pub sections: Vec<PageSection>,
    /// Debug log lines, when the debug pane is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_log: Option<Vec<String>>,
}

impl PageView {
    /// Assemble a page, placing one separator between consecutive panels.
    pub fn new(
        suite_name: &str,
        toc: Vec<TocEntry>,
        panels: impl IntoIterator<Item = PanelView>,
        debug_log: Option<Vec<String>>,
    ) -> Self {
        let mut sections = Vec::new();
        for panel in panels {
            if !sections.is_empty() {
                sections.push(PageSection::Separator);
            }
            sections.push(PageSection::Panel(panel));
        }
        Self {
            title: format!("Benchmarks: {suite_name}"),
            toc,
            sections,
            debug_log,
        }
    }

    /// Panels on the page, in order.
    pub fn panels(&self) -> impl Iterator<Item = &PanelView> {
        self.sections.iter().filter_map(|s| match s {
            PageSection::Panel(p) => Some(p),
            PageSection::Separator => None,
        })
    }

    /// Number of separators on the page.
    pub fn separator_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| matches!(s, PageSection::Separator))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(key: &str) -> PanelView {
        PanelView {
            key: key.to_string(),
            title: key.to_string(),
            body: PanelBody::Loading,
        }
    }

    #[test]
    fn test_separators_between_panels() {
        let page = PageView::new("s", vec![], vec![panel("A"), panel("B"), panel("C")], None);
        assert_eq!(page.sections.len(), 5);
        assert_eq!(page.separator_count(), 2);
        assert!(matches!(page.sections[1], PageSection::Separator));
        let keys: Vec<&str> = page.panels().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, ["A", "B", "C"]);
    }

    #[test]
    fn test_single_panel_has_no_separator() {
        let page = PageView::new("s", vec![], vec![panel("A")], None);
        assert_eq!(page.separator_count(), 0);
        assert_eq!(page.title, "Benchmarks: s");
    }

    #[test]
    fn test_language_inference() {
        assert_eq!(language_for("bm/sort.cpp"), "c++");
        assert_eq!(language_for("benches/sort.rs"), "rust");
        assert_eq!(language_for("a.C"), "c");
        assert_eq!(language_for("README"), DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_panel_body_serialization() {
        let failed = PanelBody::Failed {
            message: "boom".to_string(),
        };
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["state"], "failed");
        assert_eq!(value["message"], "boom");
    }
}
