//! Markdown output generation.
//!
//! This module renders the tables of a [`PageView`] as a Markdown report,
//! for reading results without a browser.

use crate::page::{PageView, PanelBody};
use crate::table::TableView;
use std::fmt::Write;

/// Generate a markdown summary of every panel on the page.
pub fn generate_summary(page: &PageView) -> String {
    let mut output = String::new();

    writeln!(output, "# {}", page.title).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Generated: {}", chrono::Utc::now().to_rfc3339()).unwrap();
    writeln!(output).unwrap();

    let mut loaded = 0;
    for panel in page.panels() {
        writeln!(output, "## {}", panel.title).unwrap();
        writeln!(output).unwrap();
        match &panel.body {
            PanelBody::Loading => {
                writeln!(output, "_Loading..._").unwrap();
                writeln!(output).unwrap();
            }
            PanelBody::Failed { message } => {
                writeln!(output, "_Failed to load: {}_", message).unwrap();
                writeln!(output).unwrap();
            }
            PanelBody::Loaded(body) => {
                loaded += 1;
                for table in &body.tables {
                    write_table(&mut output, table);
                }
            }
        }
    }

    writeln!(output, "---").unwrap();
    writeln!(output, "Loaded benchmarks: {}", loaded).unwrap();

    output
}

fn write_table(output: &mut String, table: &TableView) {
    writeln!(output, "### {}", table.heading).unwrap();
    writeln!(output).unwrap();

    let titles: Vec<&str> = table.columns.iter().map(|c| c.title.as_str()).collect();
    writeln!(output, "| {} |", titles.join(" | ")).unwrap();
    let rule: Vec<&str> = table
        .columns
        .iter()
        .map(|c| if c.class_name == Some("text-right") { "---:" } else { "---" })
        .collect();
    writeln!(output, "|{}|", rule.join("|")).unwrap();

    for row in &table.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|c| c.display.replace('|', "\\|"))
            .collect();
        writeln!(output, "| {} |", cells.join(" | ")).unwrap();
    }
    writeln!(output).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{LoadedPanel, PanelView};
    use bmxp_core::{BenchmarkResults, NormalizedResults};

    #[test]
    fn test_summary_tables() {
        let text = r#"{"benchmarks": [
            {"name": "BM_a|b", "iterations": 2000000, "real_time": 5.0, "cpu_time": 5.0},
            {"name": "BM_c", "iterations": 1000000, "real_time": 10.0, "cpu_time": 10.0}
        ]}"#;
        let results = NormalizedResults::new(BenchmarkResults::parse(text).unwrap());
        let page = PageView::new(
            "suite",
            vec![],
            vec![
                PanelView {
                    key: "A".into(),
                    title: "A".into(),
                    body: PanelBody::Loaded(LoadedPanel::build(&results, None)),
                },
                PanelView {
                    key: "B".into(),
                    title: "B".into(),
                    body: PanelBody::Loading,
                },
            ],
            None,
        );

        let md = generate_summary(&page);
        assert!(md.starts_with("# Benchmarks: suite\n"));
        assert!(md.contains("### Results"));
        assert!(md.contains("### Normalized by column min"));
        assert!(md.contains("| ID | Name | MB/s | Mitems/s | Clock(ns) | CPU(ns) | MIterations |"));
        assert!(md.contains("|---|---|---:|---:|---:|---:|---:|"));
        assert!(md.contains("| 1 | BM_c | — | — | 2 | 2 | 1 |"));
        assert!(md.contains("BM_a\\|b"));
        assert!(md.contains("_Loading..._"));
        assert!(md.ends_with("Loaded benchmarks: 1\n"));
    }
}
