//! I/O operations for rendered reports.
//!
//! This module writes a [`PageView`] to an output directory as HTML,
//! Markdown and the raw view-model JSON.

use crate::html;
use crate::markdown;
use crate::page::PageView;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default output directory path.
pub const OUTPUT_DIR: &str = "bmxp-report";

/// HTML page file name.
pub const HTML_FILE: &str = "index.html";

/// Markdown summary file name.
pub const SUMMARY_FILE: &str = "summary.md";

/// View-model dump file name.
pub const VIEW_FILE: &str = "view.json";

/// Which report files to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// HTML page only
    Html,
    /// Markdown summary only
    Markdown,
    /// Both
    Both,
}

impl ReportFormat {
    fn html(self) -> bool {
        matches!(self, Self::Html | Self::Both)
    }

    fn markdown(self) -> bool {
        matches!(self, Self::Markdown | Self::Both)
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "markdown" | "md" => Ok(Self::Markdown),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "unknown report format '{other}' (expected html, markdown or both)"
            )),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Html => "html",
            Self::Markdown => "markdown",
            Self::Both => "both",
        })
    }
}

/// Ensure the output directory exists.
pub fn ensure_output_dir(dir: impl AsRef<Path>) -> io::Result<()> {
    fs::create_dir_all(dir)
}

/// Write the HTML page. Asset links point at `asset_base`.
pub fn write_html(page: &PageView, path: impl AsRef<Path>, asset_base: &str) -> io::Result<()> {
    let html = html::render_page(page, asset_base)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    fs::write(path, html)
}

/// Write the Markdown summary.
pub fn write_summary(page: &PageView, path: impl AsRef<Path>) -> io::Result<()> {
    fs::write(path, markdown::generate_summary(page))
}

/// Write the view-model as pretty JSON.
pub fn write_view_json(page: &PageView, path: impl AsRef<Path>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(page)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    fs::write(path, json)
}

/// Write all requested outputs into `dir`, returning the written paths.
pub fn write_report(
    page: &PageView,
    dir: impl AsRef<Path>,
    format: ReportFormat,
    asset_base: &str,
) -> io::Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    ensure_output_dir(dir)?;
    let mut written = Vec::new();

    if format.html() {
        let path = dir.join(HTML_FILE);
        write_html(page, &path, asset_base)?;
        written.push(path);
    }

    if format.markdown() {
        let path = dir.join(SUMMARY_FILE);
        write_summary(page, &path)?;
        written.push(path);
    }

    let path = dir.join(VIEW_FILE);
    write_view_json(page, &path)?;
    written.push(path);

    tracing::info!(dir = %dir.display(), files = written.len(), "report written");
    Ok(written)
}
