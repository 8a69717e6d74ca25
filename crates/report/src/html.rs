//! HTML rendering of a [`PageView`].
//!
//! The page, panel and table markup live in minijinja templates under
//! `templates/`, compiled into the crate. Templates ending in `.html` are
//! auto-escaped with [`escape_html`]. View-models the widgets read at
//! runtime are embedded as JSON through the `tojson` filter; the grid
//! (DataTables), chart (Chart.js) and highlighter (highlight.js) widgets are
//! wired by a short script at the end of the document.

use bmxp_core::html::escape_html;
use minijinja::value::Value;
use minijinja::{AutoEscape, Environment, Error, ErrorKind, Output, State};
use serde::Serialize;
use std::sync::OnceLock;

use crate::page::{PageSection, PageView, PanelView};

/// Error raised while rendering a page.
pub type RenderError = Error;

/// Widget assets the page loads: (download URL, local file name).
pub const ASSETS: &[(&str, &str)] = &[
    ("https://code.jquery.com/jquery-3.3.1.min.js", "jquery-3.3.1.min.js"),
    (
        "https://cdn.datatables.net/1.10.20/js/jquery.dataTables.min.js",
        "jquery.dataTables.min.js",
    ),
    (
        "https://cdn.datatables.net/1.10.20/css/jquery.dataTables.min.css",
        "jquery.dataTables.min.css",
    ),
    ("https://www.chartjs.org/dist/2.9.1/Chart.min.js", "Chart.min.js"),
    (
        "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/10.3.2/styles/github.min.css",
        "highlight.github.min.css",
    ),
    (
        "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/10.3.2/highlight.min.js",
        "highlight.min.js",
    ),
];

const PAGE_TEMPLATE: &str = "page.html";

const TEMPLATES: &[(&str, &str)] = &[
    (PAGE_TEMPLATE, include_str!("../templates/page.html")),
    ("panel.html", include_str!("../templates/panel.html")),
    ("table.html", include_str!("../templates/table.html")),
];

#[derive(Serialize)]
struct AssetLink {
    href: String,
    stylesheet: bool,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SectionContext<'a> {
    Panel { id: String, panel: &'a PanelView },
    Separator,
}

#[derive(Serialize)]
struct PageContext<'a> {
    page: &'a PageView,
    assets: Vec<AssetLink>,
    sections: Vec<SectionContext<'a>>,
}

fn environment() -> &'static Environment<'static> {
    static ENV: OnceLock<Environment<'static>> = OnceLock::new();
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|name| {
            if name.ends_with(".html") {
                AutoEscape::Html
            } else {
                AutoEscape::None
            }
        });
        env.set_formatter(escape_formatter);
        env.add_filter("tojson", tojson);
        for (name, source) in TEMPLATES {
            // the templates are compiled in; a syntax error surfaces on render
            let _ = env.add_template(name, source);
        }
        env
    })
}

/// Output values through [`escape_html`] unless auto-escaping is off or
/// the value is marked safe.
fn escape_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> Result<(), Error> {
    if value.is_undefined() || value.is_none() {
        return Ok(());
    }
    let text = value.to_string();
    let written = if matches!(state.auto_escape(), AutoEscape::None) || value.is_safe() {
        out.write_str(&text)
    } else {
        out.write_str(&escape_html(&text))
    };
    written.map_err(|_| Error::new(ErrorKind::WriteFailure, "failed to write template output"))
}

#[allow(clippy::needless_pass_by_value)]
fn tojson(value: Value) -> Result<Value, Error> {
    let json = serde_json::to_string(&value).map_err(|err| {
        Error::new(ErrorKind::InvalidOperation, "cannot serialize to JSON").with_source(err)
    })?;
    Ok(Value::from_safe_string(script_safe(&json)))
}

/// Make JSON safe to embed in a `<script>` element. Markup-significant
/// characters become `\u` escapes, which keeps the text valid JSON.
fn script_safe(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\'' => out.push_str("\\u0027"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a complete HTML document. `asset_base` is prepended to the
/// widget asset file names (for example `""` or `"static/"`).
pub fn render_page(page: &PageView, asset_base: &str) -> Result<String, RenderError> {
    let assets = ASSETS
        .iter()
        .map(|(_, file)| AssetLink {
            href: format!("{asset_base}{file}"),
            stylesheet: file.ends_with(".css"),
        })
        .collect();
    let sections = page
        .sections
        .iter()
        .map(|section| match section {
            PageSection::Panel(panel) => SectionContext::Panel {
                id: panel_id(&panel.key),
                panel,
            },
            PageSection::Separator => SectionContext::Separator,
        })
        .collect();

    environment().get_template(PAGE_TEMPLATE)?.render(PageContext {
        page,
        assets,
        sections,
    })
}

/// Element id prefix of a panel.
pub fn panel_id(key: &str) -> String {
    format!("bm-results-{key}")
}
