// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

//! View controller.
//!
//! The controller owns the application state: the suite, the URL query
//! parameters and one panel per requested benchmark. Requesting a panel
//! starts independent fetches for its results and source documents; each
//! completion arrives as a [`ResourceEvent`] and is applied to its own
//! panel only, in whatever order the fetches finish.
//!
//! # Panel lifecycle
//!
//! ```text
//! Unloaded ──request──▶ Loading ──results (+ source)──▶ Loaded
//!                          │
//!                          └──fetch/parse failure──▶ Failed
//! ```
//!
//! There is no way back to `Unloaded`; requesting a panel that exists is a
//! no-op.

use bmxp_core::error::Result;
use bmxp_core::params::{BM_PARAM, DEBUG_PARAM};
use bmxp_core::{
    BenchmarkResults, BenchmarkSuite, FetchError, MissingKeyError, NormalizedResults, QueryParams,
};
use bmxp_report::{CodeView, LinkStyle, LoadedPanel, PageView, PanelBody, PanelView, TocEntry};
use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::ViewerConfig;
use crate::fetch::Fetcher;

/// `bm` value that loads every benchmark.
pub const LOAD_ALL: &str = "all";

/// Which resource of a benchmark an event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// The results document
    Results,
    /// The source document
    Source,
}

/// Completion of one fetch.
#[derive(Debug, Clone)]
pub struct ResourceEvent {
    /// Benchmark the resource belongs to
    pub key: String,
    /// Which resource
    pub kind: ResourceKind,
    /// Path that was fetched
    pub path: String,
    /// Fetched text or failure
    pub outcome: std::result::Result<String, FetchError>,
}

/// State of the source document of a loading panel.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceState {
    /// The benchmark has no source document.
    NotRequested,
    /// Fetch in flight.
    Waiting,
    /// Arrived.
    Ready(CodeView),
    /// Could not be fetched; the panel loads without code.
    Unavailable,
}

/// State of a requested panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    /// At least one resource is still in flight.
    Loading {
        /// Normalized results, once arrived
        results: Option<NormalizedResults>,
        /// Source document state
        source: SourceState,
    },
    /// All resources arrived.
    Loaded {
        /// Normalized results
        results: NormalizedResults,
        /// Source code, if any
        code: Option<CodeView>,
    },
    /// The results could not be fetched or parsed.
    Failed {
        /// What went wrong
        message: String,
    },
}

/// Coarse panel phase, including panels that were never requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    /// Not requested
    Unloaded,
    /// Resources in flight
    Loading,
    /// Rendered
    Loaded,
    /// Failed
    Failed,
}

impl PanelState {
    /// Coarse phase.
    pub fn phase(&self) -> PanelPhase {
        match self {
            Self::Loading { .. } => PanelPhase::Loading,
            Self::Loaded { .. } => PanelPhase::Loaded,
            Self::Failed { .. } => PanelPhase::Failed,
        }
    }
}

/// Application state held by the controller.
#[derive(Debug)]
pub struct AppState {
    /// The loaded suite
    pub suite: BenchmarkSuite,
    /// Query parameters of the current view
    pub params: QueryParams,
    /// Requested panels, keyed by benchmark
    pub panels: IndexMap<String, PanelState>,
    /// Debug log lines, when verbose
    pub debug_log: Option<Vec<String>>,
    /// Whether every benchmark was requested
    pub load_all: bool,
}

/// Drives loading and rendering of benchmark panels.
pub struct ViewController {
    state: AppState,
    fetcher: Arc<dyn Fetcher>,
    config: ViewerConfig,
    events_tx: mpsc::UnboundedSender<ResourceEvent>,
    events_rx: mpsc::UnboundedReceiver<ResourceEvent>,
    in_flight: usize,
}

impl std::fmt::Debug for ViewController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewController")
            .field("state", &self.state)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl ViewController {
    /// Fetch and parse the suite, then load the benchmark named by the `bm`
    /// query parameter, if any.
    ///
    /// `bm=all` loads every benchmark unless the suite defines a benchmark
    /// called `all`. An unknown key fails with [`MissingKeyError`].
    pub async fn initialize(
        fetcher: Arc<dyn Fetcher>,
        config: ViewerConfig,
        query: &str,
    ) -> Result<Self> {
        let params = QueryParams::parse(query);
        let verbose = config.debug || params.is_truthy(DEBUG_PARAM);

        let spec_path = config.spec_path.clone();
        debug!(path = %spec_path, "requesting suite specification");
        let text = fetcher.fetch_text(&spec_path).await?;
        let suite = BenchmarkSuite::parse(&text)?;
        info!(suite = %suite.name, benchmarks = suite.len(), "suite loaded");

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut controller = Self {
            state: AppState {
                suite,
                params,
                panels: IndexMap::new(),
                debug_log: verbose.then(Vec::new),
                load_all: false,
            },
            fetcher,
            config,
            events_tx,
            events_rx,
            in_flight: 0,
        };
        controller.log(format!("{spec_path}: got response! {}B", text.len()));

        let selected = controller
            .state
            .params
            .get(BM_PARAM)
            .filter(|key| !key.is_empty())
            .map(str::to_string);
        if let Some(key) = selected {
            if key == LOAD_ALL && !controller.state.suite.contains(&key) {
                controller.load_all();
            } else {
                controller.log(format!("loading BM from URL: {key}"));
                controller.request(&key)?;
            }
        }
        Ok(controller)
    }

    /// Application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The suite.
    pub fn suite(&self) -> &BenchmarkSuite {
        &self.state.suite
    }

    /// Number of fetches whose events have not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Phase of the panel for `key`.
    pub fn phase(&self, key: &str) -> PanelPhase {
        self.state
            .panels
            .get(key)
            .map_or(PanelPhase::Unloaded, PanelState::phase)
    }

    /// Request the panel for `key`, starting its fetches.
    ///
    /// Returns `Ok(false)` without doing anything when the panel already
    /// exists.
    pub fn request(&mut self, key: &str) -> std::result::Result<bool, MissingKeyError> {
        if self.state.panels.contains_key(key) {
            debug!(key, "panel already requested");
            return Ok(false);
        }
        let spec = self.state.suite.get(key)?.clone();

        let source = if spec.has_source() {
            self.spawn_fetch(key, ResourceKind::Source, spec.src.clone());
            SourceState::Waiting
        } else {
            SourceState::NotRequested
        };
        let results_path = self.config.results_path(&spec.results);
        self.spawn_fetch(key, ResourceKind::Results, results_path);

        self.state.panels.insert(
            key.to_string(),
            PanelState::Loading {
                results: None,
                source,
            },
        );
        info!(key, "panel loading");
        Ok(true)
    }

    /// Request every benchmark, in suite order. The `bm` parameter is left
    /// untouched.
    pub fn load_all(&mut self) {
        self.state.load_all = true;
        let keys: Vec<String> = self.state.suite.keys().map(str::to_string).collect();
        for key in keys {
            // keys come from the suite itself
            let _ = self.request(&key);
        }
    }

    fn spawn_fetch(&mut self, key: &str, kind: ResourceKind, path: String) {
        self.log(format!("{path}: requesting..."));
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.events_tx.clone();
        let key = key.to_string();
        self.in_flight += 1;

        tokio::spawn(async move {
            let outcome = fetcher.fetch_text(&path).await;
            // the receiver lives as long as the controller
            let _ = tx.send(ResourceEvent {
                key,
                kind,
                path,
                outcome,
            });
        });
    }

    /// Apply one completed fetch to its panel.
    pub fn apply(&mut self, event: ResourceEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let ResourceEvent {
            key,
            kind,
            path,
            outcome,
        } = event;

        let outcome = match outcome {
            Ok(text) => {
                self.log(format!("{path}: got response! {}B", text.len()));
                Ok(text)
            }
            Err(err) => {
                warn!(key = %key, error = %err, "fetch failed");
                self.log(format!("{path}: {err}"));
                Err(err)
            }
        };

        let Some(panel) = self.state.panels.get_mut(&key) else {
            warn!(key = %key, "event for unknown panel");
            return;
        };
        let PanelState::Loading { results, source } = panel else {
            debug!(key = %key, "panel already settled");
            return;
        };

        let failure = match (kind, outcome) {
            (ResourceKind::Results, Ok(text)) => match BenchmarkResults::parse(&text) {
                Ok(parsed) => {
                    *results = Some(NormalizedResults::new(parsed));
                    None
                }
                Err(err) => Some(format!("{path}: {err}")),
            },
            (ResourceKind::Results, Err(err)) => Some(err.to_string()),
            (ResourceKind::Source, Ok(text)) => {
                *source = SourceState::Ready(CodeView::new(&path, text));
                None
            }
            (ResourceKind::Source, Err(_)) => {
                *source = SourceState::Unavailable;
                None
            }
        };
        if let Some(message) = failure {
            *panel = PanelState::Failed { message };
        }

        Self::settle(panel);
        match panel.phase() {
            PanelPhase::Loaded => info!(key = %key, "panel loaded"),
            PanelPhase::Failed => warn!(key = %key, "panel failed"),
            _ => {}
        }
    }

    /// Move a loading panel to `Loaded` once nothing is outstanding.
    fn settle(panel: &mut PanelState) {
        let PanelState::Loading { results, source } = panel else {
            return;
        };
        if results.is_none() || *source == SourceState::Waiting {
            return;
        }
        let code = match std::mem::replace(source, SourceState::NotRequested) {
            SourceState::Ready(code) => Some(code),
            _ => None,
        };
        if let Some(results) = results.take() {
            *panel = PanelState::Loaded { results, code };
        }
    }

    /// Wait for the next completed fetch, without applying it. Returns
    /// `None` when nothing is in flight.
    pub async fn next_event(&mut self) -> Option<ResourceEvent> {
        if self.in_flight == 0 {
            return None;
        }
        self.events_rx.recv().await
    }

    /// Apply completed fetches until nothing is in flight.
    pub async fn drain(&mut self) {
        while let Some(event) = self.next_event().await {
            self.apply(event);
        }
    }

    /// Like [`drain`](Self::drain), but gives up after `limit`. Returns
    /// whether everything settled; panels still waiting stay loading.
    pub async fn drain_for(&mut self, limit: Duration) -> bool {
        let finished = tokio::time::timeout(limit, self.drain()).await.is_ok();
        if !finished {
            warn!(in_flight = self.in_flight, "resources still loading");
        }
        finished
    }

    /// Query string selecting `key` (the table of contents link target).
    pub fn select_url(&self, key: &str) -> String {
        let mut params = self.state.params.clone();
        params.set(BM_PARAM, key);
        format!("?{}", params.to_query_string())
    }

    /// View-model of one requested panel.
    pub fn panel_view(&self, key: &str) -> Option<PanelView> {
        let state = self.state.panels.get(key)?;
        let body = match state {
            PanelState::Loading { .. } => PanelBody::Loading,
            PanelState::Loaded { results, code } => {
                PanelBody::Loaded(LoadedPanel::build(results, code.clone()))
            }
            PanelState::Failed { message } => PanelBody::Failed {
                message: message.clone(),
            },
        };
        Some(PanelView {
            key: key.to_string(),
            title: key.to_string(),
            body,
        })
    }

    /// View-model of the whole page. Panels appear in suite order.
    pub fn page(&self, links: LinkStyle) -> PageView {
        let toc = self
            .state
            .suite
            .benchmarks
            .iter()
            .map(|(key, spec)| TocEntry {
                key: key.clone(),
                desc: spec.desc.clone(),
                href: match links {
                    LinkStyle::Query => self.select_url(key),
                    LinkStyle::Anchor => format!("#{}", bmxp_report::html::panel_id(key)),
                    LinkStyle::Static if self.state.panels.contains_key(key) => {
                        format!("#{}", bmxp_report::html::panel_id(key))
                    }
                    LinkStyle::Static => String::new(),
                },
            })
            .collect();

        let panels = self
            .state
            .suite
            .keys()
            .filter_map(|key| self.panel_view(key))
            .collect::<Vec<_>>();

        PageView::new(
            &self.state.suite.name,
            toc,
            panels,
            self.state.debug_log.clone(),
        )
    }

    fn log(&mut self, message: String) {
        debug!("{message}");
        if let Some(log) = self.state.debug_log.as_mut() {
            log.push(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{MemoryFetcher, MockFetcher};

    const SUITE: &str = r#"{
        "name": "demo",
        "benchmarks": {
            "A": {"desc": "first", "results": "a.json", "src": "a.cpp"},
            "B": {"desc": "second", "results": "b.json", "src": ""}
        }
    }"#;

    const RESULTS: &str = r#"{"benchmarks": [
        {"name": "x", "iterations": 100, "real_time": 2.0, "cpu_time": 2.0},
        {"name": "y", "iterations": 200, "real_time": 1.0, "cpu_time": 1.0}
    ]}"#;

    fn fetcher() -> Arc<dyn Fetcher> {
        Arc::new(
            MemoryFetcher::new()
                .with("bm/specs.json", SUITE)
                .with("bm/a.json", RESULTS)
                .with("bm/b.json", RESULTS)
                .with("a.cpp", "int main() {}"),
        )
    }

    fn event(key: &str, kind: ResourceKind, path: &str, text: &str) -> ResourceEvent {
        ResourceEvent {
            key: key.to_string(),
            kind,
            path: path.to_string(),
            outcome: Ok(text.to_string()),
        }
    }

    #[tokio::test]
    async fn test_no_bm_loads_nothing() {
        let ctl = ViewController::initialize(fetcher(), ViewerConfig::default(), "")
            .await
            .unwrap();
        assert!(ctl.state().panels.is_empty());
        assert_eq!(ctl.in_flight(), 0);
        assert_eq!(ctl.page(LinkStyle::Query).toc.len(), 2);
    }

    #[tokio::test]
    async fn test_bm_param_loads_one_panel() {
        let mut ctl = ViewController::initialize(fetcher(), ViewerConfig::default(), "?bm=B")
            .await
            .unwrap();
        assert_eq!(ctl.phase("B"), PanelPhase::Loading);
        ctl.drain().await;
        assert_eq!(ctl.phase("A"), PanelPhase::Unloaded);
        assert_eq!(ctl.phase("B"), PanelPhase::Loaded);
    }

    #[tokio::test]
    async fn test_static_links_only_target_rendered_panels() {
        let mut ctl = ViewController::initialize(fetcher(), ViewerConfig::default(), "bm=B")
            .await
            .unwrap();
        ctl.drain().await;

        let page = ctl.page(LinkStyle::Static);
        assert_eq!(page.toc[0].href, "");
        assert_eq!(page.toc[1].href, "#bm-results-B");

        let page = ctl.page(LinkStyle::Query);
        assert_eq!(page.toc[0].href, "?bm=A");
    }

    #[tokio::test]
    async fn test_unknown_bm_is_missing_key() {
        let err = ViewController::initialize(fetcher(), ViewerConfig::default(), "bm=Z")
            .await
            .unwrap_err();
        assert!(matches!(err, bmxp_core::ViewerError::MissingKey(_)));
    }

    #[tokio::test]
    async fn test_request_twice_is_noop() {
        let mut ctl = ViewController::initialize(fetcher(), ViewerConfig::default(), "bm=A")
            .await
            .unwrap();
        assert_eq!(ctl.in_flight(), 2);
        assert!(!ctl.request("A").unwrap());
        assert_eq!(ctl.in_flight(), 2);
        ctl.drain().await;
        assert!(!ctl.request("A").unwrap());
        assert_eq!(ctl.phase("A"), PanelPhase::Loaded);
    }

    #[tokio::test]
    async fn test_events_in_any_order() {
        for source_first in [true, false] {
            let mut ctl = ViewController::initialize(fetcher(), ViewerConfig::default(), "bm=A")
                .await
                .unwrap();
            // discard the spawned fetches and feed events by hand
            let _ = ctl.next_event().await;
            let _ = ctl.next_event().await;
            ctl.in_flight = 2;

            let results = event("A", ResourceKind::Results, "bm/a.json", RESULTS);
            let source = event("A", ResourceKind::Source, "a.cpp", "int main() {}");
            let (first, second) = if source_first {
                (source, results)
            } else {
                (results, source)
            };

            ctl.apply(first);
            assert_eq!(ctl.phase("A"), PanelPhase::Loading);
            ctl.apply(second);
            assert_eq!(ctl.phase("A"), PanelPhase::Loaded);

            let Some(PanelState::Loaded { code, results }) = ctl.state().panels.get("A") else {
                panic!("panel not loaded");
            };
            assert_eq!(code.as_ref().unwrap().language, "c++");
            assert_eq!(results.len(), 2);
        }
    }

    #[tokio::test]
    async fn test_load_all_keeps_suite_order_and_columns_separate() {
        let fetcher: Arc<dyn Fetcher> = Arc::new(
            MemoryFetcher::new()
                .with("bm/specs.json", SUITE)
                .with("bm/a.json", RESULTS)
                .with(
                    "bm/b.json",
                    r#"{"benchmarks": [{"name": "z", "iterations": 7, "real_time": 3.0}]}"#,
                )
                .with("a.cpp", "int main() {}"),
        );
        let mut ctl = ViewController::initialize(fetcher, ViewerConfig::default(), "bm=B")
            .await
            .unwrap();
        ctl.drain().await;
        let page = ctl.page(LinkStyle::Query);
        assert_eq!(page.panels().count(), 1);
        assert_eq!(page.separator_count(), 0);

        ctl.load_all();
        ctl.drain().await;
        let page = ctl.page(LinkStyle::Query);
        let keys: Vec<&str> = page.panels().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, ["A", "B"]);
        assert_eq!(page.separator_count(), 1);
        assert_eq!(ctl.state().params.get(BM_PARAM), Some("B"));

        let Some(PanelState::Loaded { results, .. }) = ctl.state().panels.get("B") else {
            panic!("B not loaded");
        };
        assert_eq!(results.normalized[0].iterations, 1.0);
        assert_eq!(results.normalized[0].real_time, 1.0);
    }

    #[tokio::test]
    async fn test_bm_all_loads_everything() {
        let mut ctl = ViewController::initialize(fetcher(), ViewerConfig::default(), "bm=all")
            .await
            .unwrap();
        ctl.drain().await;
        assert!(ctl.state().load_all);
        assert_eq!(ctl.phase("A"), PanelPhase::Loaded);
        assert_eq!(ctl.phase("B"), PanelPhase::Loaded);
    }

    #[tokio::test]
    async fn test_results_fetch_failure_marks_panel_failed() {
        let mut mock = MockFetcher::new();
        mock.expect_fetch_text()
            .withf(|path| path == "bm/specs.json")
            .returning(|_| Ok(SUITE.to_string()));
        mock.expect_fetch_text()
            .withf(|path| path == "bm/b.json")
            .returning(|path| {
                Err(FetchError::Status {
                    path: path.to_string(),
                    status: 500,
                })
            });

        let mut ctl = ViewController::initialize(Arc::new(mock), ViewerConfig::default(), "bm=B")
            .await
            .unwrap();
        ctl.drain().await;
        assert_eq!(ctl.phase("B"), PanelPhase::Failed);
        let page = ctl.page(LinkStyle::Query);
        let panel = page.panels().next().unwrap();
        assert!(matches!(&panel.body, PanelBody::Failed { message } if message.contains("500")));
    }

    #[tokio::test]
    async fn test_malformed_results_marks_panel_failed() {
        let fetcher: Arc<dyn Fetcher> = Arc::new(
            MemoryFetcher::new()
                .with("bm/specs.json", SUITE)
                .with("bm/b.json", "{not json"),
        );
        let mut ctl = ViewController::initialize(fetcher, ViewerConfig::default(), "bm=B")
            .await
            .unwrap();
        ctl.drain().await;
        assert_eq!(ctl.phase("B"), PanelPhase::Failed);
    }

    #[tokio::test]
    async fn test_missing_source_still_loads() {
        let fetcher: Arc<dyn Fetcher> = Arc::new(
            MemoryFetcher::new()
                .with("bm/specs.json", SUITE)
                .with("bm/a.json", RESULTS),
        );
        let mut ctl = ViewController::initialize(fetcher, ViewerConfig::default(), "bm=A")
            .await
            .unwrap();
        ctl.drain().await;
        let Some(PanelState::Loaded { code, .. }) = ctl.state().panels.get("A") else {
            panic!("A not loaded");
        };
        assert!(code.is_none());
    }

    #[tokio::test]
    async fn test_debug_log_only_when_requested() {
        let mut ctl = ViewController::initialize(fetcher(), ViewerConfig::default(), "bm=B&dbg=1")
            .await
            .unwrap();
        ctl.drain().await;
        let log = ctl.state().debug_log.clone().unwrap();
        assert!(log[0].starts_with("bm/specs.json: got response!"));
        assert!(log.contains(&"bm/b.json: requesting...".to_string()));
        assert!(log.iter().any(|l| l.starts_with("bm/b.json: got response!")));

        let ctl = ViewController::initialize(fetcher(), ViewerConfig::default(), "bm=B")
            .await
            .unwrap();
        assert!(ctl.state().debug_log.is_none());
    }

    #[tokio::test]
    async fn test_select_url_keeps_other_params() {
        let ctl = ViewController::initialize(fetcher(), ViewerConfig::default(), "dbg=1")
            .await
            .unwrap();
        assert_eq!(ctl.select_url("A"), "?dbg=1&bm=A");
        let page = ctl.page(LinkStyle::Anchor);
        assert_eq!(page.toc[1].href, "#bm-results-B");
    }
}
