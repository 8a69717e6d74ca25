// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP benchmark viewer.
//!
//! Serves the benchmark page for `GET /?bm=<key>&dbg=1`, a load-all page
//! at `/all`, JSON view-models under `/api`, the widget assets under
//! `/static` and the suite and results directories of a local data root.

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

use axum::{extract::Request, middleware::Next, Router};
use bmxp_viewer::fetch::is_remote;
use bmxp_viewer::ViewerConfig;
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

pub use error::ApiError;
pub use models::AppState;

use middleware::{request_logging_middleware, RequestLoggingConfig};

/// Service name used in logs.
pub const SERVICE_NAME: &str = "bmxp-viewer";

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(routes::pages::routes())
        .merge(routes::api::routes())
        .nest_service("/static", ServeDir::new(&state.config.static_dir));

    if !is_remote(&state.config.data_root) {
        let root = Path::new(&state.config.data_root);
        for dir in data_dirs(&state.config) {
            app = app.nest_service(&format!("/{dir}"), ServeDir::new(root.join(&dir)));
        }
        let spec = state.config.spec_path.trim_start_matches('/');
        if !spec.is_empty() && !spec.contains('/') && !spec.starts_with('.') {
            app = app.route_service(&format!("/{spec}"), ServeFile::new(root.join(spec)));
        }
    }

    let logging = RequestLoggingConfig::new(SERVICE_NAME);
    app.layer(axum::middleware::from_fn(move |req: Request, next: Next| {
        request_logging_middleware(logging.clone(), req, next)
    }))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Top-level route segments owned by the viewer itself.
const RESERVED: [&str; 3] = ["static", "api", "all"];

/// Data root directories exposed over HTTP: the one holding the suite and
/// the results prefix. The rest of the data root stays private.
pub fn data_dirs(config: &ViewerConfig) -> Vec<String> {
    let spec_dir = config
        .spec_path
        .trim_start_matches('/')
        .rsplit_once('/')
        .map(|(dir, _)| dir)
        .unwrap_or("");
    let results_dir = if is_remote(&config.results_prefix) {
        ""
    } else {
        config.results_prefix.trim_matches('/')
    };

    let mut dirs: Vec<String> = Vec::new();
    let mut candidates = [spec_dir, results_dir];
    candidates.sort_by_key(|dir| dir.len());
    for dir in candidates {
        let top = dir.split('/').next().unwrap_or("");
        if dir.is_empty() || dir.split('/').any(|seg| seg.starts_with('.')) || RESERVED.contains(&top)
        {
            continue;
        }
        let covered = dirs
            .iter()
            .any(|kept| dir == kept || dir.starts_with(&format!("{kept}/")));
        if !covered {
            dirs.push(dir.to_string());
        }
    }
    dirs
}

/// Bind to the configured address and serve until interrupted.
pub async fn serve(config: ViewerConfig) -> anyhow::Result<()> {
    let fetcher = config.fetcher()?;
    let address = config.bind_address();
    let state = Arc::new(AppState::new(config, fetcher));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(address = %address, "Serving benchmark viewer on http://{address}/");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Viewer stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
