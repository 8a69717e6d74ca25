// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{RawQuery, State},
    response::Html,
    routing::get,
    Router,
};
use bmxp_core::params::BM_PARAM;
use bmxp_core::QueryParams;
use bmxp_report::{html, LinkStyle};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::models::AppState;

/// Where rendered pages load the widget assets from.
pub const ASSET_BASE: &str = "/static/";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index_page))
        .route("/all", get(all_page))
}

/// The page for `?bm=<key>&dbg=1`, rendered once the requested panels settle.
async fn index_page(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, ApiError> {
    let mut controller = state.controller(query.as_deref().unwrap_or("")).await?;
    controller.drain_for(state.settle_timeout()).await;

    let page = controller.page(LinkStyle::Query);
    info!(panels = page.panels().count(), "Page rendered");
    Ok(Html(html::render_page(&page, ASSET_BASE)?))
}

/// Every benchmark of the suite on one page.
async fn all_page(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, ApiError> {
    let mut params = QueryParams::parse(query.as_deref().unwrap_or(""));
    params.remove(BM_PARAM);

    let mut controller = state.controller(&params.to_query_string()).await?;
    controller.load_all();
    controller.drain_for(state.settle_timeout()).await;

    let page = controller.page(LinkStyle::Anchor);
    info!(panels = page.panels().count(), "Load-all page rendered");
    Ok(Html(html::render_page(&page, ASSET_BASE)?))
}
