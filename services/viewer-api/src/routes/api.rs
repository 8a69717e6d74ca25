// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use bmxp_report::{LoadedPanel, PanelBody};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::models::{AppState, SuiteResponse};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/suite", get(get_suite))
        .route("/api/benchmarks/:key", get(get_benchmark))
}

async fn get_suite(State(state): State<Arc<AppState>>) -> Result<Json<SuiteResponse>, ApiError> {
    let controller = state.controller("").await?;
    Ok(Json(SuiteResponse::from(controller.suite())))
}

async fn get_benchmark(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<LoadedPanel>, ApiError> {
    let mut controller = state.controller("").await?;
    controller
        .request(&key)
        .map_err(|_| ApiError::missing_benchmark(&key))?;
    controller.drain_for(state.settle_timeout()).await;

    let panel = controller
        .panel_view(&key)
        .ok_or_else(|| ApiError::missing_benchmark(&key))?;
    match panel.body {
        PanelBody::Loaded(loaded) => {
            info!(key = %key, records = loaded.tables[0].rows.len(), "Benchmark served");
            Ok(Json(loaded))
        }
        PanelBody::Failed { message } => Err(ApiError::load_failed(message)),
        PanelBody::Loading => Err(ApiError::still_loading(&key)),
    }
}
