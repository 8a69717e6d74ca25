// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error responses of the viewer API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bmxp_core::ViewerError;
use bmxp_report::html::RenderError;
use chrono::Utc;
use serde_json::json;
use tracing::warn;

/// Error returned by route handlers, rendered as a JSON body.
#[derive(Debug, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn missing_benchmark(key: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "MISSING_BENCHMARK",
            format!("Benchmark '{key}' does not exist in the suite"),
        )
    }

    pub fn load_failed(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "LOAD_FAILED", message)
    }

    pub fn still_loading(key: &str) -> Self {
        Self::new(
            StatusCode::GATEWAY_TIMEOUT,
            "STILL_LOADING",
            format!("Benchmark '{key}' is still loading"),
        )
    }
}

impl From<ViewerError> for ApiError {
    fn from(err: ViewerError) -> Self {
        match err {
            ViewerError::MissingKey(e) => Self::missing_benchmark(&e.key),
            ViewerError::Fetch(e) => Self::new(StatusCode::BAD_GATEWAY, "FETCH_FAILED", e.to_string()),
            ViewerError::Parse(e) => Self::new(StatusCode::BAD_GATEWAY, "PARSE_FAILED", e.to_string()),
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "RENDER_FAILED", err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(code = self.code, status = %self.status, message = %self.message, "request failed");
        let body = Json(json!({
            "error": {
                "code": self.code,
                "message": self.message,
            },
            "meta": {
                "timestamp": Utc::now().to_rfc3339(),
            }
        }));
        (self.status, body).into_response()
    }
}
