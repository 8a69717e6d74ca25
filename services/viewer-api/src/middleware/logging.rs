// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

//! Request logging middleware for the viewer API.
//!
//! Logs one line per request with the selected benchmark, the response
//! status and the elapsed time, and stamps the elapsed time on the
//! response.

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use bmxp_core::params::BM_PARAM;
use bmxp_core::QueryParams;
use std::time::Instant;
use tracing::{info, warn};

/// Response header carrying the handling time in milliseconds.
pub const X_RESPONSE_TIME_MS: &str = "x-response-time-ms";

/// Configuration for the request logging middleware.
#[derive(Debug, Clone)]
pub struct RequestLoggingConfig {
    /// Service name recorded on every log line.
    pub service: String,
    /// Requests slower than this are logged as warnings.
    pub slow_request_ms: u128,
}

impl RequestLoggingConfig {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            slow_request_ms: 5_000,
        }
    }
}

/// Middleware function that logs each request and its outcome.
pub async fn request_logging_middleware(
    config: RequestLoggingConfig,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let bm = req
        .uri()
        .query()
        .map(QueryParams::parse)
        .and_then(|params| params.get(BM_PARAM).map(str::to_string))
        .unwrap_or_default();

    let started = Instant::now();
    let mut response = next.run(req).await;
    let elapsed = started.elapsed().as_millis();

    if let Ok(value) = HeaderValue::from_str(&elapsed.to_string()) {
        response.headers_mut().insert(X_RESPONSE_TIME_MS, value);
    }

    let status = response.status().as_u16();
    if elapsed >= config.slow_request_ms {
        warn!(
            service = %config.service,
            %method,
            %path,
            bm = %bm,
            status,
            elapsed_ms = elapsed as u64,
            "Slow request"
        );
    } else {
        info!(
            service = %config.service,
            %method,
            %path,
            bm = %bm,
            status,
            elapsed_ms = elapsed as u64,
            "Request handled"
        );
    }
    response
}
