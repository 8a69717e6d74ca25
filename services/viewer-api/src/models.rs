// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

use bmxp_core::{BenchmarkSuite, ViewerError};
use bmxp_viewer::{Fetcher, ViewController, ViewerConfig};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Shared state of the viewer service.
pub struct AppState {
    pub config: ViewerConfig,
    pub fetcher: Arc<dyn Fetcher>,
}

impl AppState {
    pub fn new(config: ViewerConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    /// A fresh view controller for one request. Every request reloads the
    /// suite, so edits to the data root show up without a restart.
    pub async fn controller(&self, query: &str) -> Result<ViewController, ViewerError> {
        ViewController::initialize(Arc::clone(&self.fetcher), self.config.clone(), query).await
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.config.settle_timeout_ms)
    }
}

#[derive(Debug, Serialize)]
pub struct SuiteEntry {
    pub key: String,
    pub name: String,
    pub desc: String,
    pub results: String,
    pub src: String,
}

#[derive(Debug, Serialize)]
pub struct SuiteResponse {
    pub name: String,
    pub benchmarks: Vec<SuiteEntry>,
}

impl From<&BenchmarkSuite> for SuiteResponse {
    fn from(suite: &BenchmarkSuite) -> Self {
        Self {
            name: suite.name.clone(),
            benchmarks: suite
                .benchmarks
                .iter()
                .map(|(key, spec)| SuiteEntry {
                    key: key.clone(),
                    name: spec.name.clone(),
                    desc: spec.desc.clone(),
                    results: spec.results.clone(),
                    src: spec.src.clone(),
                })
                .collect(),
        }
    }
}
