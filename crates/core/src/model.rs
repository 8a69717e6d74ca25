// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

//! Suite specification and results documents.
//!
//! The suite specification lists benchmark groups by key:
//!
//! ```text
//! { "name": "...", "benchmarks": { "<key>": { "desc": "...", "results": "...", "src": "..." } } }
//! ```
//!
//! Each group points at a results document in google-benchmark's JSON
//! output format and, optionally, at the source file that produced it.

use crate::error::{MissingKeyError, ParseError};
use crate::html::decode_html_entities;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A named collection of benchmark groups, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSuite {
    /// Suite title.
    #[serde(default)]
    pub name: String,
    /// Benchmark groups keyed by identifier.
    #[serde(default)]
    pub benchmarks: IndexMap<String, BenchmarkSpec>,
}

/// One benchmark group of the suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSpec {
    /// Display name; back-filled from the suite key when absent.
    #[serde(default)]
    pub name: String,
    /// Human description.
    #[serde(default)]
    pub desc: String,
    /// Path of the results document.
    pub results: String,
    /// Path of the source document; empty when there is none.
    #[serde(default)]
    pub src: String,
}

impl BenchmarkSpec {
    /// Whether a source document should be fetched.
    pub fn has_source(&self) -> bool {
        !self.src.trim().is_empty()
    }
}

impl BenchmarkSuite {
    /// Parse a suite specification document.
    ///
    /// Every entry without a `name` gets its key as name.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut suite: Self =
            serde_json::from_str(text).map_err(|e| ParseError::new("suite specification", e))?;
        for (key, spec) in suite.benchmarks.iter_mut() {
            if spec.name.is_empty() {
                spec.name = key.clone();
            }
        }
        Ok(suite)
    }

    /// Look up a benchmark group by key.
    pub fn get(&self, key: &str) -> Result<&BenchmarkSpec, MissingKeyError> {
        self.benchmarks
            .get(key)
            .ok_or_else(|| MissingKeyError::new(key))
    }

    /// Whether the suite defines `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.benchmarks.contains_key(key)
    }

    /// Keys in suite order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.benchmarks.keys().map(String::as_str)
    }

    /// Number of benchmark groups.
    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    /// Whether the suite has no groups.
    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }
}

/// The numeric columns of a benchmark record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Number of iterations run
    Iterations,
    /// Wall clock time per iteration (ns)
    RealTime,
    /// CPU time per iteration (ns)
    CpuTime,
    /// Throughput in bytes per second
    BytesPerSecond,
    /// Throughput in items per second
    ItemsPerSecond,
}

impl Metric {
    /// Every metric, in record field order.
    pub const ALL: [Metric; 5] = [
        Metric::Iterations,
        Metric::RealTime,
        Metric::CpuTime,
        Metric::BytesPerSecond,
        Metric::ItemsPerSecond,
    ];

    /// Field name in the results document.
    pub fn column(self) -> &'static str {
        match self {
            Self::Iterations => "iterations",
            Self::RealTime => "real_time",
            Self::CpuTime => "cpu_time",
            Self::BytesPerSecond => "bytes_per_second",
            Self::ItemsPerSecond => "items_per_second",
        }
    }

    /// Name of the derived normalized field.
    pub fn normalized_column(self) -> &'static str {
        match self {
            Self::Iterations => "iterations_normalized",
            Self::RealTime => "real_time_normalized",
            Self::CpuTime => "cpu_time_normalized",
            Self::BytesPerSecond => "bytes_per_second_normalized",
            Self::ItemsPerSecond => "items_per_second_normalized",
        }
    }

    /// Resolve a results-document field name.
    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.column() == column)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One measured case of a results document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Position within the results document, assigned on load.
    #[serde(default)]
    pub id: usize,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Run name.
    #[serde(default)]
    pub run_name: String,
    /// Iterations run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<f64>,
    /// Wall clock time (ns).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_time: Option<f64>,
    /// CPU time (ns).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_time: Option<f64>,
    /// Bytes per second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_per_second: Option<f64>,
    /// Items per second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_per_second: Option<f64>,
    /// Fields this viewer does not interpret, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BenchmarkRecord {
    /// Create a record with the given name and no metrics.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: 0,
            run_name: name.clone(),
            name,
            iterations: None,
            real_time: None,
            cpu_time: None,
            bytes_per_second: None,
            items_per_second: None,
            extra: Map::new(),
        }
    }

    /// Builder-style setter for one metric.
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        *self.metric_mut(metric) = Some(value);
        self
    }

    /// Value of a metric, if present.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Iterations => self.iterations,
            Metric::RealTime => self.real_time,
            Metric::CpuTime => self.cpu_time,
            Metric::BytesPerSecond => self.bytes_per_second,
            Metric::ItemsPerSecond => self.items_per_second,
        }
    }

    fn metric_mut(&mut self, metric: Metric) -> &mut Option<f64> {
        match metric {
            Metric::Iterations => &mut self.iterations,
            Metric::RealTime => &mut self.real_time,
            Metric::CpuTime => &mut self.cpu_time,
            Metric::BytesPerSecond => &mut self.bytes_per_second,
            Metric::ItemsPerSecond => &mut self.items_per_second,
        }
    }
}

#[derive(Deserialize)]
struct RawResults {
    #[serde(default)]
    benchmarks: Vec<BenchmarkRecord>,
    #[serde(flatten)]
    context: Map<String, Value>,
}

/// A parsed results document.
///
/// Construction assigns record ids and decodes entity references in
/// `name` and `run_name`; neither happens again afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResults {
    /// Top-level fields other than `benchmarks`, kept as-is.
    #[serde(flatten)]
    pub context: Map<String, Value>,
    benchmarks: Vec<BenchmarkRecord>,
}

impl BenchmarkResults {
    /// Build results from records, assigning ids and decoding names.
    pub fn new(context: Map<String, Value>, mut benchmarks: Vec<BenchmarkRecord>) -> Self {
        for (index, record) in benchmarks.iter_mut().enumerate() {
            record.id = index;
            record.name = decode_html_entities(&record.name);
            record.run_name = decode_html_entities(&record.run_name);
        }
        Self {
            context,
            benchmarks,
        }
    }

    /// Parse a results document.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let raw: RawResults =
            serde_json::from_str(text).map_err(|e| ParseError::new("results document", e))?;
        Ok(Self::new(raw.context, raw.benchmarks))
    }

    /// The records, in document order.
    pub fn records(&self) -> &[BenchmarkRecord] {
        &self.benchmarks
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }
}
