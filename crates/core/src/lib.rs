// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core types for the benchmark explorer.
//!
//! This crate holds everything that does not touch I/O or markup:
//!
//! - [`model`] - The suite specification and results documents
//! - [`normalize`] - Per-column normalization of benchmark metrics
//! - [`html`] - HTML entity escaping and decoding
//! - [`units`] - Rounding and human-readable unit formatting
//! - [`params`] - URL query parameter handling
//! - [`error`] - The error taxonomy shared by the other crates
//!
//! # Quick Start
//!
//! ```
//! use bmxp_core::{BenchmarkResults, NormalizedResults, Metric};
//!
//! let text = r#"{"benchmarks": [
//!     {"name": "fast", "run_name": "fast", "iterations": 2000, "real_time": 5.0, "cpu_time": 5.0},
//!     {"name": "slow", "run_name": "slow", "iterations": 1000, "real_time": 10.0, "cpu_time": 10.0}
//! ]}"#;
//!
//! let results = BenchmarkResults::parse(text).unwrap();
//! let normalized = NormalizedResults::new(results);
//! assert_eq!(normalized.normalized[1].get(Metric::RealTime), 2.0);
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod error;
pub mod html;
pub mod model;
pub mod normalize;
pub mod params;
pub mod units;

pub use error::{FetchError, MissingKeyError, ParseError, ViewerError};
pub use model::{BenchmarkRecord, BenchmarkResults, BenchmarkSpec, BenchmarkSuite, Metric};
pub use normalize::{normalize_by, Aggregator, NormalizedMetrics, NormalizedResults};
pub use params::QueryParams;
