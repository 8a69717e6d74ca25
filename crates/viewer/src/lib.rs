// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark viewer runtime.
//!
//! Loads the suite specification and benchmark documents through a
//! [`Fetcher`], tracks one panel per requested benchmark and produces
//! [`PageView`](bmxp_report::PageView)s for rendering.
//!
//! # Example
//!
//! ```no_run
//! use bmxp_report::LinkStyle;
//! use bmxp_viewer::{ViewController, ViewerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ViewerConfig::load(None)?;
//! let mut controller = ViewController::initialize(config.fetcher()?, config, "bm=sort").await?;
//! controller.drain().await;
//! let page = controller.page(LinkStyle::Query);
//! println!("{}", page.title);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod fetch;

pub use config::{ConfigError, ViewerConfig};
pub use controller::{
    AppState, PanelPhase, PanelState, ResourceEvent, ResourceKind, SourceState, ViewController,
    LOAD_ALL,
};
pub use fetch::{Fetcher, FsFetcher, HttpFetcher, MemoryFetcher};
