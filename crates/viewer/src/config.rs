// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

//! Viewer configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then `BMXP_*` environment variables (for example `BMXP_PORT=9000`).
//! Command-line flags are applied on top by the binary.

use crate::fetch::{is_remote, Fetcher, FsFetcher, HttpFetcher};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "bmxp.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "BMXP";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration sources could not be read or merged.
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// The data root is neither a directory nor a valid URL.
    #[error("Invalid data root '{root}': {message}")]
    InvalidDataRoot {
        /// Configured data root
        root: String,
        /// Why it was rejected
        message: String,
    },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Viewer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Directory or HTTP(S) base URL all resources are fetched from.
    pub data_root: String,
    /// Path of the suite specification, relative to the data root.
    pub spec_path: String,
    /// Prefix prepended to every results path.
    pub results_prefix: String,
    /// Host the HTTP viewer binds to.
    pub host: String,
    /// Port the HTTP viewer binds to.
    pub port: u16,
    /// Always show the debug log, regardless of the `dbg` parameter.
    pub debug: bool,
    /// Directory for rendered reports.
    pub output_dir: String,
    /// Directory holding the widget assets.
    pub static_dir: String,
    /// How long a page waits for outstanding resources before rendering
    /// them as still loading, in milliseconds.
    pub settle_timeout_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_root: ".".to_string(),
            spec_path: "bm/specs.json".to_string(),
            results_prefix: "bm/".to_string(),
            host: "localhost".to_string(),
            port: 8000,
            debug: false,
            output_dir: bmxp_report::io::OUTPUT_DIR.to_string(),
            static_dir: "static".to_string(),
            settle_timeout_ms: 30_000,
        }
    }
}

impl ViewerConfig {
    /// Load configuration from defaults, `file` (or [`CONFIG_FILE`] if it
    /// exists) and the environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("data_root", defaults.data_root)?
            .set_default("spec_path", defaults.spec_path)?
            .set_default("results_prefix", defaults.results_prefix)?
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("debug", defaults.debug)?
            .set_default("output_dir", defaults.output_dir)?
            .set_default("static_dir", defaults.static_dir)?
            .set_default("settle_timeout_ms", defaults.settle_timeout_ms as i64)?;

        builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(CONFIG_FILE).required(false)),
        };

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Full path of a results document.
    pub fn results_path(&self, results: &str) -> String {
        if is_remote(results) || self.results_prefix.is_empty() {
            return results.to_string();
        }
        format!(
            "{}/{}",
            self.results_prefix.trim_end_matches('/'),
            results.trim_start_matches('/')
        )
    }

    /// Build the fetcher for the configured data root.
    pub fn fetcher(&self) -> Result<Arc<dyn Fetcher>> {
        if is_remote(&self.data_root) {
            let base = Url::parse(&self.data_root).map_err(|e| ConfigError::InvalidDataRoot {
                root: self.data_root.clone(),
                message: e.to_string(),
            })?;
            Ok(Arc::new(HttpFetcher::new(base)))
        } else {
            Ok(Arc::new(FsFetcher::new(&self.data_root)))
        }
    }

    /// Address the HTTP viewer binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.bind_address(), "localhost:8000");
        assert_eq!(config.results_prefix, "bm/");
    }

    #[test]
    fn test_results_path() {
        let mut config = ViewerConfig::default();
        assert_eq!(config.results_path("sort.json"), "bm/sort.json");
        assert_eq!(config.results_path("/sort.json"), "bm/sort.json");
        assert_eq!(
            config.results_path("https://host/sort.json"),
            "https://host/sort.json"
        );
        config.results_prefix = String::new();
        assert_eq!(config.results_path("sort.json"), "sort.json");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.toml");
        std::fs::write(
            &path,
            "port = 9100\nspec_path = \"suite.json\"\ndebug = true\n",
        )
        .unwrap();

        let config = ViewerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.spec_path, "suite.json");
        assert!(config.debug);
        assert_eq!(config.results_prefix, "bm/");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ViewerConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_invalid_remote_root() {
        let config = ViewerConfig {
            data_root: "http://".to_string(),
            ..ViewerConfig::default()
        };
        assert!(matches!(
            config.fetcher(),
            Err(ConfigError::InvalidDataRoot { .. })
        ));
    }
}
