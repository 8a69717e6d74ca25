// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

//! Resource fetching.
//!
//! A [`Fetcher`] yields the full text of a resource or a [`FetchError`].
//! There is no retry and no timeout: a request that never completes keeps
//! its panel loading.

use async_trait::async_trait;
use bmxp_core::FetchError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Source of resource text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the full text content of the resource at `path`.
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError>;
}

/// Reads resources from a directory.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    /// Create a fetcher resolving paths under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl Fetcher for FsFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let full = self.root.join(path.trim_start_matches('/'));
        debug!(path = %full.display(), "reading resource");
        tokio::fs::read_to_string(&full).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound {
                    path: path.to_string(),
                }
            } else {
                FetchError::Transport {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

/// Fetches resources over HTTP relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base: Url,
}

impl HttpFetcher {
    /// Create a fetcher resolving paths against `base`.
    ///
    /// A trailing slash is added to the base path so relative paths resolve
    /// below it rather than next to it.
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            client: reqwest::Client::new(),
            base,
        }
    }

    /// The base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve `path` against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        self.base.join(path).map_err(|e| FetchError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let url = self.resolve(path)?;
        debug!(%url, "requesting resource");

        let transport = |e: reqwest::Error| FetchError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        };
        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(transport)
    }
}

/// Serves resources from memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    files: HashMap<String, String>,
}

impl MemoryFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource.
    pub fn with(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.files.insert(path.into(), text.into());
        self
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                path: path.to_string(),
            })
    }
}

/// Whether `root` names an HTTP(S) location rather than a directory.
pub fn is_remote(root: &str) -> bool {
    root.starts_with("http://") || root.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fs_fetcher_reads_below_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("bm")).unwrap();
        std::fs::write(dir.path().join("bm/a.json"), "{}").unwrap();

        let fetcher = FsFetcher::new(dir.path());
        assert_eq!(fetcher.fetch_text("bm/a.json").await.unwrap(), "{}");
        assert_eq!(fetcher.fetch_text("/bm/a.json").await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_fs_fetcher_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FsFetcher::new(dir.path());
        let err = fetcher.fetch_text("missing.json").await.unwrap_err();
        assert_eq!(
            err,
            FetchError::NotFound {
                path: "missing.json".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_memory_fetcher() {
        let fetcher = MemoryFetcher::new().with("a", "text");
        assert_eq!(fetcher.fetch_text("a").await.unwrap(), "text");
        assert!(fetcher.fetch_text("b").await.is_err());
    }

    #[test]
    fn test_http_fetcher_resolves_below_base() {
        let fetcher = HttpFetcher::new(Url::parse("http://localhost:8000/results").unwrap());
        assert_eq!(
            fetcher.resolve("bm/a.json").unwrap().as_str(),
            "http://localhost:8000/results/bm/a.json"
        );
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/bm"));
        assert!(!is_remote("./data"));
    }
}
