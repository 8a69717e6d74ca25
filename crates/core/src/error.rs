// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for loading and displaying benchmarks.
//!
//! Three things can go wrong: a resource cannot be fetched, a document
//! cannot be parsed, or a benchmark key does not exist in the suite.
//! [`ViewerError`] wraps all three for callers that do not care which.

use thiserror::Error;

/// A resource could not be fetched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("{path}: request failed with status {status}")]
    Status {
        /// Requested path or URL
        path: String,
        /// HTTP status code
        status: u16,
    },

    /// The resource does not exist.
    #[error("{path}: not found")]
    NotFound {
        /// Requested path or URL
        path: String,
    },

    /// Transport or filesystem failure.
    #[error("{path}: {message}")]
    Transport {
        /// Requested path or URL
        path: String,
        /// Underlying error message
        message: String,
    },
}

impl FetchError {
    /// Path of the resource that failed.
    pub fn path(&self) -> &str {
        match self {
            Self::Status { path, .. } | Self::NotFound { path } | Self::Transport { path, .. } => {
                path
            }
        }
    }
}

/// A JSON document was malformed.
#[derive(Debug, Error)]
#[error("failed to parse {document}: {source}")]
pub struct ParseError {
    /// What was being parsed (a path or a document kind)
    pub document: String,
    /// The JSON error
    #[source]
    pub source: serde_json::Error,
}

impl ParseError {
    /// Create a new parse error for the named document.
    pub fn new(document: impl Into<String>, source: serde_json::Error) -> Self {
        Self {
            document: document.into(),
            source,
        }
    }
}

/// A benchmark key is not part of the suite.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("benchmark '{key}' is not defined in the suite")]
pub struct MissingKeyError {
    /// The requested key
    pub key: String,
}

impl MissingKeyError {
    /// Create a new error for the given key.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Any error raised while loading or displaying benchmarks.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Fetch failure
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Parse failure
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Unknown benchmark key
    #[error(transparent)]
    MissingKey(#[from] MissingKeyError),
}

/// Result type for viewer operations.
pub type Result<T> = std::result::Result<T, ViewerError>;
