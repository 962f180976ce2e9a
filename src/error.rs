//! Error types for sitelab.

use thiserror::Error;

use crate::utils::retry::Retryable;

/// Message returned to clients whose chat request body is not valid JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON in request body";

/// Errors raised by the mock chat endpoint.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{}", INVALID_JSON_MESSAGE)]
    MalformedRequestBody(#[source] serde_json::Error),
}

/// Failure to load the search index.
#[derive(Debug, Error)]
pub enum IndexLoadError {
    #[error("failed to read index file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch index: {0}")]
    Request(#[from] reqwest::Error),

    #[error("index server returned status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("invalid index JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Retryable for IndexLoadError {
    fn is_retryable(&self) -> bool {
        match self {
            IndexLoadError::Request(e) => e.is_timeout() || e.is_connect(),
            IndexLoadError::Status { status, .. } => *status == 429 || *status >= 500,
            IndexLoadError::Io { .. } | IndexLoadError::Parse(_) => false,
        }
    }
}

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),

    #[error("validation error: {0}")]
    ValidationError(String),
}
