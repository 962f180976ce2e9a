//! Loading the pre-built search index from disk or over HTTP.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;

use crate::error::IndexLoadError;
use crate::models::IndexedDocument;
use crate::utils::{RetryPolicy, with_retry};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the search index lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    File(PathBuf),
    Url(String),
}

impl IndexSource {
    pub fn parse(source: &str) -> Self {
        let lower = source.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            IndexSource::Url(source.to_string())
        } else {
            IndexSource::File(PathBuf::from(source))
        }
    }
}

impl std::fmt::Display for IndexSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexSource::File(path) => write!(f, "{}", path.display()),
            IndexSource::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Parse the JSON array of documents.
pub fn parse_index(bytes: &[u8]) -> Result<Vec<IndexedDocument>, IndexLoadError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Loads the index once per session.
#[derive(Debug, Clone)]
pub struct IndexLoader {
    client: Client,
    retry: RetryPolicy,
}

impl IndexLoader {
    pub fn new() -> Result<Self, IndexLoadError> {
        let client = Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            client,
            retry: RetryPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn load(&self, source: &IndexSource) -> Result<Vec<IndexedDocument>, IndexLoadError> {
        let documents = match source {
            IndexSource::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| IndexLoadError::Io {
                    path: path.display().to_string(),
                    source: e,
                })?;
                parse_index(&bytes)?
            }
            IndexSource::Url(url) => {
                let outcome = with_retry(&self.retry, || self.fetch(url)).await;
                let attempts = outcome.attempts();
                let bytes = outcome.into_result()?;
                tracing::debug!(%url, attempts, "fetched search index");
                parse_index(&bytes)?
            }
        };

        tracing::info!(source = %source, documents = documents.len(), "loaded search index");
        Ok(documents)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, IndexLoadError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IndexLoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
