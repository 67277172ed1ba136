//! Author and paper record fetchers
//!
//! [`RecordSource`] is the seam between the graph pipeline and wherever records
//! come from. [`SemanticScholarClient`] fetches them from the Semantic Scholar
//! v1 REST API. Every record is validated here, once, so downstream code only
//! sees well-formed data.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::model::{AuthorRecord, PaperRecord};

/// Default API root
pub const DEFAULT_API_URL: &str = "https://api.semanticscholar.org/v1";

/// Errors raised while fetching or decoding records
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport failure (connect, timeout, body read)
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status
    #[error("request to {url} returned {status}")]
    Status { url: String, status: StatusCode },

    /// The body was not the expected JSON shape
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The record decoded but is missing required data
    #[error("malformed record from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

/// A source of author and paper records
#[async_trait]
pub trait RecordSource {
    /// Fetch an author's name and publication list
    async fn fetch_author(&self, author_id: &str) -> Result<AuthorRecord, FetchError>;

    /// Fetch a paper with its authors, references and citations
    async fn fetch_paper(&self, paper_id: &str) -> Result<PaperRecord, FetchError>;
}

/// Connection settings for [`SemanticScholarClient`]
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Client for the Semantic Scholar v1 API
pub struct SemanticScholarClient {
    client: Client,
    base_url: String,
}

impl SemanticScholarClient {
    pub fn new(config: SourceConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("citegraph/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn author_url(&self, author_id: &str) -> String {
        format!("{}/author/{}", self.base_url, author_id)
    }

    pub fn paper_url(&self, paper_id: &str) -> String {
        format!("{}/paper/{}", self.base_url, paper_id)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!(url, "fetching");

        let http_err = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(http_err)?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl RecordSource for SemanticScholarClient {
    async fn fetch_author(&self, author_id: &str) -> Result<AuthorRecord, FetchError> {
        let url = self.author_url(author_id);
        let author: AuthorRecord = self.fetch_json(&url).await?;

        if let Some(paper) = author.papers.iter().find(|p| p.paper_id.is_empty()) {
            return Err(FetchError::Malformed {
                url,
                reason: format!(
                    "paper with empty paperId (title: {})",
                    paper.title.as_deref().unwrap_or("<none>")
                ),
            });
        }

        Ok(author)
    }

    async fn fetch_paper(&self, paper_id: &str) -> Result<PaperRecord, FetchError> {
        let url = self.paper_url(paper_id);
        let paper: PaperRecord = self.fetch_json(&url).await?;
        paper
            .validate()
            .map_err(|reason| FetchError::Malformed { url, reason })?;
        Ok(paper)
    }
}
