//! HTTP client for the analysis service.
//!
//! Endpoints:
//! - `POST /analyze`: start an analysis, returns the session id (`repo_id`)
//! - `GET /results/{repo_id}`: current (possibly partial) result document
//! - `GET /status`: health check

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::AnalysisDocument;
use crate::errors::BackendError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub repo_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<&'a str>,
}

/// Response from `POST /analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    pub repo_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response from `GET /status`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// The two calls a session needs from the service.
///
/// Implemented over HTTP by [`HttpBackend`]; tests substitute scripted fakes.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Start an analysis and return the backend-assigned session id.
    async fn create_analysis(&self, repo_url: &str) -> Result<String, BackendError>;

    /// Fetch the current result document for a session.
    async fn fetch_results(&self, session_id: &str) -> Result<AnalysisDocument, BackendError>;
}

/// [`AnalysisBackend`] over plain JSON HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    branch: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            branch: None,
        }
    }

    /// Ask the backend to analyse a specific branch instead of auto-detecting.
    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /results/{id}` with `id` percent-encoded as a single path segment.
    fn results_url(&self, session_id: &str) -> Result<reqwest::Url, BackendError> {
        let base = self.url("/results");
        let invalid = |message: String| BackendError::InvalidUrl {
            url: base.clone(),
            message,
        };
        let mut url = reqwest::Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("URL cannot have path segments".to_string()))?
            .push(session_id);
        Ok(url)
    }

    /// Call `GET /status`.
    pub async fn health(&self) -> Result<HealthResponse, BackendError> {
        let url = self.url("/status");
        let resp = self.send(&url, self.client.get(&url)).await?;
        decode(&url, resp).await
    }

    async fn send(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, BackendError> {
        let resp = request.send().await.map_err(|source| BackendError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    url: &str,
    resp: reqwest::Response,
) -> Result<T, BackendError> {
    let body = resp.text().await.map_err(|source| BackendError::Transport {
        url: url.to_string(),
        source,
    })?;
    serde_json::from_str(&body).map_err(|e| BackendError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn create_analysis(&self, repo_url: &str) -> Result<String, BackendError> {
        let url = self.url("/analyze");
        let body = AnalyzeRequest {
            repo_url,
            branch: self.branch.as_deref(),
        };
        let resp = self.send(&url, self.client.post(&url).json(&body)).await?;
        let created: AnalyzeResponse = decode(&url, resp).await?;
        debug!(repo_id = %created.repo_id, message = ?created.message, "analysis created");
        Ok(created.repo_id)
    }

    async fn fetch_results(&self, session_id: &str) -> Result<AnalysisDocument, BackendError> {
        let url = self.results_url(session_id)?;
        let resp = self.send(url.as_str(), self.client.get(url.clone())).await?;
        decode(url.as_str(), resp).await
    }
}
