//! Transport seam for the completion endpoint.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, instrument};

use super::prompt::{ChatRequest, ChatResponse, DEFAULT_ENDPOINT};

/// Everything that can go wrong between dispatch and extracted text.
///
/// The controller collapses all of these into one user-visible message; the
/// variants exist for logs.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response body did not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response contained no choices")]
    EmptyChoices,
    #[error("request task ended without a result")]
    Dropped,
}

/// Sends one chat request and returns the first completion's markdown.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, QueryError>;
}

/// Production client posting JSON to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct ReqwestCompletionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl Default for ReqwestCompletionClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl ReqwestCompletionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for ReqwestCompletionClient {
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn complete(&self, request: &ChatRequest) -> Result<String, QueryError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Decode from bytes so a shape mismatch surfaces as a serde error
        // rather than an opaque reqwest decode error.
        let bytes = response.bytes().await?;
        let parsed: ChatResponse = serde_json::from_slice(&bytes)?;
        let content = parsed.first_content().ok_or(QueryError::EmptyChoices)?;

        debug!(chars = content.len(), "received completion");
        Ok(content.to_string())
    }
}
