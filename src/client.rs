//! HTTP client for the prompt-analysis service.
//!
//! One `send` call performs exactly one request attempt; retry is the
//! engine's responsibility.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::config::Config;
use crate::error_taxonomy::AnalysisError;
use crate::models::{AnalysisRequest, AnalysisResult};
use crate::utils::truncate_with_ellipsis;

// === Types ===

/// Client for the analysis endpoint.
#[must_use]
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http_client: reqwest::Client,
    endpoint_url: String,
}

// === AnalysisClient ===

impl AnalysisClient {
    /// Create a client from CLI configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let endpoint_url = config.endpoint_url();

        tracing::info!("Analysis endpoint: {endpoint_url}");

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http_client,
            endpoint_url,
        })
    }

    /// Submit one prompt for analysis. Exactly one network call per invocation.
    pub async fn send(&self, prompt: &str) -> Result<AnalysisResult, AnalysisError> {
        let body = AnalysisRequest::new(prompt);

        let response = self
            .http_client
            .post(&self.endpoint_url)
            .json(&body)
            .send()
            .await
            .map_err(AnalysisError::Transport)?;

        let status = response.status();
        let response_text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::warn!(
                "Analysis request failed: HTTP {}: {}",
                status.as_u16(),
                truncate_with_ellipsis(&response_text, 500, "...")
            );
            return Err(AnalysisError::Status {
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&response_text).map_err(|err| {
            tracing::warn!(
                "Analysis response did not match the expected shape: {err}: {}",
                truncate_with_ellipsis(&response_text, 500, "...")
            );
            AnalysisError::Decode(err)
        })
    }
}
