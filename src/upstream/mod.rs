//! Client for the upstream multimodal generation API.

mod types;

pub use types::{
    Candidate, CandidateContent, Content, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, InlineData, Part, ResponsePart,
};

use reqwest::Client;
use std::time::Duration;

use crate::config::Config;
use crate::error::ServiceError;

/// Total request timeout for one upstream call.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Thin client around the upstream `generateContent` endpoint.
///
/// One best-effort attempt per call: no retries, no caching, no rate
/// limiting. Transport and non-success responses are folded into
/// `ServiceError::Upstream`.
pub struct GenerationClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GenerationClient {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.upstream_base_url, config.api_key.clone())
    }

    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http: build_http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Fail fast when no upstream credential is present.
    ///
    /// Every endpoint calls this before doing any work, so the missing-key
    /// error is uniform across the whole surface.
    pub fn ensure_configured(&self) -> Result<&str, ServiceError> {
        self.api_key
            .as_deref()
            .ok_or(ServiceError::NotConfigured("upstream API key"))
    }

    /// POST `request` to `{base}/models/{model}:generateContent`.
    pub async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ServiceError> {
        let api_key = self.ensure_configured()?;
        let url = format!(
            "{}/models/{model}:generateContent?key={api_key}",
            self.base_url
        );

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::Upstream {
                status: 502,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;

        if let Some(err) = parsed.error {
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                message: err.message,
            });
        }

        Ok(parsed)
    }
}

fn build_http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Human-readable message from an upstream error body.
///
/// Prefers `{"error": {"message": ...}}`; falls back to the raw body text.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}
