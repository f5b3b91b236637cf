//! HTTP client for the AI processing service.
//!
//! One call, `POST {base_url}/process`, whose response is handed back
//! unparsed so the caller decides what counts as success.

use crate::config::AiServiceConfig;
use crate::services::credentials::AccessCredential;
use reqwest::{Client, StatusCode};
use serde::de::IgnoredAny;
use serde::Serialize;
use service_core::observability::TracedClientExt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiClientError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    #[error("Request to AI service failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Body of `POST /process`.
#[derive(Debug, Serialize)]
struct ProcessQuestionRequest<'a> {
    store_id: &'a str,
    question: &'a str,
    access_token: &'a str,
}

/// Status and raw body of one AI service call.
#[derive(Debug, Clone)]
pub struct DownstreamResponse {
    status: StatusCode,
    body: String,
}

impl DownstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Checks that the body is well-formed JSON without re-encoding it.
    pub fn check_json(&self) -> Result<(), serde_json::Error> {
        serde_json::from_str::<IgnoredAny>(&self.body).map(|_| ())
    }
}

#[derive(Clone)]
pub struct AiServiceClient {
    client: Client,
    base_url: String,
}

impl AiServiceClient {
    pub fn new(config: &AiServiceConfig) -> Result<Self, AiClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AiClientError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: config.url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forward a question to the AI service.
    ///
    /// Non-2xx answers are returned as `Ok`; only failures to complete the
    /// HTTP exchange are errors.
    pub async fn process_question(
        &self,
        store_id: &str,
        question: &str,
        access_token: &AccessCredential,
        request_id: Option<&str>,
    ) -> Result<DownstreamResponse, AiClientError> {
        let url = format!("{}/process", self.base_url);
        let request = ProcessQuestionRequest {
            store_id,
            question,
            access_token: access_token.token(),
        };

        tracing::debug!(store_id = %store_id, url = %url, "Sending question to AI service");

        let response = self
            .client
            .traced_post(&url)
            .json(&request)
            .request_id(request_id)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                AiClientError::Transport(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, body_len = body.len(), "AI service responded");

        Ok(DownstreamResponse::new(status, body))
    }
}
