// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! Generation backend capability.
//!
//! The pipeline sends one composed prompt and expects free-text output.
//! `Ok(None)` means the backend answered successfully but produced no
//! content; transport and auth failures are real errors. The pipeline
//! never retries; a caller wanting retries wraps the call externally.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::GenerationError;

/// Single-shot text completion over a composed prompt.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Option<String>, GenerationError>;
}

/// Cohere chat API client.
///
/// Credential comes from configuration, supplied out of band. One HTTP
/// round trip per call, no built-in retry.
pub struct CohereClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

#[derive(Serialize)]
struct CohereChatRequest<'a> {
    model: &'a str,
    message: &'a str,
}

impl CohereClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl CompletionBackend for CohereClient {
    async fn complete(&self, prompt: &str) -> Result<Option<String>, GenerationError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "calling generation backend");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&CohereChatRequest {
                model: &self.model,
                message: prompt,
            })
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(GenerationError::Unauthorized(format!(
                "backend returned {status}"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "generation backend returned an error status");
            return Err(GenerationError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        Ok(extract_text(&payload))
    }
}

/// Pulls the generated text out of a Cohere chat response. Missing or
/// blank text is the legitimate empty-content case, not an error.
fn extract_text(payload: &Value) -> Option<String> {
    payload["text"]
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
