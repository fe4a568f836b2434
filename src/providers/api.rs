use async_trait::async_trait;
use log::error;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{BlockRequest, ProviderHooks, TranslationProvider};
use crate::translation::Glossary;

/// Provider for a generic remote translation endpoint.
///
/// One POST per block; the endpoint answers with `{"translations": [...]}`.
#[derive(Debug, Clone)]
pub struct GenericApiProvider {
    /// HTTP client for API requests
    client: Client,
    /// Full endpoint URL
    endpoint: String,
    /// Optional bearer token
    api_key: Option<String>,
}

/// Request body sent to the endpoint
#[derive(Debug, Serialize)]
pub struct ApiTranslationRequest<'a> {
    pub source_lang: &'a str,
    pub target_lang: &'a str,
    pub lines: &'a [String],
    pub prompt: &'a str,
    pub glossary: &'a Glossary,
}

/// Response body expected from the endpoint
#[derive(Debug, Deserialize)]
pub struct ApiTranslationResponse {
    /// Candidate lines; missing means none
    #[serde(default)]
    pub translations: Vec<String>,
}

impl GenericApiProvider {
    /// Create a new client for `endpoint`
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_block(&self, request: &BlockRequest<'_>) -> Result<Vec<String>, ProviderError> {
        let empty = Glossary::new();
        let body = ApiTranslationRequest {
            source_lang: request.source_lang,
            target_lang: request.target_lang,
            lines: request.lines,
            prompt: request.prompt,
            glossary: request.glossary.unwrap_or(&empty),
        };

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Translation API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let parsed = response
            .json::<ApiTranslationResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(parsed.translations)
    }
}

#[async_trait]
impl TranslationProvider for GenericApiProvider {
    fn name(&self) -> &str {
        "api"
    }

    async fn translate_block(
        &self,
        request: &BlockRequest<'_>,
        hooks: &ProviderHooks,
    ) -> Result<Vec<String>, ProviderError> {
        if hooks.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        // Dropping the request future aborts the in-flight connection.
        tokio::select! {
            result = self.send_block(request) => result,
            _ = hooks.cancelled() => Err(ProviderError::Cancelled),
        }
    }
}
