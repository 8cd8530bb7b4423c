use async_trait::async_trait;
use log::error;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::app_config::TranslationConfig;
use crate::errors::ProviderError;
use crate::language_utils::LanguagePair;

use super::Provider;

/// Public endpoint of the Google translate web client
pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Google translate client for the `translate_a/single` endpoint
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Endpoint URL
    endpoint: String,
    /// Request timeout, reported in errors
    timeout: Duration,
}

/// Translation request
#[derive(Debug, Clone)]
pub struct GoogleRequest {
    /// Text to translate
    pub text: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
}

impl GoogleRequest {
    pub fn new(text: impl Into<String>, languages: &LanguagePair) -> Self {
        Self {
            text: text.into(),
            source_language: languages.source.clone(),
            target_language: languages.target.clone(),
        }
    }

    /// Query parameters of the request, in the order the web client sends them
    pub fn query(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("client", "gtx"),
            ("sl", self.source_language.as_str()),
            ("tl", self.target_language.as_str()),
            ("dt", "t"),
            ("q", self.text.as_str()),
            ("ie", "UTF-8"),
            ("oe", "UTF-8"),
        ]
    }
}

/// Parsed translation response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoogleResponse {
    /// Translated chunks, in response order
    pub chunks: Vec<String>,
}

/// Parse the nested-array payload of the endpoint.
///
/// The payload is `[[[translated, original, ...], ...], ...]`; the translation
/// is the concatenation of the first element of every item in the first
/// sub-list. A missing or `null` first sub-list is an empty translation.
pub fn parse_translation_payload(body: &str) -> Result<GoogleResponse, ProviderError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(format!("invalid JSON: {}", e)))?;

    let root = value
        .as_array()
        .ok_or_else(|| ProviderError::ParseError("expected a JSON array".to_string()))?;

    let items = match root.first() {
        None | Some(Value::Null) => return Ok(GoogleResponse::default()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ProviderError::ParseError(format!(
                "expected a list of translated chunks, got {}",
                other
            )));
        }
    };

    let mut chunks = Vec::with_capacity(items.len());
    for item in items {
        let tuple = item.as_array().ok_or_else(|| {
            ProviderError::ParseError(format!("expected a chunk tuple, got {}", item))
        })?;
        match tuple.first() {
            Some(Value::String(chunk)) if !chunk.is_empty() => chunks.push(chunk.clone()),
            Some(Value::String(_)) | Some(Value::Null) | None => {}
            Some(other) => {
                return Err(ProviderError::ParseError(format!(
                    "expected translated text, got {}",
                    other
                )));
            }
        }
    }

    Ok(GoogleResponse { chunks })
}

impl GoogleTranslate {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// Create a client from the translation section of the configuration
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(&config.endpoint, config.timeout())
    }

    /// Send a request and parse the answer
    pub async fn complete(&self, request: &GoogleRequest) -> Result<GoogleResponse, ProviderError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&request.query())
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Google translate error ({}): {}", status, error_text);
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ProviderError::RateLimitExceeded(error_text));
            }
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        parse_translation_payload(&body)
    }

    /// Extract text from a response
    pub fn extract_text(response: &GoogleResponse) -> String {
        response.chunks.concat()
    }

    fn map_transport_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout.as_secs())
        } else if e.is_connect() {
            ProviderError::ConnectionError(e.to_string())
        } else {
            ProviderError::RequestFailed(e.to_string())
        }
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate_one(&self, text: &str, languages: &LanguagePair) -> Result<String, ProviderError> {
        let request = GoogleRequest::new(text, languages);
        let response = self.complete(&request).await?;
        Ok(Self::extract_text(&response))
    }

    async fn test_connection(&self, languages: &LanguagePair) -> Result<(), ProviderError> {
        let request = GoogleRequest::new("test", languages);
        self.complete(&request).await?;
        Ok(())
    }
}
