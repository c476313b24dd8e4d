// ABOUTME: OpenAI-compatible chat-completion provider backing the interpretation cascade
// ABOUTME: Works with OpenRouter, OpenAI, Ollama, vLLM and any endpoint speaking the same API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! # `OpenAI`-Compatible Provider
//!
//! One provider serves every model in the cascade: the model identifier is set
//! per request, so switching candidates never switches transports.
//!
//! ## Configuration
//!
//! - `LLM_BASE_URL`: Base URL (default: <https://openrouter.ai/api/v1>)
//! - `LLM_API_KEY`: Bearer token (optional for local servers)
//! - `LLM_PRIMARY_MODEL`: Model used when a request names none

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use crate::config::environment::LlmConfig;
use crate::constants::llm::{DEFAULT_LLM_BASE_URL, DEFAULT_PRIMARY_MODEL};
use crate::errors::AppError;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Transport ceiling; the cascade applies its own tighter per-attempt bound
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Service label used in error messages
const SERVICE_LABEL: &str = "LLM";

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for OpenAiMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <https://openrouter.ai/api/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Model used when a request does not name one
    pub default_model: String,
    /// Provider name for logging
    pub provider_name: String,
}

impl OpenAiCompatibleConfig {
    /// Build from the server's language-model settings
    #[must_use]
    pub fn from_llm_config(config: &LlmConfig) -> Self {
        Self {
            provider_name: provider_name_for(&config.base_url).to_owned(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            default_model: config.primary_model.clone(),
        }
    }
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_BASE_URL.to_owned(),
            api_key: None,
            default_model: DEFAULT_PRIMARY_MODEL.to_owned(),
            provider_name: provider_name_for(DEFAULT_LLM_BASE_URL).to_owned(),
        }
    }
}

/// Label the endpoint for logs
fn provider_name_for(base_url: &str) -> &'static str {
    if base_url.contains("openrouter.ai") {
        "openrouter"
    } else if base_url.contains("api.openai.com") {
        "openai"
    } else if base_url.contains(":11434") {
        "ollama"
    } else if base_url.contains(":8000") {
        "vllm"
    } else {
        "openai-compatible"
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Chat-completion client for any `OpenAI`-compatible endpoint
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            provider = %config.provider_name,
            base_url = %config.base_url,
            model = %config.default_model,
            "Initialized chat-completion provider"
        );
        Ok(Self { client, config })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn transport_error(&self, error: &reqwest::Error) -> AppError {
        if error.is_connect() {
            AppError::external_service(
                SERVICE_LABEL,
                format!(
                    "Cannot connect to {} at {}",
                    self.config.provider_name, self.config.base_url
                ),
            )
        } else if error.is_timeout() {
            AppError::external_service(SERVICE_LABEL, "Request timed out")
        } else {
            AppError::external_service(SERVICE_LABEL, format!("Request failed: {error}"))
        }
    }

    /// Parse error response from API
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) else {
            return AppError::external_service(
                SERVICE_LABEL,
                format!(
                    "API error ({status}): {}",
                    body.chars().take(200).collect::<String>()
                ),
            );
        };
        let detail = error_response.error.message;
        let message = match status.as_u16() {
            401 | 403 => format!("Authentication failed: {detail}"),
            402 => format!("Quota exhausted: {detail}"),
            429 => extract_rate_limit_message(&detail),
            404 => format!("Model or endpoint not found: {detail}"),
            400 => format!("Request rejected: {detail}"),
            _ => format!(
                "{} - {detail}",
                error_response
                    .error
                    .error_type
                    .as_deref()
                    .unwrap_or("unknown")
            ),
        };
        AppError::external_service(SERVICE_LABEL, message)
    }
}

/// Turn a rate-limit error into a short message, keeping a retry-after hint
fn extract_rate_limit_message(message: &str) -> String {
    let lower = message.to_lowercase();
    if let Some(pos) = lower.find("try again in ") {
        let after = &lower[pos + "try again in ".len()..];
        let number: String = after
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if let Ok(seconds) = number.parse::<f64>() {
            let seconds = seconds.ceil() as u64;
            return format!("Rate limit reached, retry in {seconds} seconds");
        }
    }
    "Rate limit reached".to_owned()
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.config.provider_name
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let body = OpenAiRequest {
            model,
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };
        debug!(
            provider = %self.config.provider_name,
            messages = body.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .add_auth_header(self.client.post(self.api_url("chat/completions")).json(&body))
            .send()
            .await
            .map_err(|e| {
                error!(provider = %self.config.provider_name, error = %e, "Chat completion request failed");
                self.transport_error(&e)
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(&e))?;
        if !status.is_success() {
            return Err(Self::parse_error_response(status, &text));
        }

        let parsed: OpenAiResponse = serde_json::from_str(&text).map_err(|e| {
            AppError::external_service(SERVICE_LABEL, format!("Failed to parse response: {e}"))
        })?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service(SERVICE_LABEL, "API returned no choices"))?;
        let content = choice.message.content.unwrap_or_default();

        debug!(
            chars = content.len(),
            finish_reason = ?choice.finish_reason,
            "Received chat completion"
        );

        Ok(ChatResponse {
            content,
            model: parsed.model.unwrap_or_else(|| model.to_owned()),
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        let response = self
            .add_auth_header(self.client.get(self.api_url("models")))
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        let healthy = response.status().is_success();
        if !healthy {
            warn!(
                provider = %self.config.provider_name,
                status = %response.status(),
                "LLM health check failed"
            );
        }
        Ok(healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name_detection() {
        assert_eq!(provider_name_for("https://openrouter.ai/api/v1"), "openrouter");
        assert_eq!(provider_name_for("http://localhost:11434/v1"), "ollama");
        assert_eq!(provider_name_for("https://llm.internal/v1"), "openai-compatible");
    }

    #[test]
    fn test_rate_limit_message_keeps_hint() {
        assert_eq!(
            extract_rate_limit_message("Please try again in 2.5s"),
            "Rate limit reached, retry in 3 seconds"
        );
        assert_eq!(extract_rate_limit_message("slow down"), "Rate limit reached");
    }

    #[test]
    fn test_error_response_parsing() {
        let body = r#"{"error":{"message":"Invalid key","type":"auth"}}"#;
        let error = OpenAiCompatibleProvider::parse_error_response(
            reqwest::StatusCode::UNAUTHORIZED,
            body,
        );
        assert!(error.message.contains("Authentication failed: Invalid key"));

        let error = OpenAiCompatibleProvider::parse_error_response(
            reqwest::StatusCode::BAD_GATEWAY,
            "<html>bad gateway</html>",
        );
        assert!(error.message.contains("API error (502 Bad Gateway)"));
    }

    #[test]
    fn test_request_serialization_omits_unset_fields() {
        let messages = [ChatMessage::system("s"), ChatMessage::user("u")];
        let request = OpenAiRequest {
            model: "m",
            messages: messages.iter().map(OpenAiMessage::from).collect(),
            temperature: None,
            max_tokens: Some(10),
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["max_tokens"], 10);
        assert!(json.get("temperature").is_none());
    }
}
