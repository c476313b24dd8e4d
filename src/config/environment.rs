// ABOUTME: Environment-based server configuration for the forecast pipeline
// ABOUTME: Resolves bind address, engine service, cascade models, deadlines and cache once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! Environment-based configuration management for production deployment

use super::{env_parse_or, env_var_or, parse_list};
use crate::cache::CacheConfig;
use crate::constants::engines::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_ENGINE_SERVICE_URL, DEFAULT_NUMERIC_ENGINE,
    DEFAULT_PRIMARY_NARRATIVE_ENGINE, DEFAULT_SECONDARY_NARRATIVE_ENGINE,
};
use crate::constants::limits::DEFAULT_REQUEST_DEADLINE_SECS;
use crate::constants::llm::{
    DEFAULT_ATTEMPT_TIMEOUT_SECS as DEFAULT_LLM_ATTEMPT_TIMEOUT_SECS, DEFAULT_FALLBACK_MODEL_1,
    DEFAULT_FALLBACK_MODEL_2, DEFAULT_LLM_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_PRIMARY_MODEL,
    DEFAULT_TEMPERATURE,
};
use crate::constants::ports::DEFAULT_HTTP_PORT;
use crate::errors::AppResult;
use forecast_engines::{EngineServiceConfig, RetryBackoffConfig};
use std::env;
use std::time::Duration;
use tracing::info;

/// HTTP bind settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Calculation engine transport and retry policy
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Service location and socket timeouts
    pub service: EngineServiceConfig,
    /// Attempts, backoff and per-attempt bound
    pub retry: RetryBackoffConfig,
}

/// Which engines a forecast day fans out to, and the request deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastConfig {
    /// Engine producing numeric cycle data
    pub numeric_engine: String,
    /// Engines producing symbolic readings, at most two are used
    pub narrative_engines: Vec<String>,
    /// Bound on one orchestrated request
    pub request_deadline: Duration,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            numeric_engine: DEFAULT_NUMERIC_ENGINE.to_owned(),
            narrative_engines: vec![
                DEFAULT_PRIMARY_NARRATIVE_ENGINE.to_owned(),
                DEFAULT_SECONDARY_NARRATIVE_ENGINE.to_owned(),
            ],
            request_deadline: Duration::from_secs(DEFAULT_REQUEST_DEADLINE_SECS),
        }
    }
}

/// Chat-completion backend and model cascade
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// OpenAI-compatible base URL
    pub base_url: String,
    /// Bearer token, optional for local servers
    pub api_key: Option<String>,
    /// First candidate
    pub primary_model: String,
    /// Later candidates, tried in order
    pub fallback_models: Vec<String>,
    /// Completion token budget per candidate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Bound on one candidate call
    pub attempt_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_BASE_URL.to_owned(),
            api_key: None,
            primary_model: DEFAULT_PRIMARY_MODEL.to_owned(),
            fallback_models: vec![
                DEFAULT_FALLBACK_MODEL_1.to_owned(),
                DEFAULT_FALLBACK_MODEL_2.to_owned(),
            ],
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            attempt_timeout: Duration::from_secs(DEFAULT_LLM_ATTEMPT_TIMEOUT_SECS),
        }
    }
}

impl LlmConfig {
    /// Candidate models in cascade order, before deduplication
    #[must_use]
    pub fn candidate_models(&self) -> Vec<String> {
        std::iter::once(self.primary_model.clone())
            .chain(self.fallback_models.iter().cloned())
            .collect()
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP bind settings
    pub http: HttpConfig,
    /// Calculation engine service
    pub engines: EngineConfig,
    /// Per-day fan-out and deadline
    pub forecast: ForecastConfig,
    /// Language-model backend
    pub llm: LlmConfig,
    /// Cache store
    pub cache: CacheConfig,
    /// User profile store base URL
    pub profile_service_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the cache configuration is invalid
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let defaults = LlmConfig::default();
        let retry = RetryBackoffConfig::from_env();
        let fallback_models = [
            env_var_or("LLM_FALLBACK_MODEL_1", DEFAULT_FALLBACK_MODEL_1),
            env_var_or("LLM_FALLBACK_MODEL_2", DEFAULT_FALLBACK_MODEL_2),
        ]
        .into_iter()
        .collect();

        let config = Self {
            http: HttpConfig {
                host: env_var_or("HTTP_HOST", "127.0.0.1"),
                port: env_parse_or("HTTP_PORT", DEFAULT_HTTP_PORT),
            },
            engines: EngineConfig {
                service: EngineServiceConfig {
                    base_url: env_var_or("ENGINE_SERVICE_URL", DEFAULT_ENGINE_SERVICE_URL),
                    connect_timeout: Duration::from_secs(env_parse_or(
                        "ENGINE_CONNECT_TIMEOUT_SECS",
                        DEFAULT_CONNECT_TIMEOUT_SECS,
                    )),
                    // the retry bound doubles as the transport's request timeout
                    request_timeout: retry.attempt_timeout,
                },
                retry,
            },
            forecast: ForecastConfig {
                numeric_engine: env_var_or("FORECAST_NUMERIC_ENGINE", DEFAULT_NUMERIC_ENGINE),
                narrative_engines: parse_list(&env_var_or(
                    "FORECAST_NARRATIVE_ENGINES",
                    &format!("{DEFAULT_PRIMARY_NARRATIVE_ENGINE},{DEFAULT_SECONDARY_NARRATIVE_ENGINE}"),
                )),
                request_deadline: Duration::from_secs(env_parse_or(
                    "FORECAST_REQUEST_DEADLINE_SECS",
                    DEFAULT_REQUEST_DEADLINE_SECS,
                )),
            },
            llm: LlmConfig {
                base_url: env_var_or("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
                api_key: env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty()),
                primary_model: env_var_or("LLM_PRIMARY_MODEL", DEFAULT_PRIMARY_MODEL),
                fallback_models,
                max_tokens: env_parse_or("LLM_MAX_TOKENS", defaults.max_tokens),
                temperature: env_parse_or("LLM_TEMPERATURE", defaults.temperature),
                attempt_timeout: Duration::from_secs(env_parse_or(
                    "LLM_ATTEMPT_TIMEOUT_SECS",
                    DEFAULT_LLM_ATTEMPT_TIMEOUT_SECS,
                )),
            },
            cache: CacheConfig::from_env()?,
            profile_service_url: env_var_or("PROFILE_SERVICE_URL", DEFAULT_ENGINE_SERVICE_URL),
        };

        info!(
            http_port = config.http.port,
            engine_service = %config.engines.service.base_url,
            numeric_engine = %config.forecast.numeric_engine,
            primary_model = %config.llm.primary_model,
            cache_backend = ?config.cache.backend,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Human-readable configuration summary, without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Energy Forecast Server Configuration:\n\
             - HTTP: {}:{}\n\
             - Engine service: {}\n\
             - Engines: {} + [{}]\n\
             - Retry: {} attempts, base {}ms, x{}\n\
             - LLM: {} (models: {})\n\
             - LLM API key: {}\n\
             - Cache: {:?}\n\
             - Request deadline: {}s",
            self.http.host,
            self.http.port,
            self.engines.service.base_url,
            self.forecast.numeric_engine,
            self.forecast.narrative_engines.join(", "),
            self.engines.retry.max_attempts,
            self.engines.retry.base_delay.as_millis(),
            self.engines.retry.backoff_multiplier,
            self.llm.base_url,
            self.llm.candidate_models().join(" -> "),
            if self.llm.api_key.is_some() {
                "configured"
            } else {
                "not set"
            },
            self.cache.backend,
            self.forecast.request_deadline.as_secs(),
        )
    }
}
