// ABOUTME: Resilient calculation engine client with cache-aside lookups and bounded retries
// ABOUTME: Never fails past its boundary; callers receive a tagged success or failure outcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! Each call is keyed by `engine:{name}:{sha256(name:canonical_input)}`.
//! A hit skips the network entirely; a miss runs the retry policy and, on
//! success, stores the output with the engine TTL before returning.

use crate::cache::{Cache, CacheKey};
use forecast_engines::{with_retry, CalculationEngineService, EngineError, RetryBackoffConfig};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Result of one engine invocation
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutcome {
    /// Engine output, from cache or a fresh call
    Success {
        /// Engine name
        engine: String,
        /// Engine output
        data: Value,
        /// Served from cache
        cached: bool,
        /// Network attempts made (zero on a cache hit)
        attempts: u32,
    },
    /// Retries exhausted or a permanent failure
    Failure {
        /// Engine name
        engine: String,
        /// Last error seen
        error: EngineError,
        /// Network attempts made
        attempts: u32,
    },
}

impl EngineOutcome {
    /// Engine this outcome belongs to
    #[must_use]
    pub fn engine(&self) -> &str {
        match self {
            Self::Success { engine, .. } | Self::Failure { engine, .. } => engine,
        }
    }

    /// Whether the call produced data
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Output, if the call succeeded
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Failure message, if the call failed
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error.to_string()),
        }
    }

    /// Whether the final failure was transient
    #[must_use]
    pub fn is_transient_failure(&self) -> bool {
        matches!(self, Self::Failure { error, .. } if error.is_transient())
    }
}

/// JSON text with object keys sorted at every level
#[must_use]
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (index, (key, item)) in entries.into_iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Stable hex hash of `(engine, input)`, independent of key order
#[must_use]
pub fn input_hash(engine: &str, input: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(engine.as_bytes());
    hasher.update(b":");
    hasher.update(canonical_json(input).as_bytes());
    hex::encode(hasher.finalize())
}

/// Engine client adding caching and retry on top of a transport
#[derive(Clone)]
pub struct ResilientEngineClient {
    service: Arc<dyn CalculationEngineService>,
    cache: Cache,
    retry: RetryBackoffConfig,
}

impl ResilientEngineClient {
    /// Wrap a transport
    #[must_use]
    pub fn new(
        service: Arc<dyn CalculationEngineService>,
        cache: Cache,
        retry: RetryBackoffConfig,
    ) -> Self {
        Self {
            service,
            cache,
            retry,
        }
    }

    /// Run `engine` on `input`, consulting the cache first
    pub async fn calculate(&self, engine: &str, input: &Value) -> EngineOutcome {
        self.calculate_with(engine, input, true).await
    }

    /// Run `engine` on `input`; with `read_cache == false` the lookup is
    /// skipped but a successful result still refreshes the entry
    #[instrument(skip(self, input), fields(engine = %engine))]
    pub async fn calculate_with(&self, engine: &str, input: &Value, read_cache: bool) -> EngineOutcome {
        let key = CacheKey::engine(engine, input_hash(engine, input));

        if read_cache {
            if let Some(data) = self.cache.lookup::<Value>(&key).await {
                debug!(cache_key = %key, "Engine cache hit");
                return EngineOutcome::Success {
                    engine: engine.to_owned(),
                    data,
                    cached: true,
                    attempts: 0,
                };
            }
        }

        let service = &*self.service;
        let outcome = with_retry(&self.retry, engine, move |attempt| {
            debug!(engine, attempt, "Calling calculation engine");
            service.calculate(engine, input)
        })
        .await;

        match outcome.result {
            Ok(data) => {
                self.cache.store(&key, &data).await;
                EngineOutcome::Success {
                    engine: engine.to_owned(),
                    data,
                    cached: false,
                    attempts: outcome.attempts,
                }
            }
            Err(error) => {
                warn!(
                    engine,
                    attempts = outcome.attempts,
                    transient = error.is_transient(),
                    error = %error,
                    "Engine call failed after retries"
                );
                EngineOutcome::Failure {
                    engine: engine.to_owned(),
                    error,
                    attempts: outcome.attempts,
                }
            }
        }
    }

    /// Engines offered by the service
    ///
    /// # Errors
    ///
    /// Returns the transport error when the list cannot be fetched
    pub async fn list_engines(&self) -> Result<Vec<String>, EngineError> {
        self.service.list_engines().await
    }

    /// Whether the engine service answers its health probe
    pub async fn health_check(&self) -> bool {
        match self.service.health_check().await {
            Ok(healthy) => healthy,
            Err(error) => {
                warn!(error = %error, "Engine service health check failed");
                false
            }
        }
    }
}
