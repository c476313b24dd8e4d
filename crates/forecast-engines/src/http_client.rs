// ABOUTME: HTTP transport for the calculation engine service
// ABOUTME: One attempt per call with pooled connections; status codes become typed errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use crate::constants::engines::{
    DEFAULT_ATTEMPT_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_ENGINE_SERVICE_URL,
};
use crate::engine_error::EngineError;
use crate::errors::{AppError, AppResult};
use crate::spi::{CalculationEngineService, EngineEnvelope};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Name used in errors for calls not tied to a specific engine
const SERVICE_NAME: &str = "engine-service";

/// Connection settings for the engine service
#[derive(Debug, Clone)]
pub struct EngineServiceConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// TCP connect bound
    pub connect_timeout: Duration,
    /// Whole-request bound
    pub request_timeout: Duration,
}

impl Default for EngineServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ENGINE_SERVICE_URL.to_owned(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_ATTEMPT_TIMEOUT_SECS),
        }
    }
}

/// Engine service reached over HTTP
///
/// - `POST {base}/engines/{name}/calculate` with the input as JSON body
/// - `GET {base}/engines` for the engine list
/// - `GET {base}/health` for liveness
#[derive(Debug, Clone)]
pub struct HttpEngineService {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpEngineService {
    /// Build a client with pooled connections and the configured timeouts
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(config: EngineServiceConfig) -> AppResult<Self> {
        let client = ClientBuilder::new()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build engine HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            request_timeout: config.request_timeout,
        })
    }

    /// Base URL calls are made against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(&self, engine: &str, error: &reqwest::Error) -> EngineError {
        if error.is_timeout() {
            EngineError::timeout(engine, self.request_timeout)
        } else if let Some(status) = error.status() {
            EngineError::from_status(engine, status.as_u16(), &error.to_string())
        } else if error.is_decode() {
            EngineError::Malformed {
                engine: engine.to_owned(),
                message: error.to_string(),
            }
        } else {
            EngineError::Connection {
                engine: engine.to_owned(),
                message: error.to_string(),
            }
        }
    }

    async fn get_text(&self, path: &str) -> Result<String, EngineError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|e| self.transport_error(SERVICE_NAME, &e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(SERVICE_NAME, &e))?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(EngineError::from_status(SERVICE_NAME, status.as_u16(), &body))
        }
    }
}

/// Accepts `["a", "b"]` or `{"engines": [...]}`; entries may be names or `{ "name": .. }`
fn parse_engine_list(body: &str) -> Result<Vec<String>, EngineError> {
    let value: Value = serde_json::from_str(body).map_err(|e| EngineError::Malformed {
        engine: SERVICE_NAME.to_owned(),
        message: e.to_string(),
    })?;
    let entries = match &value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("engines").or_else(|| map.get("data")) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(EngineError::Malformed {
                    engine: SERVICE_NAME.to_owned(),
                    message: "engine list missing".to_owned(),
                })
            }
        },
        _ => {
            return Err(EngineError::Malformed {
                engine: SERVICE_NAME.to_owned(),
                message: "unexpected engine list shape".to_owned(),
            })
        }
    };
    Ok(entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(name) => Some(name.clone()),
            Value::Object(map) => map.get("name").and_then(Value::as_str).map(str::to_owned),
            _ => None,
        })
        .collect())
}

#[async_trait]
impl CalculationEngineService for HttpEngineService {
    async fn calculate(&self, engine: &str, input: &Value) -> Result<Value, EngineError> {
        let url = format!("{}/engines/{engine}/calculate", self.base_url);
        debug!(engine, %url, "Calling calculation engine");

        let response = self
            .client
            .post(&url)
            .json(input)
            .send()
            .await
            .map_err(|e| self.transport_error(engine, &e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(engine, &e))?;

        if !status.is_success() {
            return Err(EngineError::from_status(engine, status.as_u16(), &body));
        }
        EngineEnvelope::parse(engine, &body)
    }

    async fn list_engines(&self) -> Result<Vec<String>, EngineError> {
        let body = self.get_text("/engines").await?;
        parse_engine_list(&body)
    }

    async fn health_check(&self) -> Result<bool, EngineError> {
        match self.get_text("/health").await {
            Ok(_) => Ok(true),
            Err(EngineError::Server { .. } | EngineError::Client { .. }) => Ok(false),
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_list_shapes() {
        assert_eq!(
            parse_engine_list(r#"["biorhythm","iching"]"#).unwrap(),
            vec!["biorhythm", "iching"]
        );
        assert_eq!(
            parse_engine_list(r#"{"engines":[{"name":"tarot"},"numerology"]}"#).unwrap(),
            vec!["tarot", "numerology"]
        );
        assert!(parse_engine_list(r#"{"status":"ok"}"#).is_err());
    }

    #[test]
    fn test_base_url_normalized() {
        let service = HttpEngineService::new(EngineServiceConfig {
            base_url: "http://engines.local:8000/".to_owned(),
            ..EngineServiceConfig::default()
        })
        .unwrap();
        assert_eq!(service.base_url(), "http://engines.local:8000");
    }

    #[tokio::test]
    async fn test_request_timeout_reports_configured_bound() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let silent = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let service = HttpEngineService::new(EngineServiceConfig {
            base_url: format!("http://{address}"),
            connect_timeout: Duration::from_secs(1),
            request_timeout: Duration::from_millis(200),
        })
        .unwrap();
        let error = service
            .calculate("biorhythm", &serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            EngineError::Timeout { ref engine, timeout_ms: 200 } if engine == "biorhythm"
        ));
        silent.abort();
    }
}
