// ABOUTME: Service Provider Interface for calculation engine services
// ABOUTME: Wire envelope plus the async trait every engine transport implements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use crate::engine_error::EngineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ success, data?, error? }` as returned by the engine service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineEnvelope {
    /// Whether the calculation succeeded
    pub success: bool,
    /// Calculation output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EngineEnvelope {
    /// Parse a response body into engine output
    ///
    /// # Errors
    ///
    /// Returns `Malformed` for unparseable bodies or a success without data,
    /// and `Rejected` when the engine reports failure
    pub fn parse(engine: &str, body: &str) -> Result<Value, EngineError> {
        let envelope: Self = serde_json::from_str(body).map_err(|e| EngineError::Malformed {
            engine: engine.to_owned(),
            message: e.to_string(),
        })?;
        envelope.into_result(engine)
    }

    /// Convert into the engine output
    ///
    /// # Errors
    ///
    /// See [`EngineEnvelope::parse`]
    pub fn into_result(self, engine: &str) -> Result<Value, EngineError> {
        if !self.success {
            return Err(EngineError::Rejected {
                engine: engine.to_owned(),
                message: self
                    .error
                    .unwrap_or_else(|| "calculation failed".to_owned()),
            });
        }
        self.data.ok_or_else(|| EngineError::Malformed {
            engine: engine.to_owned(),
            message: "success response without data".to_owned(),
        })
    }
}

/// Remote calculation engine service
///
/// Implementations perform exactly one attempt per call; retry, timeout and
/// caching policy belong to the caller.
#[async_trait]
pub trait CalculationEngineService: Send + Sync {
    /// Run `engine` on `input`
    async fn calculate(&self, engine: &str, input: &Value) -> Result<Value, EngineError>;

    /// Names of the engines the service offers
    async fn list_engines(&self) -> Result<Vec<String>, EngineError>;

    /// Whether the service is reachable and healthy
    async fn health_check(&self) -> Result<bool, EngineError>;
}
