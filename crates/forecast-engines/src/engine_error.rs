// ABOUTME: Typed classification of calculation engine failures
// ABOUTME: Transient failures are retried; permanent failures abort immediately
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use std::time::Duration;
use thiserror::Error;

/// Failure of a single engine call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Attempt exceeded its time bound
    #[error("{engine} timed out after {timeout_ms}ms")]
    Timeout {
        /// Engine name
        engine: String,
        /// Bound that was exceeded
        timeout_ms: u64,
    },
    /// Could not reach the service
    #[error("{engine} connection failed: {message}")]
    Connection {
        /// Engine name
        engine: String,
        /// Transport message
        message: String,
    },
    /// Server-side or throttling status (5xx, 408, 429)
    #[error("{engine} server error ({status}): {message}")]
    Server {
        /// Engine name
        engine: String,
        /// HTTP status
        status: u16,
        /// Response excerpt
        message: String,
    },
    /// Caller-side status (other 4xx)
    #[error("{engine} rejected request ({status}): {message}")]
    Client {
        /// Engine name
        engine: String,
        /// HTTP status
        status: u16,
        /// Response excerpt
        message: String,
    },
    /// Engine answered with `success: false`
    #[error("{engine} reported failure: {message}")]
    Rejected {
        /// Engine name
        engine: String,
        /// Engine error message
        message: String,
    },
    /// Response body could not be understood
    #[error("{engine} returned malformed data: {message}")]
    Malformed {
        /// Engine name
        engine: String,
        /// Parse failure
        message: String,
    },
}

impl EngineError {
    /// Classify an HTTP status
    #[must_use]
    pub fn from_status(engine: &str, status: u16, body: &str) -> Self {
        let message: String = body.chars().take(200).collect();
        match status {
            408 | 429 | 500..=599 => Self::Server {
                engine: engine.to_owned(),
                status,
                message,
            },
            _ => Self::Client {
                engine: engine.to_owned(),
                status,
                message,
            },
        }
    }

    /// Timeout for `engine` after `timeout`
    #[must_use]
    pub fn timeout(engine: &str, timeout: Duration) -> Self {
        Self::Timeout {
            engine: engine.to_owned(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Whether another attempt may succeed
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Connection { .. } | Self::Server { .. }
        )
    }

    /// Engine the failure belongs to
    #[must_use]
    pub fn engine(&self) -> &str {
        match self {
            Self::Timeout { engine, .. }
            | Self::Connection { engine, .. }
            | Self::Server { engine, .. }
            | Self::Client { engine, .. }
            | Self::Rejected { engine, .. }
            | Self::Malformed { engine, .. } => engine,
        }
    }
}
