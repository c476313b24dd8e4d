// ABOUTME: Configuration management module for server settings resolved at startup
// ABOUTME: Environment-only configuration injected into every pipeline component
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! Configuration is read from the environment once, in `main`, and passed by
//! value into the components that need it. Nothing re-reads the environment
//! after startup.
//!
//! - **environment**: server, engine, forecast and language-model settings
//! - **cache**: cache backend selection, Redis connection tuning and TTLs

/// Cache backend, Redis connection and TTL configuration
pub mod cache;
/// Server configuration from environment variables
pub mod environment;

pub use environment::ServerConfig;

use std::env;
use std::str::FromStr;
use tracing::warn;

/// Parse an environment variable, falling back to `default` when it is unset
/// or does not parse. Unparseable values are logged.
pub(crate) fn env_parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, %default, "Invalid configuration value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Environment variable or default value
pub(crate) fn env_var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// Parse comma-separated values, dropping empties
pub(crate) fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}
