// ABOUTME: Tests for environment-driven server configuration
// ABOUTME: Serialized because they mutate process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use energy_forecast::cache::CacheBackend;
use energy_forecast::config::environment::ServerConfig;
use energy_forecast::errors::ErrorCode;
use serial_test::serial;
use std::env;
use std::time::Duration;

const VARS: &[&str] = &[
    "HTTP_HOST",
    "HTTP_PORT",
    "ENGINE_SERVICE_URL",
    "ENGINE_ATTEMPT_TIMEOUT_SECS",
    "ENGINE_RETRY_MAX_ATTEMPTS",
    "ENGINE_RETRY_BASE_DELAY_MS",
    "FORECAST_NUMERIC_ENGINE",
    "FORECAST_NARRATIVE_ENGINES",
    "FORECAST_REQUEST_DEADLINE_SECS",
    "FORECAST_DAILY_TTL_SECS",
    "LLM_API_KEY",
    "LLM_PRIMARY_MODEL",
    "LLM_FALLBACK_MODEL_1",
    "LLM_FALLBACK_MODEL_2",
    "CACHE_BACKEND",
    "REDIS_URL",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http.port, 8081);
    assert_eq!(config.http.host, "127.0.0.1");
    assert_eq!(config.forecast.numeric_engine, "biorhythm");
    assert_eq!(config.forecast.narrative_engines, vec!["iching", "tarot"]);
    assert_eq!(config.forecast.request_deadline, Duration::from_secs(90));
    assert_eq!(config.engines.retry.max_attempts, 3);
    assert_eq!(config.engines.retry.base_delay, Duration::from_millis(1000));
    assert_eq!(config.engines.retry.attempt_timeout, Duration::from_secs(30));
    assert_eq!(config.cache.backend, CacheBackend::Memory);
    assert_eq!(config.cache.ttl.engine_result_secs, 300);
    assert_eq!(config.llm.candidate_models().len(), 3);
    assert!(config.llm.api_key.is_none());
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var("HTTP_PORT", "9100");
    env::set_var("FORECAST_NARRATIVE_ENGINES", "tarot, numerology ,");
    env::set_var("ENGINE_RETRY_MAX_ATTEMPTS", "5");
    env::set_var("ENGINE_ATTEMPT_TIMEOUT_SECS", "12");
    env::set_var("LLM_PRIMARY_MODEL", "custom/model");
    env::set_var("FORECAST_DAILY_TTL_SECS", "60");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.http.port, 9100);
    assert_eq!(config.forecast.narrative_engines, vec!["tarot", "numerology"]);
    assert_eq!(config.engines.retry.max_attempts, 5);
    assert_eq!(config.engines.service.request_timeout, Duration::from_secs(12));
    assert_eq!(config.llm.candidate_models()[0], "custom/model");
    assert_eq!(config.cache.ttl.daily_forecast_secs, 60);
}

#[test]
#[serial]
fn test_invalid_numbers_fall_back_to_defaults() {
    clear_env();
    env::set_var("HTTP_PORT", "not-a-port");
    env::set_var("FORECAST_REQUEST_DEADLINE_SECS", "-5");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.http.port, 8081);
    assert_eq!(config.forecast.request_deadline, Duration::from_secs(90));
}

#[test]
#[serial]
fn test_redis_backend_requires_url() {
    clear_env();
    env::set_var("CACHE_BACKEND", "redis");

    let error = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(error.code, ErrorCode::ConfigMissing);
}

#[test]
#[serial]
fn test_unknown_cache_backend_is_invalid() {
    clear_env();
    env::set_var("CACHE_BACKEND", "disk");

    let error = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(error.code, ErrorCode::ConfigInvalid);
}
