// ABOUTME: Integration tests for the resilient engine client
// ABOUTME: Covers retry bounds, permanent failures, and engine-tier caching
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{memory_cache, numeric_payload, ScriptedEngineService, NUMERIC};
use energy_forecast::engines::{EngineError, EngineOutcome, ResilientEngineClient, RetryBackoffConfig};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn one_second_backoff() -> RetryBackoffConfig {
    RetryBackoffConfig {
        max_attempts: 3,
        base_delay: Duration::from_secs(1),
        backoff_multiplier: 2.0,
        attempt_timeout: Duration::from_secs(30),
    }
}

fn unavailable() -> EngineError {
    EngineError::from_status(NUMERIC, 503, "Service Unavailable")
}

fn input() -> serde_json::Value {
    json!({"birth_date": "1990-03-15", "target_date": "2024-06-10", "forecast_days": 7})
}

#[tokio::test(start_paused = true)]
async fn test_two_transient_failures_then_success_takes_three_calls() {
    let service = Arc::new(ScriptedEngineService::new().with_sequence(
        NUMERIC,
        vec![Err(unavailable()), Err(unavailable()), Ok(numeric_payload(75.0))],
    ));
    let client = ResilientEngineClient::new(service.clone(), memory_cache(), one_second_backoff());

    let started = Instant::now();
    let outcome = client.calculate(NUMERIC, &input()).await;

    assert_eq!(service.calls(NUMERIC), 3);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_millis(3100));
    match outcome {
        EngineOutcome::Success {
            cached, attempts, ..
        } => {
            assert!(!cached);
            assert_eq!(attempts, 3);
        }
        EngineOutcome::Failure { error, .. } => panic!("expected success, got {error}"),
    }
}

#[tokio::test]
async fn test_successful_result_is_served_from_cache() {
    let service = Arc::new(ScriptedEngineService::new().with_engine(NUMERIC, Ok(numeric_payload(40.0))));
    let client = ResilientEngineClient::new(service.clone(), memory_cache(), one_second_backoff());

    let first = client.calculate(NUMERIC, &input()).await;
    let second = client.calculate(NUMERIC, &input()).await;

    assert_eq!(service.calls(NUMERIC), 1);
    assert_eq!(first.data(), second.data());
    assert!(matches!(second, EngineOutcome::Success { cached: true, .. }));
}

#[tokio::test]
async fn test_cache_key_ignores_input_key_order() {
    let service = Arc::new(ScriptedEngineService::new().with_engine(NUMERIC, Ok(numeric_payload(40.0))));
    let client = ResilientEngineClient::new(service.clone(), memory_cache(), one_second_backoff());

    client.calculate(NUMERIC, &json!({"a": 1, "b": 2})).await;
    client.calculate(NUMERIC, &json!({"b": 2, "a": 1})).await;

    assert_eq!(service.calls(NUMERIC), 1);
}

#[tokio::test]
async fn test_permanent_failure_is_not_retried() {
    let service = Arc::new(ScriptedEngineService::new().with_engine(
        NUMERIC,
        Err(EngineError::from_status(NUMERIC, 400, "birth_date is required")),
    ));
    let client = ResilientEngineClient::new(service.clone(), memory_cache(), one_second_backoff());

    let outcome = client.calculate(NUMERIC, &input()).await;

    assert_eq!(service.calls(NUMERIC), 1);
    assert!(!outcome.is_success());
    assert!(!outcome.is_transient_failure());
    assert!(outcome.error_message().unwrap().contains("birth_date"));
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_transient_failure_reports_attempts() {
    let service = Arc::new(ScriptedEngineService::new().with_engine(NUMERIC, Err(unavailable())));
    let client = ResilientEngineClient::new(service.clone(), memory_cache(), one_second_backoff());

    let outcome = client.calculate(NUMERIC, &input()).await;

    assert_eq!(service.calls(NUMERIC), 3);
    assert!(outcome.is_transient_failure());
    assert!(matches!(outcome, EngineOutcome::Failure { attempts: 3, .. }));
}

#[tokio::test(start_paused = true)]
async fn test_slow_attempt_times_out_and_retries() {
    let service = Arc::new(
        ScriptedEngineService::new()
            .with_engine(NUMERIC, Ok(numeric_payload(40.0)))
            .with_delay(NUMERIC, Duration::from_secs(60)),
    );
    let client = ResilientEngineClient::new(service.clone(), memory_cache(), one_second_backoff());

    let outcome = client.calculate(NUMERIC, &input()).await;

    assert_eq!(service.calls(NUMERIC), 3);
    match outcome {
        EngineOutcome::Failure { error, .. } => {
            assert!(matches!(error, EngineError::Timeout { .. }));
        }
        EngineOutcome::Success { .. } => panic!("expected timeout"),
    }
}

#[tokio::test]
async fn test_skipping_cache_read_still_refreshes_entry() {
    let service = Arc::new(ScriptedEngineService::new().with_sequence(
        NUMERIC,
        vec![Ok(numeric_payload(10.0)), Ok(numeric_payload(90.0))],
    ));
    let client = ResilientEngineClient::new(service.clone(), memory_cache(), one_second_backoff());

    client.calculate(NUMERIC, &input()).await;
    let fresh = client.calculate_with(NUMERIC, &input(), false).await;
    let cached = client.calculate(NUMERIC, &input()).await;

    assert_eq!(service.calls(NUMERIC), 2);
    assert_eq!(fresh.data(), Some(&numeric_payload(90.0)));
    assert_eq!(cached.data(), Some(&numeric_payload(90.0)));
    assert!(matches!(cached, EngineOutcome::Success { cached: true, .. }));
}
