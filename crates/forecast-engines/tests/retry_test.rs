// ABOUTME: Tests for engine retry policy timing and classification
// ABOUTME: Uses paused tokio time so backoff delays are observed exactly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use forecast_engines::{with_retry, EngineError, RetryBackoffConfig};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

fn policy() -> RetryBackoffConfig {
    RetryBackoffConfig {
        max_attempts: 3,
        base_delay: Duration::from_secs(1),
        backoff_multiplier: 2.0,
        attempt_timeout: Duration::from_secs(30),
    }
}

fn unavailable() -> EngineError {
    EngineError::from_status("biorhythm", 503, "Service Unavailable")
}

#[test]
fn test_delay_schedule() {
    let config = policy();
    assert_eq!(config.delay_before(1), Duration::ZERO);
    assert_eq!(config.delay_before(2), Duration::from_secs(1));
    assert_eq!(config.delay_before(3), Duration::from_secs(2));
    assert_eq!(config.delay_before(4), Duration::from_secs(4));
}

#[test]
fn test_delay_saturates_for_long_retry_chains() {
    let config = RetryBackoffConfig {
        max_attempts: 100,
        ..policy()
    };
    assert_eq!(config.delay_before(70), Duration::MAX);
    assert_eq!(config.delay_before(u32::MAX), Duration::MAX);
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_retry_with_backoff() {
    let started = Instant::now();
    let starts = Arc::new(Mutex::new(Vec::new()));

    let outcome = with_retry(&policy(), "biorhythm", |_attempt| {
        let starts = Arc::clone(&starts);
        async move {
            starts.lock().unwrap().push(started.elapsed());
            Err::<(), _>(unavailable())
        }
    })
    .await;

    assert_eq!(outcome.attempts, 3);
    assert!(outcome.result.unwrap_err().is_transient());
    let starts = starts.lock().unwrap().clone();
    assert_eq!(
        starts,
        vec![Duration::ZERO, Duration::from_secs(1), Duration::from_secs(3)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_permanent_failure_not_retried() {
    let calls = Arc::new(AtomicU32::new(0));
    let outcome = with_retry(&policy(), "tarot", |_| {
        let calls = Arc::clone(&calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(EngineError::from_status("tarot", 400, "bad input"))
        }
    })
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.attempts, 1);
    assert!(matches!(outcome.result, Err(EngineError::Client { status: 400, .. })));
}

#[tokio::test(start_paused = true)]
async fn test_recovers_after_transient_failure() {
    let outcome = with_retry(&policy(), "iching", |attempt| async move {
        if attempt < 2 {
            Err(unavailable())
        } else {
            Ok(attempt)
        }
    })
    .await;

    assert_eq!(outcome.attempts, 2);
    assert_eq!(outcome.result.unwrap(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_attempt_timeout_counts_as_transient() {
    let mut config = policy();
    config.attempt_timeout = Duration::from_secs(5);
    config.max_attempts = 2;

    let outcome = with_retry(&config, "biorhythm", |_| async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok::<_, EngineError>(())
    })
    .await;

    assert_eq!(outcome.attempts, 2);
    assert!(matches!(
        outcome.result,
        Err(EngineError::Timeout { timeout_ms: 5000, .. })
    ));
}
