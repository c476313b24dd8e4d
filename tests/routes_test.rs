// ABOUTME: HTTP-level tests for the forecast routes
// ABOUTME: Drives the axum router in process with tower oneshot requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{harness, ScriptedEngineService, ScriptedLlm, USER};
use energy_forecast::routes::{router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let h = harness(ScriptedEngineService::healthy(75.0), ScriptedLlm::healthy());
    router(AppState::new(h.orchestrator))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-user-id", USER)
        .header("x-request-id", "req-test")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_daily_forecast_envelope() {
    let (status, body) = send(app(), get("/api/forecast/daily/2024-06-10")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["cached"], false);
    assert_eq!(body["data"]["date"], "2024-06-10");
    assert_eq!(body["data"]["energyProfile"]["overallEnergy"], "high");
    assert_eq!(body["metadata"]["request_id"], "req-test");
    assert!(body["metadata"]["diagnostics"].is_object());
}

#[tokio::test]
async fn test_missing_user_header_is_unauthorized() {
    let request = Request::builder()
        .uri("/api/forecast/daily/2024-06-10")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "AUTH_REQUIRED");
    assert!(body["error"]["request_id"].is_string());
}

#[tokio::test]
async fn test_malformed_date_is_bad_request() {
    let (status, body) = send(app(), get("/api/forecast/daily/June-10")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_FORMAT");
    assert_eq!(body["error"]["request_id"], "req-test");
}

#[tokio::test]
async fn test_invalid_query_is_bad_request() {
    let (status, body) = send(app(), get("/api/forecast/daily/2024-06-10?use_cache=maybe")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_weekly_forecast_route() {
    let (status, body) = send(app(), get("/api/forecast/weekly/2024-06-12?use_cache=false")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["weekStart"], "2024-06-10");
    assert_eq!(body["data"]["dailyForecasts"].as_array().unwrap().len(), 7);
    assert_eq!(body["metadata"]["degraded_dates"], json!([]));
}

#[tokio::test]
async fn test_batch_forecast_route() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/forecast/batch")
        .header("x-user-id", USER)
        .header("content-type", "application/json")
        .body(Body::from(json!({"dates": ["2024-06-10", "2024-06-11"]}).to_string()))
        .unwrap();

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"]["total"], 2);
    assert_eq!(body["data"]["summary"]["succeeded"], 2);
    assert_eq!(body["data"]["dailyForecasts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_batch_with_unusable_body_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/forecast/batch")
        .header("x-user-id", USER)
        .header("content-type", "application/json")
        .body(Body::from(r#"{"weeks": 2}"#))
        .unwrap();

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_health_reports_dependencies() {
    let (status, body) = send(app(), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cache"]["backend"], "memory");
    assert_eq!(body["engines"]["healthy"], true);
    assert_eq!(
        body["engines"]["available"],
        json!(["biorhythm", "iching", "tarot"])
    );
}

#[tokio::test]
async fn test_clear_cache_drops_user_forecasts() {
    let app = app();
    let daily = "/api/forecast/daily/2024-06-10";
    send(app.clone(), get(daily)).await;
    let (_, cached) = send(app.clone(), get(daily)).await;
    assert_eq!(cached["cached"], true);

    let clear = Request::builder()
        .method("DELETE")
        .uri("/api/forecast/cache")
        .header("x-user-id", USER)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app.clone(), clear).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], 1);

    let (_, recomputed) = send(app, get(daily)).await;
    assert_eq!(recomputed["cached"], false);
}
