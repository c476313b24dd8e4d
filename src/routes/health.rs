// ABOUTME: Health route reporting cache and calculation engine availability
// ABOUTME: Returns 503 when either dependency is down
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use super::AppState;
use crate::constants::routes::HEALTH;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::warn;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    #[must_use]
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route(HEALTH, get(health_handler))
            .with_state(state)
    }
}

async fn health_handler(State(state): State<AppState>) -> Response {
    let cache = state.orchestrator.cache();
    let cache_error = cache.health_check().await.err();
    if let Some(error) = &cache_error {
        warn!(error = %error, "Cache health check failed");
    }
    let engines = state.orchestrator.engines();
    let engines_healthy = engines.health_check().await;
    let available = if engines_healthy {
        engines.list_engines().await.unwrap_or_else(|error| {
            warn!(error = %error, "Engine list unavailable");
            Vec::new()
        })
    } else {
        Vec::new()
    };

    let healthy = cache_error.is_none() && engines_healthy;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = json!({
        "success": healthy,
        "status": if healthy { "healthy" } else { "degraded" },
        "cache": {
            "backend": cache.backend_name(),
            "healthy": cache_error.is_none(),
        },
        "engines": { "healthy": engines_healthy, "available": available },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    (status, Json(body)).into_response()
}
