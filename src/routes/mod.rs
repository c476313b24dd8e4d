// ABOUTME: HTTP route assembly for the forecast API
// ABOUTME: Shared state, request identity extraction, and the success envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! # Routes
//!
//! Authentication happens upstream; the authenticated user id arrives in the
//! `x-user-id` header. Every response carries a `success` flag, and failures
//! use the [`ErrorResponse`](crate::errors::ErrorResponse) envelope with the
//! request id attached.

/// Daily, weekly and batch forecast endpoints
pub mod forecast;
/// Service health endpoint
pub mod health;

pub use forecast::ForecastRoutes;
pub use health::HealthRoutes;

use crate::constants::routes::{REQUEST_ID_HEADER, USER_ID_HEADER};
use crate::errors::{AppError, AppResult};
use crate::forecast::ForecastOrchestrator;
use axum::http::HeaderMap;
use axum::Router;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Forecast pipeline
    pub orchestrator: Arc<ForecastOrchestrator>,
}

impl AppState {
    /// Wrap an orchestrator
    #[must_use]
    pub fn new(orchestrator: ForecastOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Full API router
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(state.clone()))
        .merge(ForecastRoutes::routes(state))
}

/// Caller-supplied request id, or a fresh one
#[must_use]
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map_or_else(|| format!("req_{}", Uuid::new_v4().simple()), str::to_owned)
}

/// Authenticated user id from the gateway header
///
/// # Errors
///
/// Returns `AUTH_REQUIRED` when the header is absent or blank
pub fn user_id(headers: &HeaderMap) -> AppResult<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or_else(AppError::auth_required)
}

/// Success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true`
    pub success: bool,
    /// Payload
    pub data: T,
    /// Whether the payload came from cache
    pub cached: bool,
    /// Request id, generation time and per-endpoint details
    pub metadata: Value,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap `data`, merging `details` into the metadata object
    #[must_use]
    pub fn new(data: T, cached: bool, request_id: &str, details: Value) -> Self {
        let mut metadata = serde_json::json!({
            "request_id": request_id,
            "generated_at": Utc::now().to_rfc3339(),
        });
        if let (Some(target), Value::Object(extra)) = (metadata.as_object_mut(), details) {
            target.extend(extra);
        }
        Self {
            success: true,
            data,
            cached,
            metadata,
        }
    }
}
