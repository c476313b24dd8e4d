// ABOUTME: Forecast route handlers for daily, weekly and batch requests
// ABOUTME: Translates HTTP parameters into orchestrator calls and wraps the results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use super::{request_id, user_id, ApiResponse, AppState};
use crate::constants::routes::{BATCH_FORECAST, DAILY_FORECAST, FORECAST_CACHE, WEEKLY_FORECAST};
use crate::errors::{AppError, AppResult};
use crate::forecast::{BatchRequest, ForecastOptions};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{info_span, Instrument};

/// Query parameters for the daily endpoint
#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    /// Compact launcher view
    #[serde(default)]
    pub raycast: bool,
    /// Read through the forecast cache
    #[serde(default = "default_true")]
    pub use_cache: bool,
}

/// Query parameters for the weekly endpoint
#[derive(Debug, Deserialize)]
pub struct WeeklyQuery {
    /// Read through the forecast cache
    #[serde(default = "default_true")]
    pub use_cache: bool,
}

const fn default_true() -> bool {
    true
}

/// Forecast routes implementation
pub struct ForecastRoutes;

impl ForecastRoutes {
    /// Create the forecast routes
    #[must_use]
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route(DAILY_FORECAST, get(daily_handler))
            .route(WEEKLY_FORECAST, get(weekly_handler))
            .route(BATCH_FORECAST, post(batch_handler))
            .route(FORECAST_CACHE, delete(clear_cache_handler))
            .with_state(state)
    }
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::invalid_input(rejection.body_text()))
}

async fn daily_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(date): Path<String>,
    query: Result<Query<DailyQuery>, QueryRejection>,
) -> Response {
    let request_id = request_id(&headers);
    let span = info_span!("daily_forecast", request_id = %request_id);
    let result = async {
        let user_id = user_id(&headers)?;
        let query = query_params(query)?;
        let options = ForecastOptions {
            raycast_optimized: query.raycast,
            use_cache: query.use_cache,
            ..ForecastOptions::default()
        };
        state
            .orchestrator
            .generate_daily_forecast(&user_id, &date, &options)
            .await
    }
    .instrument(span)
    .await;

    match result {
        Ok(response) => Json(ApiResponse::new(
            response.forecast,
            response.cached,
            &request_id,
            json!({ "diagnostics": response.diagnostics }),
        ))
        .into_response(),
        Err(error) => error.with_request_id(request_id).into_response(),
    }
}

async fn weekly_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(week_start): Path<String>,
    query: Result<Query<WeeklyQuery>, QueryRejection>,
) -> Response {
    let request_id = request_id(&headers);
    let span = info_span!("weekly_forecast", request_id = %request_id);
    let result = async {
        let user_id = user_id(&headers)?;
        let query = query_params(query)?;
        let options = ForecastOptions {
            use_cache: query.use_cache,
            ..ForecastOptions::default()
        };
        state
            .orchestrator
            .generate_weekly_forecast(&user_id, &week_start, &options)
            .await
    }
    .instrument(span)
    .await;

    match result {
        Ok(response) => Json(ApiResponse::new(
            response.forecast,
            response.cached,
            &request_id,
            json!({
                "daily_cache_hits": response.daily_cache_hits,
                "degraded_dates": response.degraded_dates,
            }),
        ))
        .into_response(),
        Err(error) => error.with_request_id(request_id).into_response(),
    }
}

async fn batch_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let request_id = request_id(&headers);
    let span = info_span!("batch_forecast", request_id = %request_id);
    let result = async {
        let user_id = user_id(&headers)?;
        let Json(request) =
            body.map_err(|rejection| AppError::invalid_input(rejection.body_text()))?;
        state
            .orchestrator
            .generate_batch_forecast(&user_id, &request)
            .await
    }
    .instrument(span)
    .await;

    match result {
        Ok(response) => {
            let cached = response.summary.total > 0
                && response.summary.cache_hits == response.summary.total;
            Json(ApiResponse::new(response, cached, &request_id, json!({})))
                .into_response()
        }
        Err(error) => error.with_request_id(request_id).into_response(),
    }
}

async fn clear_cache_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let request_id = request_id(&headers);
    let span = info_span!("clear_forecast_cache", request_id = %request_id);
    let result = async {
        let user_id = user_id(&headers)?;
        state.orchestrator.clear_user_forecasts(&user_id).await
    }
    .instrument(span)
    .await;

    match result {
        Ok(removed) => Json(ApiResponse::new(
            json!({ "removed": removed }),
            false,
            &request_id,
            json!({}),
        ))
        .into_response(),
        Err(error) => error.with_request_id(request_id).into_response(),
    }
}
