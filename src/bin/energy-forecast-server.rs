// ABOUTME: Server binary for the energy forecast HTTP API
// ABOUTME: Loads environment config, builds the pipeline clients, and serves the router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! # Energy Forecast Server Binary
//!
//! Starts the forecast API with the cache backend, calculation engine client,
//! model cascade and profile store selected by environment variables.

use anyhow::Result;
use clap::Parser;
use energy_forecast::{
    cache::Cache,
    config::environment::ServerConfig,
    constants::service_names::ENERGY_FORECAST_SERVER,
    engines::{HttpEngineService, ResilientEngineClient},
    forecast::ForecastOrchestrator,
    interpretation::{InterpretationConfig, InterpretationService},
    llm::{OpenAiCompatibleConfig, OpenAiCompatibleProvider},
    logging,
    profiles::HttpProfileStore,
    routes::{self, AppState},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "energy-forecast-server")]
#[command(about = "Energy forecast API - engine fan-out, model synthesis and weekly aggregation")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Override bind address
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http.port = port;
    }
    if let Some(host) = args.host {
        config.http.host = host;
    }

    logging::init_from_env()?;
    info!("Starting {ENERGY_FORECAST_SERVER}");
    info!("{}", config.summary());

    let cache = Cache::new(config.cache.clone()).await?;
    info!(backend = cache.backend_name(), "Cache initialized");

    let engine_service = HttpEngineService::new(config.engines.service.clone())?;
    let engines = ResilientEngineClient::new(
        Arc::new(engine_service),
        cache.clone(),
        config.engines.retry.clone(),
    );

    let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::from_llm_config(&config.llm))?;
    if config.llm.api_key.is_none() {
        warn!("LLM_API_KEY not set; forecasts will use template synthesis if the backend rejects requests");
    }
    let interpreter = InterpretationService::new(
        Arc::new(provider),
        InterpretationConfig::from_llm_config(&config.llm),
    );

    let profiles = HttpProfileStore::new(&config.profile_service_url)?;
    let orchestrator = ForecastOrchestrator::new(
        engines,
        interpreter,
        Arc::new(profiles),
        cache,
        config.forecast.clone(),
    );

    let app = routes::router(AppState::new(orchestrator)).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.http.host, config.http.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(error = %error, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
