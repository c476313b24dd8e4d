// ABOUTME: Redis cache implementation with connection management and TTL support
// ABOUTME: Shares engine results and forecasts across server instances
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use super::{CacheConfig, CacheKey, CacheProvider};
use crate::config::cache::RedisConnectionConfig;
use crate::constants::cache::CACHE_KEY_PREFIX;
use crate::errors::{AppError, AppResult, ErrorCode};
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};

/// Keys fetched per SCAN round trip
const SCAN_BATCH: usize = 100;

fn cache_error(operation: &str, e: &redis::RedisError) -> AppError {
    error!(operation, error = %e, "Redis operation failed");
    AppError::cache(format!("Redis {operation} failed: {e}"))
}

/// Redis cache backed by a reconnecting `ConnectionManager`
///
/// All keys carry `CACHE_KEY_PREFIX` so a shared Redis instance can be cleared
/// safely. Expiry is delegated to Redis (`SET EX`).
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    async fn new_with_config(config: &CacheConfig) -> AppResult<Self> {
        let redis_url = config.redis_url.as_deref().ok_or_else(|| {
            AppError::new(
                ErrorCode::ConfigMissing,
                "REDIS_URL is required for the redis cache backend",
            )
        })?;
        let conn_config = &config.redis_connection;

        info!(
            connect_timeout_secs = conn_config.connection_timeout_secs,
            response_timeout_secs = conn_config.response_timeout_secs,
            retries = conn_config.initial_connection_retries,
            "Connecting to Redis"
        );

        let client = redis::Client::open(redis_url)
            .map_err(|e| AppError::config(format!("Invalid Redis URL: {e}")))?;
        let manager = Self::connect_with_retry(&client, conn_config).await?;

        info!("Connected to Redis");
        Ok(Self { manager })
    }

    async fn connect_with_retry(
        client: &redis::Client,
        conn_config: &RedisConnectionConfig,
    ) -> AppResult<ConnectionManager> {
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(Duration::from_secs(conn_config.connection_timeout_secs))
            .set_response_timeout(Duration::from_secs(conn_config.response_timeout_secs))
            .set_number_of_retries(conn_config.reconnection_retries)
            .set_max_delay(conn_config.max_retry_delay_ms);

        let max_retries = conn_config.initial_connection_retries;
        let mut delay_ms = conn_config.initial_retry_delay_ms;
        let mut attempt = 0;

        loop {
            match ConnectionManager::new_with_config(client.clone(), manager_config.clone()).await {
                Ok(manager) => {
                    if attempt > 0 {
                        info!(attempt, "Redis connection established after retry");
                    }
                    return Ok(manager);
                }
                Err(e) if attempt < max_retries => {
                    attempt += 1;
                    warn!(attempt, max_retries, delay_ms, error = %e, "Redis connection failed, retrying");
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    delay_ms = (delay_ms * 2).min(conn_config.max_retry_delay_ms);
                }
                Err(e) => {
                    return Err(AppError::cache(format!(
                        "Failed to connect to Redis after {} attempts: {e}",
                        max_retries + 1
                    )));
                }
            }
        }
    }

    fn build_key(key: &CacheKey) -> String {
        format!("{CACHE_KEY_PREFIX}{key}")
    }

    /// Delete every key matching `pattern` (already prefixed) using SCAN
    async fn delete_matching(&self, pattern: &str) -> AppResult<u64> {
        let mut conn = self.manager.clone();
        let mut cursor = 0_u64;
        let mut deleted = 0_u64;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| cache_error("SCAN", &e))?;

            if !keys.is_empty() {
                let removed: u64 = conn.del(&keys).await.map_err(|e| cache_error("DEL", &e))?;
                deleted += removed;
            }

            cursor = next;
            if cursor == 0 {
                return Ok(deleted);
            }
        }
    }
}

#[async_trait::async_trait]
impl CacheProvider for RedisCache {
    async fn new(config: CacheConfig) -> AppResult<Self>
    where
        Self: Sized,
    {
        Self::new_with_config(&config).await
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        let serialized = serde_json::to_vec(value)?;
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(Self::build_key(key), serialized, ttl.as_secs().max(1))
            .await
            .map_err(|e| cache_error("SET", &e))
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        let mut conn = self.manager.clone();
        let data: Option<Vec<u8>> = conn
            .get(Self::build_key(key))
            .await
            .map_err(|e| cache_error("GET", &e))?;

        data.map(|bytes| serde_json::from_slice(&bytes).map_err(AppError::from))
            .transpose()
    }

    async fn invalidate(&self, key: &CacheKey) -> AppResult<()> {
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(Self::build_key(key))
            .await
            .map_err(|e| cache_error("DEL", &e))
    }

    async fn invalidate_pattern(&self, pattern: &str) -> AppResult<u64> {
        // glob and Redis MATCH share wildcard syntax
        self.delete_matching(&format!("{CACHE_KEY_PREFIX}{pattern}"))
            .await
    }

    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>> {
        let mut conn = self.manager.clone();
        let secs: i64 = conn
            .ttl(Self::build_key(key))
            .await
            .map_err(|e| cache_error("TTL", &e))?;
        // -2 missing, -1 no expiry
        Ok(u64::try_from(secs).ok().filter(|s| *s > 0).map(Duration::from_secs))
    }

    async fn health_check(&self) -> AppResult<()> {
        let mut conn = self.manager.clone();
        let response: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| cache_error("PING", &e))?;
        if response == "PONG" {
            Ok(())
        } else {
            Err(AppError::cache(format!(
                "Unexpected PING response '{response}'"
            )))
        }
    }

    async fn clear_all(&self) -> AppResult<()> {
        let removed = self.delete_matching(&format!("{CACHE_KEY_PREFIX}*")).await?;
        info!(removed, "Cleared Redis cache namespace");
        Ok(())
    }
}
