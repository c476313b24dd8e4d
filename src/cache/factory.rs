// ABOUTME: Cache facade with configuration-based backend selection
// ABOUTME: Lookup and store never fail the caller; backend errors become misses or dropped writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use super::memory::InMemoryCache;
use super::redis::RedisCache;
use super::{CacheBackend, CacheConfig, CacheKey, CacheProvider};
use crate::config::cache::CacheTtlConfig;
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Clone)]
enum Backend {
    Memory(InMemoryCache),
    Redis(RedisCache),
}

/// Unified cache interface used by the pipeline
#[derive(Clone)]
pub struct Cache {
    backend: Backend,
    ttl: CacheTtlConfig,
}

impl Cache {
    /// Create the configured backend
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis backend is selected without a URL or
    /// cannot be reached
    pub async fn new(config: CacheConfig) -> AppResult<Self> {
        let ttl = config.ttl.clone();
        let backend = match config.backend {
            CacheBackend::Memory => {
                info!(max_entries = config.max_entries, "Initializing in-memory cache");
                Backend::Memory(InMemoryCache::new(config).await?)
            }
            CacheBackend::Redis => Backend::Redis(RedisCache::new(config).await?),
        };
        Ok(Self { backend, ttl })
    }

    /// In-memory cache without a background sweep
    #[must_use]
    pub fn in_memory(ttl: CacheTtlConfig) -> Self {
        let config = CacheConfig {
            enable_background_cleanup: false,
            ttl: ttl.clone(),
            ..CacheConfig::default()
        };
        Self {
            backend: Backend::Memory(InMemoryCache::new_with_config(&config)),
            ttl,
        }
    }

    /// Backend label for health output
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory(_) => "memory",
            Backend::Redis(_) => "redis",
        }
    }

    /// Configured TTLs
    #[must_use]
    pub const fn ttl_config(&self) -> &CacheTtlConfig {
        &self.ttl
    }

    /// Read a value; absence, expiry, backend failure and undecodable data all
    /// come back as `None`
    pub async fn lookup<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> Option<T> {
        match self.get(key).await {
            Ok(hit) => {
                debug!(cache_key = %key, hit = hit.is_some(), "Cache lookup");
                hit
            }
            Err(e) => {
                warn!(cache_key = %key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// Write a value with its namespace TTL; failures are logged and dropped
    pub async fn store<T: Serialize + Send + Sync>(&self, key: &CacheKey, value: &T) {
        self.store_for(key, value, key.ttl(&self.ttl)).await;
    }

    /// Write a value with an explicit TTL; failures are logged and dropped
    pub async fn store_for<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) {
        if let Err(e) = self.set(key, value, ttl).await {
            warn!(cache_key = %key, error = %e, "Cache write failed, continuing without cache");
        }
    }

    /// Store value in cache with TTL
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or storage fails
    pub async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        match &self.backend {
            Backend::Memory(cache) => cache.set(key, value, ttl).await,
            Backend::Redis(cache) => cache.set(key, value, ttl).await,
        }
    }

    /// Retrieve value from cache
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or deserialization fails
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        match &self.backend {
            Backend::Memory(cache) => cache.get(key).await,
            Backend::Redis(cache) => cache.get(key).await,
        }
    }

    /// Remove single cache entry
    ///
    /// # Errors
    ///
    /// Returns an error if invalidation fails
    pub async fn invalidate(&self, key: &CacheKey) -> AppResult<()> {
        match &self.backend {
            Backend::Memory(cache) => cache.invalidate(key).await,
            Backend::Redis(cache) => cache.invalidate(key).await,
        }
    }

    /// Remove all cache entries matching a glob pattern
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid or the backend fails
    pub async fn invalidate_pattern(&self, pattern: &str) -> AppResult<u64> {
        let removed = match &self.backend {
            Backend::Memory(cache) => cache.invalidate_pattern(pattern).await,
            Backend::Redis(cache) => cache.invalidate_pattern(pattern).await,
        }?;
        info!(pattern, removed, "Invalidated cache entries");
        Ok(removed)
    }

    /// Remaining TTL for key
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    pub async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>> {
        match &self.backend {
            Backend::Memory(cache) => cache.ttl(key).await,
            Backend::Redis(cache) => cache.ttl(key).await,
        }
    }

    /// Verify cache backend is healthy
    ///
    /// # Errors
    ///
    /// Returns an error if health check fails
    pub async fn health_check(&self) -> AppResult<()> {
        match &self.backend {
            Backend::Memory(cache) => cache.health_check().await,
            Backend::Redis(cache) => cache.health_check().await,
        }
    }

    /// Clear all cache entries
    ///
    /// # Errors
    ///
    /// Returns an error if clear operation fails
    pub async fn clear_all(&self) -> AppResult<()> {
        match &self.backend {
            Backend::Memory(cache) => cache.clear_all().await,
            Backend::Redis(cache) => cache.clear_all().await,
        }
    }
}
