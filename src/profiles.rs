// ABOUTME: User profile store consumed by the forecast orchestrator
// ABOUTME: In-memory store for tests and local runs, HTTP store for the profile service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use crate::errors::{AppError, AppResult};
use crate::models::UserProfile;
use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bound on a profile lookup
const PROFILE_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Source of user birth data and preferences
#[async_trait]
pub trait UserProfileStore: Send + Sync {
    /// Profile for `user_id`, or `None` when the user is unknown
    async fn get_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>>;
}

/// Process-local profile store
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<DashMap<String, UserProfile>>,
}

impl InMemoryProfileStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile
    pub fn insert(&self, user_id: impl Into<String>, profile: UserProfile) {
        self.profiles.insert(user_id.into(), profile);
    }

    /// Builder-style insert
    #[must_use]
    pub fn with_profile(self, user_id: impl Into<String>, profile: UserProfile) -> Self {
        self.insert(user_id, profile);
        self
    }
}

#[async_trait]
impl UserProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        Ok(self.profiles.get(user_id).map(|entry| entry.value().clone()))
    }
}

/// Profile service reached over HTTP at `GET {base}/users/{id}/profile`
#[derive(Debug, Clone)]
pub struct HttpProfileStore {
    client: Client,
    base_url: String,
}

impl HttpProfileStore {
    /// Build a client against `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(base_url: &str) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(PROFILE_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::config(format!("Failed to build profile HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }
}

#[async_trait]
impl UserProfileStore for HttpProfileStore {
    #[instrument(skip(self))]
    async fn get_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let url = format!("{}/users/{user_id}/profile", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::external_service("profile-service", format!("Request failed: {e}"))
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("Profile not found");
                Ok(None)
            }
            status if status.is_success() => {
                let profile = response.json::<UserProfile>().await.map_err(|e| {
                    AppError::external_service("profile-service", format!("Invalid profile: {e}"))
                })?;
                Ok(Some(profile))
            }
            status => Err(AppError::external_service(
                "profile-service",
                format!("Unexpected status {status}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_in_memory_store_round_trip() {
        let birth = NaiveDate::from_ymd_opt(1990, 3, 14).unwrap();
        let store = InMemoryProfileStore::new().with_profile("u1", UserProfile::with_birth_date(birth));

        let profile = store.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.birth_date, Some(birth));
        assert!(store.get_profile("nobody").await.unwrap().is_none());
    }
}
