// ABOUTME: Forecast orchestrator coordinating cache, engines, analysis and synthesis
// ABOUTME: Per-day state machine plus weekly and batch fan-out under one request deadline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! # Forecast Orchestrator
//!
//! One day runs `CacheCheck -> Fetch -> Analyze -> Synthesize -> Assemble ->
//! CacheWrite`. Engine calls for a day run concurrently and fail
//! independently; the seven days of a week run concurrently as well. A single
//! deadline bounds the whole request: work still in flight when it passes is
//! abandoned and the day is assembled from what finished.
//!
//! Input errors (malformed dates, unknown user, missing birth date) are
//! returned before any engine is called. A day fails hard only when no engine
//! produced data and nothing is cached for it.

use super::recommendations::{build_recommendations, template_synthesis};
use super::{
    BatchFailure, BatchForecastResponse, BatchRequest, BatchSelection, BatchSummary,
    DailyForecastResponse, EngineFailure, ForecastDiagnostics, ForecastOptions, SynthesisSource,
    WeeklyForecastResponse,
};
use crate::cache::{Cache, CacheKey};
use crate::config::environment::ForecastConfig;
use crate::constants::engines::NUMERIC_FORECAST_DAYS;
use crate::constants::limits::{DAYS_PER_WEEK, MAX_BATCH_DAYS};
use crate::engines::{EngineError, EngineOutcome, ResilientEngineClient};
use crate::errors::{AppError, AppResult};
use crate::interpretation::{
    reading_confidence, InterpretationError, InterpretationRequest, InterpretationService,
};
use crate::models::{
    DailyForecast, EnergyProfile, ForecastGuidance, SymbolicReading, UserProfile, WeeklyForecast,
};
use crate::profiles::UserProfileStore;
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use forecast_intelligence::{
    extract_themes, week_start_of, NumericReading, PredictiveAnalyzer, WeeklySynthesizer,
};
use futures_util::future::join_all;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::{info, instrument, warn};

/// Parse an ISO `YYYY-MM-DD` calendar date
///
/// # Errors
///
/// Returns `INVALID_FORMAT` for anything that is not a real calendar date
pub fn parse_forecast_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::invalid_format(format!("Invalid date '{raw}', expected YYYY-MM-DD"))
    })
}

fn require_user(user_id: &str) -> AppResult<&str> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::auth_required());
    }
    Ok(user_id)
}

/// State shared by every day of one request
struct RequestScope<'a> {
    user_id: &'a str,
    use_cache: bool,
    budget: Duration,
    deadline: Instant,
    profile: OnceCell<UserProfile>,
}

impl<'a> RequestScope<'a> {
    fn new(user_id: &'a str, use_cache: bool, budget: Duration) -> Self {
        Self {
            user_id,
            use_cache,
            budget,
            deadline: Instant::now() + budget,
            profile: OnceCell::new(),
        }
    }
}

/// Engine results for one day, split by role
struct FetchedDay {
    numeric: Option<Value>,
    narrative: Vec<SymbolicReading>,
    diagnostics: ForecastDiagnostics,
}

/// Top-level forecast coordinator
#[derive(Clone)]
pub struct ForecastOrchestrator {
    engines: ResilientEngineClient,
    interpreter: InterpretationService,
    profiles: Arc<dyn UserProfileStore>,
    cache: Cache,
    config: ForecastConfig,
}

impl ForecastOrchestrator {
    /// Wire the pipeline together
    #[must_use]
    pub fn new(
        engines: ResilientEngineClient,
        interpreter: InterpretationService,
        profiles: Arc<dyn UserProfileStore>,
        cache: Cache,
        config: ForecastConfig,
    ) -> Self {
        Self {
            engines,
            interpreter,
            profiles,
            cache,
            config,
        }
    }

    /// Cache store shared with the engine client
    #[must_use]
    pub const fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Resilient engine client
    #[must_use]
    pub const fn engines(&self) -> &ResilientEngineClient {
        &self.engines
    }

    fn budget(&self, options: &ForecastOptions) -> Duration {
        options.deadline.unwrap_or(self.config.request_deadline)
    }

    /// Forecast for one user and date
    ///
    /// # Errors
    ///
    /// Returns an input error for a malformed date, a missing user id, an
    /// unknown user or a profile without birth date, and
    /// `EXTERNAL_SERVICE_UNAVAILABLE` when no engine produced data
    #[instrument(skip(self, options), fields(user_id = %user_id, date = %date))]
    pub async fn generate_daily_forecast(
        &self,
        user_id: &str,
        date: &str,
        options: &ForecastOptions,
    ) -> AppResult<DailyForecastResponse> {
        let user_id = require_user(user_id)?;
        let date = parse_forecast_date(date)?;
        let scope = RequestScope::new(user_id, options.use_cache, self.budget(options));

        let mut response = self.daily(&scope, date).await?;
        if options.raycast_optimized {
            response.forecast = response.forecast.compact();
        }
        Ok(response)
    }

    /// Forecast for the Monday-based week containing `week_start`
    ///
    /// # Errors
    ///
    /// Returns an input error for a malformed date or an unusable profile
    #[instrument(skip(self, options), fields(user_id = %user_id, week_start = %week_start))]
    pub async fn generate_weekly_forecast(
        &self,
        user_id: &str,
        week_start: &str,
        options: &ForecastOptions,
    ) -> AppResult<WeeklyForecastResponse> {
        let user_id = require_user(user_id)?;
        let week_start = parse_forecast_date(week_start)?;
        let scope = RequestScope::new(user_id, options.use_cache, self.budget(options));
        self.weekly(&scope, week_start).await
    }

    /// Drop every daily and weekly forecast cached for `user_id`
    ///
    /// Engine results are keyed by birth data rather than user and stay cached.
    ///
    /// # Errors
    ///
    /// Returns `AUTH_REQUIRED` for a blank user id and `CACHE_ERROR` when the
    /// backend rejects the invalidation
    #[instrument(skip(self))]
    pub async fn clear_user_forecasts(&self, user_id: &str) -> AppResult<u64> {
        let user_id = require_user(user_id)?;
        let daily = self
            .cache
            .invalidate_pattern(&CacheKey::daily_pattern(user_id))
            .await?;
        let weekly = self
            .cache
            .invalidate_pattern(&CacheKey::weekly_pattern(user_id))
            .await?;
        info!(user_id, daily, weekly, "Cleared cached forecasts");
        Ok(daily + weekly)
    }

    /// Forecasts for a list of dates or a run of days from today
    ///
    /// # Errors
    ///
    /// Returns an input error for malformed or out-of-range selections and
    /// for an unusable profile; per-day upstream failures are reported in the
    /// summary instead
    #[instrument(skip(self, request), fields(user_id = %user_id))]
    pub async fn generate_batch_forecast(
        &self,
        user_id: &str,
        request: &BatchRequest,
    ) -> AppResult<BatchForecastResponse> {
        let user_id = require_user(user_id)?;
        let dates = batch_dates(&request.selection, Utc::now().date_naive())?;
        let options = ForecastOptions {
            use_cache: request.use_cache,
            ..ForecastOptions::default()
        };
        let scope = RequestScope::new(user_id, request.use_cache, self.budget(&options));

        let results = join_all(dates.iter().map(|date| self.daily(&scope, *date))).await;

        let mut summary = BatchSummary {
            total: dates.len(),
            ..BatchSummary::default()
        };
        let mut daily_forecasts = Vec::with_capacity(dates.len());
        for (date, result) in dates.iter().zip(results) {
            match result {
                Ok(response) => {
                    summary.succeeded += 1;
                    if response.cached {
                        summary.cache_hits += 1;
                    }
                    summary
                        .energy_distribution
                        .record(response.forecast.energy_profile.overall_energy());
                    daily_forecasts.push(response.forecast);
                }
                Err(error) if error.code.is_client_error() => return Err(error),
                Err(error) => summary.failed_dates.push(BatchFailure {
                    date: *date,
                    code: error.code.to_string(),
                    message: error.message,
                }),
            }
        }

        let weekly_forecast = if request.include_weekly {
            match dates.first() {
                Some(first) => match self.weekly(&scope, *first).await {
                    Ok(weekly) => Some(weekly.forecast),
                    Err(error) => {
                        warn!(error = %error, "Weekly forecast for batch failed");
                        None
                    }
                },
                None => None,
            }
        } else {
            None
        };

        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed_dates.len(),
            cache_hits = summary.cache_hits,
            "Batch forecast complete"
        );
        Ok(BatchForecastResponse {
            daily_forecasts,
            weekly_forecast,
            summary,
        })
    }

    async fn weekly(&self, scope: &RequestScope<'_>, requested: NaiveDate) -> AppResult<WeeklyForecastResponse> {
        let week_start = week_start_of(requested);
        let key = CacheKey::weekly(scope.user_id, week_start);
        if scope.use_cache {
            if let Some(forecast) = self.cache.lookup::<WeeklyForecast>(&key).await {
                info!(%week_start, "Weekly forecast served from cache");
                return Ok(WeeklyForecastResponse {
                    forecast,
                    cached: true,
                    daily_cache_hits: 0,
                    degraded_dates: Vec::new(),
                });
            }
        }

        let days: Vec<NaiveDate> = (0_i64..)
            .take(DAYS_PER_WEEK)
            .map(|offset| week_start + ChronoDuration::days(offset))
            .collect();
        let results = join_all(days.iter().map(|date| self.daily(scope, *date))).await;

        let mut daily_forecasts = Vec::with_capacity(DAYS_PER_WEEK);
        let mut degraded_dates = Vec::new();
        let mut daily_cache_hits = 0;
        for (date, result) in days.into_iter().zip(results) {
            match result {
                Ok(response) => {
                    if response.cached {
                        daily_cache_hits += 1;
                    }
                    daily_forecasts.push(response.forecast);
                }
                Err(error) if error.code.is_client_error() => return Err(error),
                Err(error) => {
                    warn!(%date, error = %error, "Day failed, using placeholder");
                    degraded_dates.push(date);
                    daily_forecasts.push(DailyForecast::placeholder(date));
                }
            }
        }

        let forecast = WeeklySynthesizer::synthesize(week_start, daily_forecasts)?;
        if forecast.has_degraded_days() {
            warn!(%week_start, degraded = degraded_dates.len(), "Weekly forecast has placeholders, not caching");
        } else {
            self.cache.store(&key, &forecast).await;
        }
        info!(%week_start, daily_cache_hits, "Weekly forecast assembled");

        Ok(WeeklyForecastResponse {
            forecast,
            cached: false,
            daily_cache_hits,
            degraded_dates,
        })
    }

    async fn profile<'s>(&self, scope: &'s RequestScope<'_>) -> AppResult<&'s UserProfile> {
        scope
            .profile
            .get_or_try_init(|| async {
                let profile = self
                    .profiles
                    .get_profile(scope.user_id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Profile for user {}", scope.user_id)))?;
                profile.required_birth_date()?;
                Ok::<_, AppError>(profile)
            })
            .await
    }

    async fn daily(&self, scope: &RequestScope<'_>, date: NaiveDate) -> AppResult<DailyForecastResponse> {
        let key = CacheKey::daily(scope.user_id, date);
        if scope.use_cache {
            if let Some(forecast) = self.cache.lookup::<DailyForecast>(&key).await {
                info!(%date, "Daily forecast served from cache");
                return Ok(DailyForecastResponse {
                    forecast,
                    cached: true,
                    diagnostics: ForecastDiagnostics::cache_hit(),
                });
            }
        }

        let profile = self.profile(scope).await?;
        let fetched = self.fetch(scope, profile, date).await;

        if fetched.numeric.is_none() && fetched.narrative.is_empty() {
            if !scope.use_cache {
                if let Some(forecast) = self.cache.lookup::<DailyForecast>(&key).await {
                    warn!(%date, "No engine produced data, serving previous cached forecast");
                    return Ok(DailyForecastResponse {
                        forecast,
                        cached: true,
                        diagnostics: fetched.diagnostics,
                    });
                }
            }
            return Err(AppError::unavailable(format!(
                "No calculation engine produced data for {date}"
            )));
        }

        let response = self.assemble(scope, profile, date, fetched).await;
        self.cache.store(&key, &response.forecast).await;
        Ok(response)
    }

    async fn fetch(&self, scope: &RequestScope<'_>, profile: &UserProfile, date: NaiveDate) -> FetchedDay {
        let numeric_input = numeric_input(profile, date);
        let narrative_input = narrative_input(profile, date);

        let numeric_call = self.bounded_call(scope, &self.config.numeric_engine, &numeric_input);
        let narrative_calls = join_all(
            self.config
                .narrative_engines
                .iter()
                .map(|engine| self.bounded_call(scope, engine, &narrative_input)),
        );
        let (numeric, narrative) = tokio::join!(numeric_call, narrative_calls);

        let mut diagnostics = ForecastDiagnostics {
            cache_hit: false,
            ..ForecastDiagnostics::cache_hit()
        };
        let mut record = |outcome: &EngineOutcome| match outcome {
            EngineOutcome::Success { engine, cached, .. } => {
                diagnostics.engines_succeeded.push(engine.clone());
                if *cached {
                    diagnostics.engines_cached.push(engine.clone());
                }
            }
            EngineOutcome::Failure {
                engine,
                error,
                attempts,
            } => {
                if matches!(error, EngineError::Timeout { .. }) && Instant::now() >= scope.deadline {
                    diagnostics.deadline_exceeded = true;
                }
                diagnostics.engines_failed.push(EngineFailure {
                    engine: engine.clone(),
                    error: error.to_string(),
                    attempts: *attempts,
                    transient: error.is_transient(),
                });
            }
        };
        record(&numeric);
        narrative.iter().for_each(&mut record);

        let narrative = narrative
            .into_iter()
            .filter_map(|outcome| match outcome {
                EngineOutcome::Success { engine, data, .. } => Some(SymbolicReading { engine, data }),
                EngineOutcome::Failure { .. } => None,
            })
            .collect();
        let numeric = match numeric {
            EngineOutcome::Success { data, .. } => Some(data),
            EngineOutcome::Failure { .. } => None,
        };

        FetchedDay {
            numeric,
            narrative,
            diagnostics,
        }
    }

    /// Engine call cut off at the request deadline
    async fn bounded_call(&self, scope: &RequestScope<'_>, engine: &str, input: &Value) -> EngineOutcome {
        let call = self.engines.calculate_with(engine, input, scope.use_cache);
        match tokio::time::timeout_at(scope.deadline, call).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(engine, "Request deadline reached, abandoning engine call");
                EngineOutcome::Failure {
                    engine: engine.to_owned(),
                    error: EngineError::timeout(engine, scope.budget),
                    attempts: 0,
                }
            }
        }
    }

    async fn assemble(
        &self,
        scope: &RequestScope<'_>,
        profile: &UserProfile,
        date: NaiveDate,
        fetched: FetchedDay,
    ) -> DailyForecastResponse {
        let FetchedDay {
            numeric,
            narrative,
            mut diagnostics,
        } = fetched;

        let (energy_profile, insights) = numeric.as_ref().map_or_else(
            || (EnergyProfile::neutral(), None),
            |payload| {
                let reading = NumericReading::from_payload(date, payload);
                (reading.energy_profile(), Some(PredictiveAnalyzer::analyze(&reading)))
            },
        );

        let mut model_inputs = narrative.clone();
        if let Some(payload) = numeric {
            model_inputs.push(SymbolicReading {
                engine: self.config.numeric_engine.clone(),
                data: payload,
            });
        }
        let synthesis = self
            .synthesize(scope, profile, date, &model_inputs, &mut diagnostics)
            .await
            .unwrap_or_else(|| {
                warn!(%date, "Using template synthesis");
                diagnostics.synthesis_source = Some(SynthesisSource::Template);
                template_synthesis(date, &energy_profile)
            });

        let key_themes = extract_themes(&narrative, &synthesis);
        let guidance = ForecastGuidance::new(narrative, synthesis, key_themes);
        let recommendations = build_recommendations(date, &energy_profile, insights.as_ref());
        let forecast = DailyForecast::new(date, energy_profile, guidance, recommendations, insights);

        info!(
            %date,
            energy = %forecast.energy_profile.overall_energy(),
            engines_ok = diagnostics.engines_succeeded.len(),
            engines_failed = diagnostics.engines_failed.len(),
            model = diagnostics.model_used.as_deref().unwrap_or("template"),
            "Daily forecast assembled"
        );
        DailyForecastResponse {
            forecast,
            cached: false,
            diagnostics,
        }
    }

    /// Model synthesis within the remaining deadline; `None` means use the template
    async fn synthesize(
        &self,
        scope: &RequestScope<'_>,
        profile: &UserProfile,
        date: NaiveDate,
        readings: &[SymbolicReading],
        diagnostics: &mut ForecastDiagnostics,
    ) -> Option<String> {
        if Instant::now() >= scope.deadline {
            diagnostics.deadline_exceeded = true;
            return None;
        }
        let request = InterpretationRequest {
            date,
            focus: profile.focus(),
            readings,
            reading_confidence: reading_confidence(readings),
        };
        match tokio::time::timeout_at(scope.deadline, self.interpreter.interpret(&request)).await {
            Ok(Ok(result)) => {
                let synthesis = result.synthesis();
                diagnostics.model_used = Some(result.model_used);
                diagnostics.attempted_models = result.attempted_models;
                diagnostics.model_switches = result.model_switches;
                diagnostics.confidence = Some(result.confidence);
                diagnostics.synthesis_source = Some(SynthesisSource::Model);
                (!synthesis.trim().is_empty()).then_some(synthesis)
            }
            Ok(Err(error)) => {
                if let InterpretationError::AllModelsFailed { attempted, .. } = &error {
                    diagnostics.attempted_models.clone_from(attempted);
                    diagnostics.model_switches = attempted.len().saturating_sub(1);
                }
                warn!(%date, error = %error, "Synthesis failed");
                None
            }
            Err(_) => {
                warn!(%date, "Request deadline reached during synthesis");
                diagnostics.deadline_exceeded = true;
                None
            }
        }
    }
}

fn numeric_input(profile: &UserProfile, date: NaiveDate) -> Value {
    json!({
        "birth_date": profile.birth_date,
        "target_date": date,
        "forecast_days": NUMERIC_FORECAST_DAYS,
    })
}

fn narrative_input(profile: &UserProfile, date: NaiveDate) -> Value {
    let mut input = json!({
        "birth_date": profile.birth_date,
        "date": date,
    });
    if let Some(map) = input.as_object_mut() {
        if let Some(time) = profile.birth_time {
            map.insert("birth_time".to_owned(), json!(time.format("%H:%M").to_string()));
        }
        if let Some(location) = &profile.location {
            map.insert("location".to_owned(), json!(location));
        }
        if let Some(focus) = profile.focus() {
            map.insert("question".to_owned(), json!(focus));
        }
    }
    input
}

/// Resolve a batch selection to sorted, unique dates
fn batch_dates(selection: &BatchSelection, today: NaiveDate) -> AppResult<Vec<NaiveDate>> {
    let dates = match selection {
        BatchSelection::Dates { dates } => {
            let mut parsed = dates
                .iter()
                .map(|raw| parse_forecast_date(raw))
                .collect::<AppResult<Vec<_>>>()?;
            parsed.sort_unstable();
            parsed.dedup();
            parsed
        }
        BatchSelection::Days { days } => {
            let count = usize::try_from(*days).unwrap_or(usize::MAX);
            if !(1..=MAX_BATCH_DAYS).contains(&count) {
                return Err(batch_size_error(count));
            }
            (0_i64..)
                .take(count)
                .map(|offset| today + ChronoDuration::days(offset))
                .collect()
        }
    };
    if dates.is_empty() || dates.len() > MAX_BATCH_DAYS {
        return Err(batch_size_error(dates.len()));
    }
    Ok(dates)
}

fn batch_size_error(count: usize) -> AppError {
    AppError::invalid_input(format!(
        "A batch covers 1 to {MAX_BATCH_DAYS} days, got {count}"
    ))
}
