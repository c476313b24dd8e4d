// ABOUTME: Shared test doubles and fixtures for pipeline integration tests
// ABOUTME: Scripted engine service, scripted language model, and orchestrator wiring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `energy_forecast`
//!
//! Every external collaborator is replaced by an in-process trait
//! implementation so no test touches the network.

use async_trait::async_trait;
use chrono::NaiveDate;
use energy_forecast::cache::Cache;
use energy_forecast::config::cache::CacheTtlConfig;
use energy_forecast::config::environment::ForecastConfig;
use energy_forecast::engines::{
    CalculationEngineService, EngineError, ResilientEngineClient, RetryBackoffConfig,
};
use energy_forecast::errors::AppError;
use energy_forecast::forecast::ForecastOrchestrator;
use energy_forecast::interpretation::{InterpretationConfig, InterpretationService};
use energy_forecast::llm::{ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use energy_forecast::models::UserProfile;
use energy_forecast::profiles::InMemoryProfileStore;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const USER: &str = "u1";
pub const NUMERIC: &str = "biorhythm";
pub const NARRATIVE_A: &str = "iching";
pub const NARRATIVE_B: &str = "tarot";
pub const PRIMARY_MODEL: &str = "primary-model";
pub const FALLBACK_MODEL_1: &str = "fallback-model-1";
pub const FALLBACK_MODEL_2: &str = "fallback-model-2";

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

/// Numeric engine payload with the given overall energy
pub fn numeric_payload(overall_energy: f64) -> Value {
    json!({
        "overall_energy": overall_energy,
        "cycles": {
            "physical": { "percentage": overall_energy },
            "emotional": { "percentage": overall_energy - 10.0 },
            "intellectual": { "percentage": overall_energy + 5.0 }
        }
    })
}

/// Narrative engine payload
pub fn narrative_payload(text: &str) -> Value {
    json!({
        "interpretation": text,
        "keywords": ["clarity", "patience"]
    })
}

/// Well-formed model output covering every section
pub const MODEL_OUTPUT: &str = "## Interpretation
A steady, bright day with room for focused effort and generous conversation.
The readings point to clarity arriving after a patient start.

## Guidance
Start with the hardest task and protect the afternoon for people.

## Insights
- Momentum builds through the morning
- Patience pays off in conversations

## Practical Steps
1. Block two hours of deep work
2. Take a short walk after lunch

## Integration
Close the day by noting what moved forward.";

type EngineScript = VecDeque<Result<Value, EngineError>>;

/// Engine service answering from per-engine scripts
///
/// Each engine pops responses in order; the last response repeats forever.
#[derive(Default)]
pub struct ScriptedEngineService {
    scripts: Mutex<HashMap<String, EngineScript>>,
    calls: Mutex<HashMap<String, u32>>,
    delay: Mutex<HashMap<String, Duration>>,
}

impl ScriptedEngineService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine always answers with `response`
    pub fn with_engine(self, engine: &str, response: Result<Value, EngineError>) -> Self {
        self.with_sequence(engine, vec![response])
    }

    /// Engine answers with `responses` in order
    pub fn with_sequence(self, engine: &str, responses: Vec<Result<Value, EngineError>>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(engine.to_owned(), responses.into());
        self
    }

    /// Engine sleeps before answering
    pub fn with_delay(self, engine: &str, delay: Duration) -> Self {
        self.delay.lock().unwrap().insert(engine.to_owned(), delay);
        self
    }

    /// All three default engines succeed
    pub fn healthy(overall_energy: f64) -> Self {
        Self::new()
            .with_engine(NUMERIC, Ok(numeric_payload(overall_energy)))
            .with_engine(NARRATIVE_A, Ok(narrative_payload("The Creative: steady strength")))
            .with_engine(NARRATIVE_B, Ok(narrative_payload("The Star: renewed hope")))
    }

    pub fn calls(&self, engine: &str) -> u32 {
        self.calls.lock().unwrap().get(engine).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> u32 {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl CalculationEngineService for ScriptedEngineService {
    async fn calculate(&self, engine: &str, _input: &Value) -> Result<Value, EngineError> {
        *self.calls.lock().unwrap().entry(engine.to_owned()).or_default() += 1;
        let delay = self.delay.lock().unwrap().get(engine).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut scripts = self.scripts.lock().unwrap();
        let Some(script) = scripts.get_mut(engine) else {
            return Err(EngineError::from_status(engine, 404, "Engine not found"));
        };
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }

    async fn list_engines(&self) -> Result<Vec<String>, EngineError> {
        let mut names: Vec<String> = self.scripts.lock().unwrap().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn health_check(&self) -> Result<bool, EngineError> {
        Ok(true)
    }
}

/// Scripted behavior of one model
#[derive(Clone)]
pub enum ModelScript {
    /// Answer with this content and finish reason `stop`
    Reply(String),
    /// Answer but report the token budget was exhausted
    Truncated(String),
    /// Fail with an API error
    Fail(String),
    /// Sleep before answering
    Slow(Duration, String),
}

/// Language model answering from per-model scripts
pub struct ScriptedLlm {
    scripts: HashMap<String, ModelScript>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_model(mut self, model: &str, script: ModelScript) -> Self {
        self.scripts.insert(model.to_owned(), script);
        self
    }

    /// Primary model answers with the standard output
    pub fn healthy() -> Self {
        Self::new().with_model(PRIMARY_MODEL, ModelScript::Reply(MODEL_OUTPUT.to_owned()))
    }

    /// Every model fails
    pub fn failing() -> Self {
        Self::new()
    }

    /// Models called so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn reply(model: &str, content: &str, finish_reason: &str) -> ChatResponse {
    ChatResponse {
        content: content.to_owned(),
        model: model.to_owned(),
        usage: Some(TokenUsage {
            prompt_tokens: 200,
            completion_tokens: 150,
            total_tokens: 350,
        }),
        finish_reason: Some(finish_reason.to_owned()),
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        PRIMARY_MODEL
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request.model.clone().unwrap_or_else(|| PRIMARY_MODEL.to_owned());
        self.calls.lock().unwrap().push(model.clone());
        match self.scripts.get(&model).cloned() {
            Some(ModelScript::Reply(content)) => Ok(reply(&model, &content, "stop")),
            Some(ModelScript::Truncated(content)) => Ok(reply(&model, &content, "length")),
            Some(ModelScript::Slow(delay, content)) => {
                tokio::time::sleep(delay).await;
                Ok(reply(&model, &content, "stop"))
            }
            Some(ModelScript::Fail(message)) => Err(AppError::external_service("LLM", message)),
            None => Err(AppError::external_service("LLM", format!("model {model} unavailable"))),
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}

pub fn fast_retry() -> RetryBackoffConfig {
    RetryBackoffConfig {
        max_attempts: 3,
        base_delay: Duration::from_millis(10),
        backoff_multiplier: 2.0,
        attempt_timeout: Duration::from_secs(5),
    }
}

pub fn cascade_config() -> InterpretationConfig {
    InterpretationConfig {
        candidates: vec![
            PRIMARY_MODEL.to_owned(),
            FALLBACK_MODEL_1.to_owned(),
            FALLBACK_MODEL_2.to_owned(),
        ],
        max_tokens: 1500,
        temperature: 0.7,
        attempt_timeout: Duration::from_secs(10),
    }
}

pub fn forecast_config() -> ForecastConfig {
    ForecastConfig {
        numeric_engine: NUMERIC.to_owned(),
        narrative_engines: vec![NARRATIVE_A.to_owned(), NARRATIVE_B.to_owned()],
        request_deadline: Duration::from_secs(90),
    }
}

pub fn test_profile() -> UserProfile {
    UserProfile::with_birth_date(date("1990-03-15"))
}

pub fn memory_cache() -> Cache {
    Cache::in_memory(CacheTtlConfig::default())
}

/// Orchestrator plus handles on its doubles
pub struct Harness {
    pub orchestrator: ForecastOrchestrator,
    pub engines: Arc<ScriptedEngineService>,
    pub llm: Arc<ScriptedLlm>,
    pub profiles: InMemoryProfileStore,
    pub cache: Cache,
}

pub fn harness(engines: ScriptedEngineService, llm: ScriptedLlm) -> Harness {
    let engines = Arc::new(engines);
    let llm = Arc::new(llm);
    let cache = memory_cache();
    let profiles = InMemoryProfileStore::new().with_profile(USER, test_profile());

    let client = ResilientEngineClient::new(engines.clone(), cache.clone(), fast_retry());
    let interpreter = InterpretationService::new(llm.clone(), cascade_config());
    let orchestrator = ForecastOrchestrator::new(
        client,
        interpreter,
        Arc::new(profiles.clone()),
        cache.clone(),
        forecast_config(),
    );

    Harness {
        orchestrator,
        engines,
        llm,
        profiles,
        cache,
    }
}
