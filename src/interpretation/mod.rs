// ABOUTME: Interpretation service turning engine readings into narrative guidance
// ABOUTME: Drives a sequential model cascade and scores the parsed result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! # Interpretation Service
//!
//! Candidates are tried strictly in order; a later model is only called once
//! the previous one has definitively failed. A candidate fails when the call
//! errors, runs past its time budget, stops on its token budget, or returns
//! nothing. When every candidate fails the caller falls back to a template.

/// Section extraction from model output
pub mod parser;

pub use parser::{parse_sections, ParsedSections};

use crate::config::environment::LlmConfig;
use crate::constants::llm::{DEFAULT_BASE_CONFIDENCE, FINISH_REASON_LENGTH};
use crate::errors::AppError;
use crate::llm::prompts::{forecast_system_prompt, forecast_user_prompt};
use crate::llm::{ChatMessage, ChatRequest, ChatResponse, LlmProvider};
use crate::models::SymbolicReading;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Interpretation text length above which the response counts as substantive
const SUBSTANTIVE_INTERPRETATION_CHARS: usize = 100;

/// Why a cascade ended without a usable response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretationError {
    /// Every candidate model failed
    #[error("all {} candidate models failed; last error: {last_error}", attempted.len())]
    AllModelsFailed {
        /// Models tried, in order
        attempted: Vec<String>,
        /// Failure of the final candidate
        last_error: String,
    },
    /// No non-empty candidate was configured
    #[error("no candidate models configured")]
    NoCandidates,
}

/// Failure of one candidate
#[derive(Debug, Error)]
enum AttemptFailure {
    #[error("{0}")]
    Provider(AppError),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("stopped at the token budget")]
    TokenBudget,
    #[error("returned empty content")]
    EmptyContent,
}

/// Cascade settings
#[derive(Debug, Clone, PartialEq)]
pub struct InterpretationConfig {
    /// Models in cascade order, already deduplicated
    pub candidates: Vec<String>,
    /// Completion token budget per candidate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Bound on a single candidate call
    pub attempt_timeout: Duration,
}

impl InterpretationConfig {
    /// Cascade settings from the language-model configuration
    #[must_use]
    pub fn from_llm_config(config: &LlmConfig) -> Self {
        Self {
            candidates: candidate_models(config.candidate_models()),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            attempt_timeout: config.attempt_timeout,
        }
    }
}

impl Default for InterpretationConfig {
    fn default() -> Self {
        Self::from_llm_config(&LlmConfig::default())
    }
}

/// Ordered, deduplicated candidate list with blank entries removed
#[must_use]
pub fn candidate_models<I, S>(models: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut candidates: Vec<String> = Vec::new();
    for model in models {
        let model = model.as_ref().trim();
        if !model.is_empty() && !candidates.iter().any(|c| c == model) {
            candidates.push(model.to_owned());
        }
    }
    candidates
}

/// Input to one synthesis call
#[derive(Debug, Clone)]
pub struct InterpretationRequest<'a> {
    /// Forecast date
    pub date: NaiveDate,
    /// User's focus area
    pub focus: Option<&'a str>,
    /// Successful engine results
    pub readings: &'a [SymbolicReading],
    /// Confidence reported by the source reading, if any
    pub reading_confidence: Option<f64>,
}

/// Parsed guidance plus cascade metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretationResult {
    /// Narrative overview
    pub interpretation: String,
    /// Direct advice
    pub guidance: String,
    /// Observations
    pub insights: Vec<String>,
    /// Concrete actions
    pub steps: Vec<String>,
    /// Closing paragraph
    pub integration: String,
    /// Score in `[0, 1]`
    pub confidence: f64,
    /// Model that produced the response
    pub model_used: String,
    /// Every model tried, in order, including the successful one
    pub attempted_models: Vec<String>,
    /// Number of times the cascade moved to the next candidate
    pub model_switches: usize,
}

impl InterpretationResult {
    /// Single synthesis string for the forecast guidance
    #[must_use]
    pub fn synthesis(&self) -> String {
        [self.interpretation.as_str(), self.guidance.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Confidence from the reading's own score and the richness of the response
#[must_use]
pub fn confidence_score(base: Option<f64>, sections: &ParsedSections) -> f64 {
    let mut score = base
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_BASE_CONFIDENCE);
    if sections.interpretation.chars().count() > SUBSTANTIVE_INTERPRETATION_CHARS {
        score += 0.1;
    }
    if !sections.guidance.is_empty() {
        score += 0.1;
    }
    if !sections.insights.is_empty() {
        score += 0.05;
    }
    if !sections.steps.is_empty() {
        score += 0.05;
    }
    score.min(1.0)
}

/// Confidence of the first reading that reports one in `[0, 1]`
#[must_use]
pub fn reading_confidence(readings: &[SymbolicReading]) -> Option<f64> {
    readings.iter().find_map(|reading| {
        reading
            .data
            .get("confidence")
            .and_then(serde_json::Value::as_f64)
            .filter(|c| (0.0..=1.0).contains(c))
    })
}

/// Narrative synthesis over a language-model cascade
#[derive(Clone)]
pub struct InterpretationService {
    provider: Arc<dyn LlmProvider>,
    config: InterpretationConfig,
}

impl InterpretationService {
    /// Create a service; candidates are re-normalized
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, mut config: InterpretationConfig) -> Self {
        config.candidates = candidate_models(&config.candidates);
        Self { provider, config }
    }

    /// Candidate models in cascade order
    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.config.candidates
    }

    /// Provider reachability
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached
    pub async fn health_check(&self) -> Result<bool, AppError> {
        self.provider.health_check().await
    }

    async fn attempt(&self, model: &str, request: &ChatRequest) -> Result<ChatResponse, AttemptFailure> {
        let request = request.clone().with_model(model);
        let response = tokio::time::timeout(self.config.attempt_timeout, self.provider.complete(&request))
            .await
            .map_err(|_| AttemptFailure::Timeout(self.config.attempt_timeout))?
            .map_err(AttemptFailure::Provider)?;

        if response.finish_reason.as_deref() == Some(FINISH_REASON_LENGTH) {
            return Err(AttemptFailure::TokenBudget);
        }
        if response.content.trim().is_empty() {
            return Err(AttemptFailure::EmptyContent);
        }
        Ok(response)
    }

    /// Synthesize guidance for one day
    ///
    /// # Errors
    ///
    /// Returns [`InterpretationError::NoCandidates`] when no model is
    /// configured, or [`InterpretationError::AllModelsFailed`] when every
    /// candidate fails
    #[instrument(skip(self, request), fields(date = %request.date, readings = request.readings.len()))]
    pub async fn interpret(
        &self,
        request: &InterpretationRequest<'_>,
    ) -> Result<InterpretationResult, InterpretationError> {
        if self.config.candidates.is_empty() {
            return Err(InterpretationError::NoCandidates);
        }

        let chat = ChatRequest::new(vec![
            ChatMessage::system(forecast_system_prompt()),
            ChatMessage::user(forecast_user_prompt(
                request.date,
                request.focus,
                request.readings,
            )),
        ])
        .with_max_tokens(self.config.max_tokens)
        .with_temperature(self.config.temperature);

        let mut attempted = Vec::with_capacity(self.config.candidates.len());
        let mut last_error = String::new();
        for model in &self.config.candidates {
            attempted.push(model.clone());
            match self.attempt(model, &chat).await {
                Ok(response) => {
                    let sections = parse_sections(&response.content);
                    let confidence = confidence_score(request.reading_confidence, &sections);
                    let model_switches = attempted.len() - 1;
                    info!(
                        model = %model,
                        model_switches,
                        confidence,
                        tokens = response.usage.map(|u| u.total_tokens),
                        "Synthesis succeeded"
                    );
                    return Ok(InterpretationResult {
                        interpretation: sections.interpretation,
                        guidance: sections.guidance,
                        insights: sections.insights,
                        steps: sections.steps,
                        integration: sections.integration,
                        confidence,
                        model_used: model.clone(),
                        attempted_models: attempted,
                        model_switches,
                    });
                }
                Err(failure) => {
                    warn!(model = %model, error = %failure, "Model failed, moving to next candidate");
                    last_error = format!("{model}: {failure}");
                }
            }
        }

        debug!(attempted = ?attempted, "Model cascade exhausted");
        Err(InterpretationError::AllModelsFailed {
            attempted,
            last_error,
        })
    }
}
