// ABOUTME: Integration tests for the model cascade in the interpretation service
// ABOUTME: Verifies ordering, switch counting, and each per-candidate failure trigger
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{
    cascade_config, date, narrative_payload, ModelScript, ScriptedLlm, FALLBACK_MODEL_1,
    FALLBACK_MODEL_2, MODEL_OUTPUT, PRIMARY_MODEL,
};
use energy_forecast::interpretation::{
    InterpretationConfig, InterpretationError, InterpretationRequest, InterpretationService,
};
use energy_forecast::models::SymbolicReading;
use std::sync::Arc;
use std::time::Duration;

fn readings() -> Vec<SymbolicReading> {
    vec![SymbolicReading {
        engine: "iching".to_owned(),
        data: narrative_payload("The Creative"),
    }]
}

fn service(llm: &Arc<ScriptedLlm>) -> InterpretationService {
    InterpretationService::new(llm.clone(), cascade_config())
}

fn request(readings: &[SymbolicReading]) -> InterpretationRequest<'_> {
    InterpretationRequest {
        date: date("2024-06-10"),
        focus: Some("career"),
        readings,
        reading_confidence: None,
    }
}

#[tokio::test]
async fn test_primary_success_needs_no_switch() {
    let llm = Arc::new(ScriptedLlm::healthy());
    let readings = readings();

    let result = service(&llm).interpret(&request(&readings)).await.unwrap();

    assert_eq!(result.model_used, PRIMARY_MODEL);
    assert_eq!(result.model_switches, 0);
    assert_eq!(result.attempted_models, vec![PRIMARY_MODEL]);
    assert!(result.guidance.starts_with("Start with the hardest task"));
    assert_eq!(result.insights.len(), 2);
    assert_eq!(result.steps.len(), 2);
    assert!((result.confidence - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_primary_error_falls_back_to_first_fallback() {
    let llm = Arc::new(
        ScriptedLlm::new()
            .with_model(PRIMARY_MODEL, ModelScript::Fail("quota exceeded".to_owned()))
            .with_model(FALLBACK_MODEL_1, ModelScript::Reply(MODEL_OUTPUT.to_owned()))
            .with_model(FALLBACK_MODEL_2, ModelScript::Reply(MODEL_OUTPUT.to_owned())),
    );
    let readings = readings();

    let result = service(&llm).interpret(&request(&readings)).await.unwrap();

    assert_eq!(result.model_used, FALLBACK_MODEL_1);
    assert_eq!(result.model_switches, 1);
    assert_eq!(result.attempted_models, vec![PRIMARY_MODEL, FALLBACK_MODEL_1]);
    assert_eq!(llm.calls(), vec![PRIMARY_MODEL, FALLBACK_MODEL_1]);
}

#[tokio::test]
async fn test_token_budget_and_empty_content_trigger_cascade() {
    let llm = Arc::new(
        ScriptedLlm::new()
            .with_model(PRIMARY_MODEL, ModelScript::Truncated("## Interpretation\nA day".to_owned()))
            .with_model(FALLBACK_MODEL_1, ModelScript::Reply("   \n ".to_owned()))
            .with_model(FALLBACK_MODEL_2, ModelScript::Reply(MODEL_OUTPUT.to_owned())),
    );
    let readings = readings();

    let result = service(&llm).interpret(&request(&readings)).await.unwrap();

    assert_eq!(result.model_used, FALLBACK_MODEL_2);
    assert_eq!(result.model_switches, 2);
    assert_eq!(
        result.attempted_models,
        vec![PRIMARY_MODEL, FALLBACK_MODEL_1, FALLBACK_MODEL_2]
    );
}

#[tokio::test(start_paused = true)]
async fn test_slow_candidate_times_out_and_cascades() {
    let llm = Arc::new(
        ScriptedLlm::new()
            .with_model(
                PRIMARY_MODEL,
                ModelScript::Slow(Duration::from_secs(120), MODEL_OUTPUT.to_owned()),
            )
            .with_model(FALLBACK_MODEL_1, ModelScript::Reply(MODEL_OUTPUT.to_owned())),
    );
    let readings = readings();

    let result = service(&llm).interpret(&request(&readings)).await.unwrap();

    assert_eq!(result.model_used, FALLBACK_MODEL_1);
    assert_eq!(result.model_switches, 1);
}

#[tokio::test]
async fn test_all_models_failing_reports_every_attempt() {
    let llm = Arc::new(ScriptedLlm::failing());
    let readings = readings();

    let error = service(&llm).interpret(&request(&readings)).await.unwrap_err();

    match error {
        InterpretationError::AllModelsFailed {
            attempted,
            last_error,
        } => {
            assert_eq!(attempted, vec![PRIMARY_MODEL, FALLBACK_MODEL_1, FALLBACK_MODEL_2]);
            assert!(last_error.starts_with(FALLBACK_MODEL_2));
        }
        InterpretationError::NoCandidates => panic!("expected AllModelsFailed"),
    }
}

#[tokio::test]
async fn test_blank_and_duplicate_candidates_are_skipped() {
    let llm = Arc::new(ScriptedLlm::failing());
    let config = InterpretationConfig {
        candidates: vec![
            PRIMARY_MODEL.to_owned(),
            String::new(),
            PRIMARY_MODEL.to_owned(),
        ],
        ..cascade_config()
    };
    let readings = readings();

    let service = InterpretationService::new(llm.clone(), config);
    assert_eq!(service.candidates(), [PRIMARY_MODEL.to_owned()]);

    let error = service.interpret(&request(&readings)).await.unwrap_err();
    assert!(matches!(error, InterpretationError::AllModelsFailed { ref attempted, .. } if attempted.len() == 1));
    assert_eq!(llm.calls(), vec![PRIMARY_MODEL]);
}

#[tokio::test]
async fn test_no_candidates_is_an_error() {
    let llm = Arc::new(ScriptedLlm::healthy());
    let config = InterpretationConfig {
        candidates: Vec::new(),
        ..cascade_config()
    };
    let readings = readings();

    let error = InterpretationService::new(llm.clone(), config)
        .interpret(&request(&readings))
        .await
        .unwrap_err();

    assert_eq!(error, InterpretationError::NoCandidates);
    assert!(llm.calls().is_empty());
}
