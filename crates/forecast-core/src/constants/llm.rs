// ABOUTME: Language-model cascade defaults for models, token budgets, and timeouts
// ABOUTME: Candidate order is primary first, then the two fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

/// Default chat-completion endpoint
pub const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default primary model
pub const DEFAULT_PRIMARY_MODEL: &str = "anthropic/claude-3.5-sonnet";

/// Default first fallback model
pub const DEFAULT_FALLBACK_MODEL_1: &str = "openai/gpt-4o-mini";

/// Default second fallback model
pub const DEFAULT_FALLBACK_MODEL_2: &str = "meta-llama/llama-3.1-70b-instruct";

/// Token budget per synthesis attempt
pub const DEFAULT_MAX_TOKENS: u32 = 1_500;

/// Sampling temperature for synthesis
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Bound on a single model attempt
pub const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 45;

/// Confidence used when the reading carries none
pub const DEFAULT_BASE_CONFIDENCE: f64 = 0.7;

/// Finish reason reported when the token budget ran out
pub const FINISH_REASON_LENGTH: &str = "length";
