//! Cross-cutting, shared constants.
//!
//! # Matching Thresholds
//!
//! Slot-level and whole-item matching use different similarity thresholds. Both values
//! are load-bearing for previously published scores, so they are kept as two distinct
//! constants rather than a single tunable.

/// `same_entity` threshold for slot-level (per-entity) matching.
pub const SLOT_MATCH_THRESHOLD: f64 = 0.9;

/// `same_entity` threshold applied to every slot during whole-item matching.
pub const ITEM_MATCH_THRESHOLD: f64 = 0.95;

/// Number of judge requests dispatched concurrently before the batch barrier.
pub const DEFAULT_JUDGE_BATCH_SIZE: usize = 100;

/// Attempts per request inside one dispatch pass (first try included).
pub const DEFAULT_MAX_INNER_ATTEMPTS: u32 = 3;

/// Extra passes over requests that came back as the failure sentinel.
pub const DEFAULT_MAX_OUTER_PASSES: u32 = 1;

/// Default judge model identifier.
pub const DEFAULT_JUDGE_MODEL: &str = "gpt-4o";

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_JUDGE_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_JUDGE_MAX_TOKENS: u32 = 64;

pub const DEFAULT_JUDGE_TEMPERATURE: f32 = 0.0;

pub const DEFAULT_JUDGE_TOP_P: f32 = 1.0;

pub const DEFAULT_JUDGE_TIMEOUT_SECS: u64 = 180;

/// Environment variable holding the judge credential.
pub const JUDGE_API_KEY_ENV: &str = "OPENAI_API_KEY";
