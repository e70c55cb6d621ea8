//! sciscore library crate (used by the batch binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Inputs
//! - [`ExampleRecord`], [`load_records`] - Model outputs with gold answers
//! - [`Config`], [`ConfigError`] - Run configuration
//! - [`WordVectors`] - Pretrained word2vec embeddings
//!
//! ## Deterministic Scoring
//! - [`parse_items`], [`StructuredItem`], [`Arity`] - Relation output parsing
//! - [`SimilarityIndex`] - Lexical + embedding entity similarity
//! - [`RelationScorer`], [`MatchCounts`] - Matching F1
//! - Classification, filling and generation scorers in [`scoring`]
//!
//! ## Judge-Based Scoring
//! - [`JudgeClient`], [`JudgeBackend`], [`HttpJudgeBackend`] - Batched, retrying judge calls
//! - [`PromptLibrary`], [`PromptTemplate`] - Judge prompt templates
//! - [`VerdictGrammar`], [`aggregate`] - Verdict interpretation
//!
//! ## Orchestration
//! - [`TaskRegistry`], [`TaskSpec`] - Benchmark task table
//! - [`Evaluator`], [`RunReport`], [`TaskScore`] - Run driver and nested report
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod evaluate;
pub mod judge;
pub mod prompts;
pub mod record;
pub mod relation;
pub mod scoring;
pub mod similarity;
pub mod tasks;

pub use aggregate::{AggregateError, VerdictGrammar, aggregate, aggregate_responses};
pub use config::{Config, ConfigError};
pub use constants::{ITEM_MATCH_THRESHOLD, SLOT_MATCH_THRESHOLD};
pub use embedding::{EmbeddingError, WordVectorFormat, WordVectors};
pub use evaluate::{EvalError, Evaluator, RunReport, TaskScore};
#[cfg(any(test, feature = "mock"))]
pub use judge::{MockJudgeBackend, MockOutcome};
pub use judge::{
    Conversation, DecodingParams, ErrorClass, HttpJudgeBackend, JudgeBackend, JudgeClient,
    JudgeConfig, JudgeError, JudgeResponse, RetryPolicy,
};
pub use prompts::{PromptError, PromptLibrary, PromptTemplate};
pub use record::{Answer, ExampleRecord, RecordError, load_records};
pub use relation::{Arity, StructuredItem, parse_items, parse_optional_items};
pub use scoring::{
    GenerationScore, MatchCounts, MatchResult, RelationScore, RelationScorer, ScoringError,
};
pub use similarity::SimilarityIndex;
pub use tasks::{Domain, Level, ScoringStrategy, TaskRegistry, TaskSpec};
