//! LLM-as-judge client.
//!
//! [`JudgeClient`] sends ordered [`Conversation`]s to a [`JudgeBackend`] in concurrent
//! batches and retries each failed call per its [`ErrorClass`]. Requests that still
//! fail come back as [`JudgeResponse::Failed`] in their original position.

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod retry;
pub mod types;

#[cfg(test)]
mod tests;

pub use backend::{HttpJudgeBackend, JudgeBackend};
pub use client::JudgeClient;
pub use config::JudgeConfig;
pub use error::{ErrorClass, JudgeError};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockJudgeBackend, MockOutcome};
pub use retry::{BackoffTable, RetryPolicy};
pub use types::{
    Conversation, DecodingParams, JudgeRequest, JudgeResponse, ResponseMode, RetryState, Role,
    Turn,
};
