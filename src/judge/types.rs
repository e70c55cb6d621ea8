use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_JUDGE_MAX_TOKENS, DEFAULT_JUDGE_MODEL, DEFAULT_JUDGE_TEMPERATURE, DEFAULT_JUDGE_TOP_P,
};

use super::error::ErrorClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// The full message list for one judge call.
///
/// The client keeps no history between calls; every request carries its own turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, role: Role, content: impl Into<String>) -> Self {
        self.turns.push(Turn {
            role,
            content: content.into(),
        });
        self
    }

    pub fn system(self, content: impl Into<String>) -> Self {
        self.push(Role::System, content)
    }

    pub fn user(self, content: impl Into<String>) -> Self {
        self.push(Role::User, content)
    }

    pub fn assistant(self, content: impl Into<String>) -> Self {
        self.push(Role::Assistant, content)
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Content of the last user turn, if any.
    pub fn last_user(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == Role::User)
            .map(|t| t.content.as_str())
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// A conversation tagged with its position in the caller's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeRequest {
    pub position: usize,
    pub conversation: Conversation,
}

/// Attempts spent on one request and what the last failure was.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    pub attempts: u32,
    pub last_error: Option<ErrorClass>,
}

impl RetryState {
    pub fn record_failure(&mut self, class: ErrorClass) {
        self.attempts += 1;
        self.last_error = Some(class);
    }
}

/// Judge output for one request: its text, or the failure sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JudgeResponse {
    Text(String),
    Failed(RetryState),
}

impl JudgeResponse {
    pub fn text(&self) -> Option<&str> {
        match self {
            JudgeResponse::Text(t) => Some(t),
            JudgeResponse::Failed(_) => None,
        }
    }

    /// The judge text, or `""` for the failure sentinel.
    pub fn text_or_empty(&self) -> &str {
        self.text().unwrap_or_default()
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, JudgeResponse::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    #[default]
    Text,
    JsonObject,
}

impl ResponseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseMode::Text => "text",
            ResponseMode::JsonObject => "json_object",
        }
    }
}

/// Sampling settings sent with every judge call.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodingParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub response_mode: ResponseMode,
}

impl Default for DecodingParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_JUDGE_MODEL.to_string(),
            max_tokens: DEFAULT_JUDGE_MAX_TOKENS,
            temperature: DEFAULT_JUDGE_TEMPERATURE,
            top_p: DEFAULT_JUDGE_TOP_P,
            response_mode: ResponseMode::Text,
        }
    }
}

impl DecodingParams {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}
