use std::time::Duration;

use async_openai::types::chat::{CreateChatCompletionRequest, CreateChatCompletionResponse};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::json;
use tracing::debug;

use super::error::JudgeError;
use super::types::{Conversation, DecodingParams};

#[async_trait]
/// One judge call: a conversation in, the judge's text out.
pub trait JudgeBackend: Send + Sync {
    async fn complete(
        &self,
        conversation: &Conversation,
        params: &DecodingParams,
    ) -> Result<String, JudgeError>;
}

/// OpenAI-compatible `/chat/completions` transport.
pub struct HttpJudgeBackend {
    http: HttpClient,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for HttpJudgeBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpJudgeBackend")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl HttpJudgeBackend {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, JudgeError> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| JudgeError::ClientBuild {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Builds the wire request; fails only if the parameters can't form a valid body.
    pub fn build_request(
        conversation: &Conversation,
        params: &DecodingParams,
    ) -> Result<CreateChatCompletionRequest, JudgeError> {
        let messages: Vec<serde_json::Value> = conversation
            .turns()
            .iter()
            .map(|turn| json!({ "role": turn.role, "content": turn.content }))
            .collect();

        let body = json!({
            "model": params.model,
            "messages": messages,
            "max_completion_tokens": params.max_tokens,
            "temperature": params.temperature,
            "top_p": params.top_p,
            "response_format": { "type": params.response_mode.as_str() },
        });

        serde_json::from_value(body).map_err(|e| JudgeError::MalformedRequest {
            status: 0,
            message: format!("invalid chat completion request: {e}"),
        })
    }
}

#[async_trait]
impl JudgeBackend for HttpJudgeBackend {
    async fn complete(
        &self,
        conversation: &Conversation,
        params: &DecodingParams,
    ) -> Result<String, JudgeError> {
        let request = Self::build_request(conversation, params)?;

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "Judge endpoint returned error status");
            return Err(JudgeError::from_status(status.as_u16(), body));
        }

        let body: CreateChatCompletionResponse =
            resp.json().await.map_err(|e| JudgeError::Api {
                status: Some(status.as_u16()),
                message: format!("undecodable chat completion response: {e}"),
            })?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| JudgeError::Api {
                status: Some(status.as_u16()),
                message: "chat completion response has no choices".to_string(),
            })?;

        Ok(choice.message.content.unwrap_or_default())
    }
}
