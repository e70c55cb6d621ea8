use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_JUDGE_BASE_URL, DEFAULT_JUDGE_BATCH_SIZE, DEFAULT_JUDGE_MAX_TOKENS,
    DEFAULT_JUDGE_MODEL, DEFAULT_JUDGE_TEMPERATURE, DEFAULT_JUDGE_TIMEOUT_SECS,
    DEFAULT_JUDGE_TOP_P, JUDGE_API_KEY_ENV,
};

use super::types::{DecodingParams, ResponseMode};

/// Judge endpoint, credential and decoding settings.
#[derive(Clone)]
pub struct JudgeConfig {
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub batch_size: usize,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub timeout: Duration,
    pub response_mode: ResponseMode,
}

impl std::fmt::Debug for JudgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JudgeConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("batch_size", &self.batch_size)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("timeout", &self.timeout)
            .field("response_mode", &self.response_mode)
            .finish()
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_JUDGE_MODEL.to_string(),
            base_url: DEFAULT_JUDGE_BASE_URL.to_string(),
            api_key: None,
            batch_size: DEFAULT_JUDGE_BATCH_SIZE,
            max_tokens: DEFAULT_JUDGE_MAX_TOKENS,
            temperature: DEFAULT_JUDGE_TEMPERATURE,
            top_p: DEFAULT_JUDGE_TOP_P,
            timeout: Duration::from_secs(DEFAULT_JUDGE_TIMEOUT_SECS),
            response_mode: ResponseMode::Text,
        }
    }
}

impl JudgeConfig {
    const ENV_MODEL: &'static str = "SCISCORE_JUDGE_MODEL";
    const ENV_BASE_URL: &'static str = "SCISCORE_JUDGE_BASE_URL";
    const ENV_BATCH_SIZE: &'static str = "SCISCORE_JUDGE_BATCH_SIZE";
    const ENV_MAX_TOKENS: &'static str = "SCISCORE_JUDGE_MAX_TOKENS";
    const ENV_TEMPERATURE: &'static str = "SCISCORE_JUDGE_TEMPERATURE";

    /// Reads `SCISCORE_JUDGE_*` overrides and the `OPENAI_API_KEY` credential.
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let model = non_empty_var(Self::ENV_MODEL).unwrap_or(defaults.model);
        let base_url = non_empty_var(Self::ENV_BASE_URL).unwrap_or(defaults.base_url);
        let api_key = non_empty_var(JUDGE_API_KEY_ENV);
        let batch_size = parsed_var(Self::ENV_BATCH_SIZE)
            .filter(|&n: &usize| n > 0)
            .unwrap_or(defaults.batch_size);
        let max_tokens = parsed_var(Self::ENV_MAX_TOKENS).unwrap_or(defaults.max_tokens);
        let temperature = parsed_var(Self::ENV_TEMPERATURE).unwrap_or(defaults.temperature);

        Self {
            model,
            base_url,
            api_key,
            batch_size,
            max_tokens,
            temperature,
            ..defaults
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn decoding_params(&self) -> DecodingParams {
        DecodingParams {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            response_mode: self.response_mode,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
