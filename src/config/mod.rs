//! Environment-backed configuration for an evaluation run.
//!
//! Only the input path is required. Override the rest with `SCISCORE_*` environment
//! variables; judge settings live in [`crate::judge::JudgeConfig`].

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::{Path, PathBuf};

/// Default report location used when `SCISCORE_OUTPUT_PATH` is not set.
pub const DEFAULT_OUTPUT_PATH: &str = "./outputs.json";

/// Run configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Records file (JSON array or JSON lines). Required.
    pub data_path: Option<PathBuf>,

    /// Where the nested score report is written. Default: `./outputs.json`.
    pub output_path: PathBuf,

    /// Word2vec vectors (binary or text). Relation tasks are unavailable without it.
    pub word2vec_path: Option<PathBuf>,

    /// Judge prompt templates (JSON). Judge tasks are unavailable without it.
    pub prompts_path: Option<PathBuf>,

    /// Also score the free-text generation tasks. Default: false.
    pub generation_tasks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            word2vec_path: None,
            prompts_path: None,
            generation_tasks: false,
        }
    }
}

impl Config {
    pub const ENV_DATA_PATH: &'static str = "SCISCORE_DATA_PATH";
    pub const ENV_OUTPUT_PATH: &'static str = "SCISCORE_OUTPUT_PATH";
    pub const ENV_WORD2VEC_PATH: &'static str = "SCISCORE_WORD2VEC_PATH";
    pub const ENV_PROMPTS_PATH: &'static str = "SCISCORE_PROMPTS_PATH";
    pub const ENV_GENERATION_TASKS: &'static str = "SCISCORE_GENERATION_TASKS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            data_path: Self::parse_optional_path_from_env(Self::ENV_DATA_PATH),
            output_path: Self::parse_optional_path_from_env(Self::ENV_OUTPUT_PATH)
                .unwrap_or(defaults.output_path),
            word2vec_path: Self::parse_optional_path_from_env(Self::ENV_WORD2VEC_PATH),
            prompts_path: Self::parse_optional_path_from_env(Self::ENV_PROMPTS_PATH),
            generation_tasks: Self::parse_flag_from_env(Self::ENV_GENERATION_TASKS),
        })
    }

    /// Checks that every configured input exists and is a file.
    ///
    /// Does not touch the output path; its parent directories are created on write.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let data_path = self.data_path()?;
        Self::require_file(data_path)?;

        if let Some(ref path) = self.word2vec_path {
            Self::require_file(path)?;
        }

        if let Some(ref path) = self.prompts_path {
            Self::require_file(path)?;
        }

        if self.output_path.is_dir() {
            return Err(ConfigError::NotAFile {
                path: self.output_path.clone(),
            });
        }

        Ok(())
    }

    /// The records path, or [`ConfigError::MissingEnvVar`] if unset.
    pub fn data_path(&self) -> Result<&Path, ConfigError> {
        self.data_path
            .as_deref()
            .ok_or(ConfigError::MissingEnvVar {
                name: Self::ENV_DATA_PATH,
            })
    }

    fn require_file(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(ConfigError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_flag_from_env(var_name: &str) -> bool {
        env::var(var_name)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false)
    }
}
