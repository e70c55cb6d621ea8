use std::path::PathBuf;

use thiserror::Error;

use crate::aggregate::AggregateError;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("failed to read prompt templates from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid prompt template file: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown prompt template '{name}'")]
    UnknownTemplate { name: String },

    #[error("template field '{field}' not present in record")]
    MissingField { field: String },

    #[error("malformed template: {reason}")]
    MalformedTemplate { reason: String },

    #[error(transparent)]
    Grammar(#[from] AggregateError),
}
