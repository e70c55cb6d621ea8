use std::path::PathBuf;

use thiserror::Error;

use crate::record::RecordError;

#[derive(Debug, Error)]
pub enum EvalError {
    /// The run references a task the registry doesn't know; aborts the run.
    #[error("unknown task '{name}'")]
    UnknownTask { name: String },

    #[error("task '{name}' is not scored by a judge")]
    NotJudgeTask { name: String },

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("failed to write report to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}
