use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("word vector file not found at path: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load word vectors: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("invalid word vector header: {reason}")]
    InvalidHeader { reason: String },

    #[error("word vector file truncated after {loaded} of {expected} entries")]
    Truncated { loaded: usize, expected: usize },

    #[error("vector for '{token}' has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        token: String,
        expected: usize,
        actual: usize,
    },
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        EmbeddingError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
