use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("unknown record type '{record_type}' for {scorer} scoring")]
    UnknownRecordType {
        record_type: String,
        scorer: &'static str,
    },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}
