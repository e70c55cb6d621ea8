use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("unknown verdict grammar '{tag}' (expected \"T/F\", \"score\" or \"MCQ\")")]
    UnknownGrammar { tag: String },
}
