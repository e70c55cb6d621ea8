//! Run driver: partitions records by task, scores each task, builds the report.

pub mod error;
pub mod evaluator;
pub mod report;


pub use error::EvalError;
pub use evaluator::Evaluator;
pub use report::{RunReport, TaskScore};
