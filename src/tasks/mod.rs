//! Benchmark task table: which records form a task and how the task is scored.

pub mod registry;
pub mod types;

#[cfg(test)]
mod tests;

pub use registry::{Partition, TaskRegistry};
pub use types::{Domain, Level, ScoringStrategy, SelectorField, TaskSelector, TaskSpec};
