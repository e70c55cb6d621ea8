//! Structured relation outputs (tuples / triplets) parsed from free text.

pub mod parser;
pub mod types;


pub use parser::{parse_items, parse_optional_items};
pub use types::{Arity, StructuredItem};
