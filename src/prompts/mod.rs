//! Judge prompt templates.
//!
//! The template file is a JSON object mapping a template name to
//! `{ "system": ..., "user": ..., "type": "T/F" | "score" | "MCQ" }`. The user text
//! may reference record fields as `{field}`; `{{` and `}}` are literal braces.

pub mod error;
pub mod template;

#[cfg(test)]
mod tests;

pub use error::PromptError;
pub use template::{PromptLibrary, PromptTemplate, render_fields};
