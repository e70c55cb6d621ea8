//! Static word embeddings.
//!
//! - [`WordVectors`] loads word2vec files (binary or text) and averages token vectors.
//! - Use [`WordVectors::from_entries`] for tests without model files.

mod error;
/// word2vec loading and sentence averaging.
pub mod vectors;


pub use error::EmbeddingError;
pub use vectors::{WordVectorFormat, WordVectors};
