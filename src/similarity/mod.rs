//! Similarity oracle used by the relation scorer.
//!
//! Two independent signals are compared per entity pair:
//! - embedding cosine (mean of static word vectors)
//! - lexical cosine (character-frequency multisets)
//!
//! An entity pair is the "same entity" only when the weaker of the two exceeds the
//! threshold. Embedding similarity alone scores short, mostly-unknown strings too
//! generously; lexical similarity alone misses paraphrases.

pub mod index;

#[cfg(test)]
mod tests;

pub use index::SimilarityIndex;
