//! Answer scoring.
//!
//! - [`matching`]: greedy entity / item matching and F1 counts.
//! - [`relation`]: pooled tuple / triplet F1 blended across slot groups and whole items.
//! - [`classification`]: true/false, multiple-choice, reaction and filling rules.
//! - [`generation`]: BLEU and ROUGE for free text.

pub mod classification;
pub mod error;
pub mod generation;
pub mod matching;
pub mod relation;


pub use classification::{
    multiple_choice_correct, score_classification, score_filling, score_reaction,
    true_false_correct,
};
pub use error::ScoringError;
pub use generation::{GenerationScore, score_generation};
pub use matching::{MatchCounts, MatchResult, items_match, match_entities, match_items};
pub use relation::{RelationScore, RelationScorer};
