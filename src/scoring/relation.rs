use std::collections::BTreeSet;

use tracing::debug;

use crate::constants::{ITEM_MATCH_THRESHOLD, SLOT_MATCH_THRESHOLD};
use crate::embedding::WordVectors;
use crate::relation::{Arity, StructuredItem, parse_items, parse_optional_items};
use crate::similarity::SimilarityIndex;

use super::matching::{match_entities, match_items};

/// Slot-level and whole-item F1 for one task, plus their blend.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationScore {
    /// One F1 per slot group (see [`Arity::slot_groups`]).
    pub slot_f1: Vec<f64>,
    pub item_f1: f64,
    /// `(mean(slot_f1) + item_f1) / 2`.
    pub score: f64,
}

/// Fuzzy-matching F1 scorer for tuple / triplet extraction tasks.
///
/// Every call builds its own [`SimilarityIndex`] over the entities it sees, so a
/// scorer can be reused across tasks and threads.
pub struct RelationScorer<'a> {
    vectors: &'a WordVectors,
    arity: Arity,
    slot_threshold: f64,
    item_threshold: f64,
}

impl std::fmt::Debug for RelationScorer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationScorer")
            .field("arity", &self.arity)
            .field("slot_threshold", &self.slot_threshold)
            .field("item_threshold", &self.item_threshold)
            .field("vectors", &self.vectors)
            .finish()
    }
}

impl<'a> RelationScorer<'a> {
    pub fn new(vectors: &'a WordVectors, arity: Arity) -> Self {
        Self {
            vectors,
            arity,
            slot_threshold: SLOT_MATCH_THRESHOLD,
            item_threshold: ITEM_MATCH_THRESHOLD,
        }
    }

    pub fn with_slot_threshold(mut self, threshold: f64) -> Self {
        self.slot_threshold = threshold;
        self
    }

    pub fn with_item_threshold(mut self, threshold: f64) -> Self {
        self.item_threshold = threshold;
        self
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Parses and pools every response and answer, then scores the pools.
    pub fn score_texts(&self, predictions: &[Option<&str>], answers: &[&str]) -> RelationScore {
        let predicted: Vec<StructuredItem> = predictions
            .iter()
            .flat_map(|p| parse_optional_items(*p, self.arity))
            .collect();
        let gold: Vec<StructuredItem> = answers
            .iter()
            .flat_map(|a| parse_items(a, self.arity))
            .collect();

        self.score_items(&predicted, &gold)
    }

    pub fn score_items(&self, predicted: &[StructuredItem], gold: &[StructuredItem]) -> RelationScore {
        let groups = self.arity.slot_groups();
        let predicted_slots: Vec<Vec<&str>> =
            groups.iter().map(|g| project(predicted, g)).collect();
        let gold_slots: Vec<Vec<&str>> = groups.iter().map(|g| project(gold, g)).collect();

        let index = SimilarityIndex::build(
            self.vectors,
            predicted_slots
                .iter()
                .chain(&gold_slots)
                .flat_map(|entities| entities.iter().copied()),
        );

        let slot_f1: Vec<f64> = predicted_slots
            .iter()
            .zip(&gold_slots)
            .map(|(p, g)| match_entities(&index, p, g, self.slot_threshold).f1())
            .collect();
        let item_f1 = match_items(&index, predicted, gold, self.item_threshold).f1();

        let slot_mean = slot_f1.iter().sum::<f64>() / slot_f1.len() as f64;
        let score = (slot_mean + item_f1) / 2.0;

        debug!(
            arity = ?self.arity,
            predicted = predicted.len(),
            gold = gold.len(),
            entities = index.len(),
            ?slot_f1,
            item_f1,
            score,
            "Relation F1 computed"
        );

        RelationScore {
            slot_f1,
            item_f1,
            score,
        }
    }
}

/// Sorted, de-duplicated entities found at `positions` across `items`.
///
/// Degraded items contribute `""`, which never matches and so counts against precision.
fn project<'i>(items: &'i [StructuredItem], positions: &[usize]) -> Vec<&'i str> {
    items
        .iter()
        .flat_map(|item| positions.iter().filter_map(|&i| item.slot(i)))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
