use crate::relation::StructuredItem;
use crate::similarity::SimilarityIndex;

/// True/false positive and false negative counts for one comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl MatchCounts {
    pub fn precision(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
    }

    pub fn recall(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
    }

    /// Harmonic mean of precision and recall; `0.0` when both are zero.
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Which predictions found a gold partner and which gold entries were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub predicted: Vec<bool>,
    pub gold: Vec<bool>,
}

impl MatchResult {
    pub fn counts(&self) -> MatchCounts {
        let matched_predictions = self.predicted.iter().filter(|&&m| m).count();
        let matched_gold = self.gold.iter().filter(|&&m| m).count();
        MatchCounts {
            true_positives: matched_predictions,
            false_positives: self.predicted.len() - matched_predictions,
            false_negatives: self.gold.len() - matched_gold,
        }
    }

    pub fn f1(&self) -> f64 {
        self.counts().f1()
    }
}

/// Greedy one-to-one entity matching.
///
/// Each prediction takes the first still-unmatched gold entity (in gold order) that is
/// the same entity at `threshold`; a gold entity is consumed at most once.
pub fn match_entities<S: AsRef<str>>(
    index: &SimilarityIndex,
    predicted: &[S],
    gold: &[S],
    threshold: f64,
) -> MatchResult {
    let mut gold_matched = vec![false; gold.len()];
    let mut predicted_matched = Vec::with_capacity(predicted.len());

    for p in predicted {
        let hit = (0..gold.len()).find(|&i| {
            !gold_matched[i] && index.same_entity(p.as_ref(), gold[i].as_ref(), threshold)
        });
        if let Some(i) = hit {
            gold_matched[i] = true;
        }
        predicted_matched.push(hit.is_some());
    }

    MatchResult {
        predicted: predicted_matched,
        gold: gold_matched,
    }
}

/// Whole-item matching without consumption.
///
/// A prediction counts if it matches any gold item; several predictions may share one
/// gold item. Gold coverage is computed independently in the other direction.
pub fn match_items(
    index: &SimilarityIndex,
    predicted: &[StructuredItem],
    gold: &[StructuredItem],
    threshold: f64,
) -> MatchResult {
    let predicted_matched = predicted
        .iter()
        .map(|p| gold.iter().any(|g| items_match(index, p, g, threshold)))
        .collect();
    let gold_matched = gold
        .iter()
        .map(|g| predicted.iter().any(|p| items_match(index, p, g, threshold)))
        .collect();

    MatchResult {
        predicted: predicted_matched,
        gold: gold_matched,
    }
}

/// Exact componentwise equality, or every slot pair is the same entity.
pub fn items_match(
    index: &SimilarityIndex,
    a: &StructuredItem,
    b: &StructuredItem,
    threshold: f64,
) -> bool {
    if a.is_degraded() || b.is_degraded() || a.arity() != b.arity() {
        return false;
    }
    a == b
        || a.slots()
            .iter()
            .zip(b.slots())
            .all(|(x, y)| index.same_entity(x, y, threshold))
}
