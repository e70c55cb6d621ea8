use super::*;
use crate::embedding::WordVectors;

fn vectors() -> WordVectors {
    WordVectors::from_entries(
        3,
        [
            ("aspirin", vec![1.0, 0.0, 0.0]),
            ("headache", vec![0.0, 1.0, 0.0]),
            ("migraine", vec![0.0, 0.95, 0.05]),
            ("severe", vec![0.0, 0.0, 1.0]),
        ],
    )
    .unwrap()
}

fn index(entities: &[&str]) -> SimilarityIndex {
    SimilarityIndex::build(&vectors(), entities.iter().copied())
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_build_indexes_each_entity_once() {
    let idx = index(&["aspirin", "headache", "aspirin", ""]);
    assert_eq!(idx.len(), 3);
    assert!(idx.contains("aspirin"));
    assert!(idx.contains(""));
    assert!(!idx.contains("migraine"));
}

#[test]
fn test_same_entity_is_reflexive_for_non_empty() {
    let idx = index(&["aspirin", "zzz unknown", "severe headache"]);
    for entity in ["aspirin", "zzz unknown", "severe headache"] {
        for t in [0.0, 0.5, 0.9, 0.95, 0.999] {
            assert!(idx.same_entity(entity, entity, t), "{entity} at {t}");
        }
    }
}

#[test]
fn test_empty_strings_never_match() {
    let idx = index(&["", "aspirin"]);
    assert!(!idx.same_entity("", "", 0.0));
    assert!(!idx.same_entity("", "aspirin", 0.0));
    assert_eq!(idx.lexical_similarity("", "aspirin"), 0.0);
    assert_eq!(idx.embedding_similarity("", ""), 0.0);
}

#[test]
fn test_lexical_similarity_is_order_free() {
    let idx = index(&["abc", "cab", "ab", "cd"]);
    assert!(approx(idx.lexical_similarity("abc", "cab"), 1.0));
    assert_eq!(idx.lexical_similarity("ab", "cd"), 0.0);
}

#[test]
fn test_lexical_similarity_counts_frequencies() {
    // "aab" -> (a:2, b:1); "ab" -> (a:1, b:1); cos = 3 / (sqrt5 * sqrt2)
    let idx = index(&["aab", "ab"]);
    let expected = 3.0 / (5.0f64.sqrt() * 2.0f64.sqrt());
    assert!(approx(idx.lexical_similarity("aab", "ab"), expected));
}

#[test]
fn test_embedding_similarity_uses_mean_vectors() {
    let idx = index(&["aspirin", "headache", "severe headache"]);
    assert!(approx(idx.embedding_similarity("aspirin", "headache"), 0.0));

    // mean("severe headache") = (0, 0.5, 0.5) -> cos with (0,1,0) = 1/sqrt2
    let expected = 1.0 / 2.0f64.sqrt();
    assert!(approx(
        idx.embedding_similarity("severe headache", "headache"),
        expected
    ));
}

#[test]
fn test_embedding_similarity_zero_for_unknown_tokens() {
    let idx = index(&["nirpsia", "aspirin"]);
    assert_eq!(idx.embedding_similarity("nirpsia", "aspirin"), 0.0);
}

#[test]
fn test_unindexed_strings_have_zero_similarity() {
    let idx = index(&["aspirin"]);
    assert_eq!(idx.embedding_similarity("aspirin", "headache"), 0.0);
    assert_eq!(idx.lexical_similarity("aspirin", "headache"), 0.0);
    assert!(!idx.same_entity("aspirin", "headache", 0.0));
}

#[test]
fn test_same_entity_requires_both_signals() {
    let idx = index(&["aspirin", "nirpsia", "headache", "migraine"]);

    // Anagram: lexical 1.0, embedding 0.0 (unknown token).
    assert!(approx(idx.lexical_similarity("aspirin", "nirpsia"), 1.0));
    assert!(!idx.same_entity("aspirin", "nirpsia", 0.5));

    // Near-synonyms: embedding ~0.999, lexical ~0.34.
    assert!(idx.embedding_similarity("headache", "migraine") > 0.99);
    assert!(!idx.same_entity("headache", "migraine", 0.9));
    assert!(idx.same_entity("headache", "migraine", 0.3));
}

#[test]
fn test_same_entity_threshold_is_strict() {
    let idx = index(&["abc", "cab"]);
    // Different strings with min similarity exactly 0 never clear threshold 0.
    assert!(!idx.same_entity("abc", "cab", 0.0));
}
