use std::collections::HashMap;

use tracing::debug;

use crate::embedding::WordVectors;

/// Precomputed signals for one entity string.
#[derive(Debug, Clone)]
struct EntityProfile {
    embedding: Vec<f32>,
    embedding_norm: f64,
    chars: HashMap<char, u32>,
    chars_norm: f64,
}

impl EntityProfile {
    fn new(vectors: &WordVectors, entity: &str) -> Self {
        let embedding = vectors.sentence_embedding(entity);
        let embedding_norm = embedding
            .iter()
            .map(|&x| f64::from(x) * f64::from(x))
            .sum::<f64>()
            .sqrt();

        let mut chars: HashMap<char, u32> = HashMap::new();
        for c in entity.chars() {
            *chars.entry(c).or_default() += 1;
        }
        let chars_norm = chars
            .values()
            .map(|&n| f64::from(n) * f64::from(n))
            .sum::<f64>()
            .sqrt();

        Self {
            embedding,
            embedding_norm,
            chars,
            chars_norm,
        }
    }
}

/// Entity → (embedding, character-frequency signature) table for one scoring call.
///
/// Built in a single pass by [`SimilarityIndex::build`], read-only afterwards. Strings
/// that were never indexed compare with similarity `0.0`.
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    profiles: HashMap<String, EntityProfile>,
}

impl SimilarityIndex {
    /// Indexes every distinct entity once.
    pub fn build<'a, I>(vectors: &WordVectors, entities: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut profiles = HashMap::new();
        for entity in entities {
            if !profiles.contains_key(entity) {
                profiles.insert(entity.to_string(), EntityProfile::new(vectors, entity));
            }
        }

        debug!(entities = profiles.len(), "Similarity index built");
        Self { profiles }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.profiles.contains_key(entity)
    }

    /// Cosine of the averaged word vectors; `0.0` if either side has no usable embedding.
    pub fn embedding_similarity(&self, a: &str, b: &str) -> f64 {
        let (Some(pa), Some(pb)) = (self.profiles.get(a), self.profiles.get(b)) else {
            return 0.0;
        };
        if pa.embedding_norm == 0.0 || pb.embedding_norm == 0.0 {
            return 0.0;
        }

        let dot: f64 = pa
            .embedding
            .iter()
            .zip(&pb.embedding)
            .map(|(&x, &y)| f64::from(x) * f64::from(y))
            .sum();

        dot / (pa.embedding_norm * pb.embedding_norm)
    }

    /// Cosine between character-frequency vectors; `0.0` if either string is empty.
    pub fn lexical_similarity(&self, a: &str, b: &str) -> f64 {
        let (Some(pa), Some(pb)) = (self.profiles.get(a), self.profiles.get(b)) else {
            return 0.0;
        };
        if pa.chars_norm == 0.0 || pb.chars_norm == 0.0 {
            return 0.0;
        }

        let dot: f64 = pa
            .chars
            .iter()
            .filter_map(|(c, &n)| pb.chars.get(c).map(|&m| f64::from(n) * f64::from(m)))
            .sum();

        dot / (pa.chars_norm * pb.chars_norm)
    }

    /// `min(embedding, lexical) > threshold`.
    ///
    /// Identical non-empty strings always match, including ones without known tokens.
    pub fn same_entity(&self, a: &str, b: &str, threshold: f64) -> bool {
        if !a.is_empty() && a == b {
            return true;
        }
        self.embedding_similarity(a, b)
            .min(self.lexical_similarity(a, b))
            > threshold
    }
}
