//! N-gram overlap metrics for free-text generation tasks.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::Serialize;
use tiktoken_rs::CoreBPE;

/// BLEU inputs are cut to this many BPE tokens.
pub const MAX_BLEU_TOKENS: usize = 1024;

/// ROUGE only stems tokens longer than this.
const MIN_STEM_LEN: usize = 3;

static ROUGE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("valid token regex"));

static BLEU_TOKENIZER: LazyLock<CoreBPE> =
    LazyLock::new(|| tiktoken_rs::cl100k_base().expect("cl100k_base should always be available"));

/// Corpus means of sentence-level BLEU and ROUGE F-measures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GenerationScore {
    pub bleu_2: f64,
    pub bleu_4: f64,
    pub rouge_1: f64,
    pub rouge_2: f64,
    pub rouge_l: f64,
}

impl GenerationScore {
    pub fn into_metrics(self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("bleu_2".to_string(), self.bleu_2),
            ("bleu_4".to_string(), self.bleu_4),
            ("rouge_1".to_string(), self.rouge_1),
            ("rouge_2".to_string(), self.rouge_2),
            ("rouge_l".to_string(), self.rouge_l),
        ])
    }
}

/// Scores `(prediction, reference)` pairs.
///
/// Pairs with an empty prediction or reference are dropped; no pairs left scores all
/// zeros.
pub fn score_generation(pairs: &[(&str, &str)]) -> GenerationScore {
    let kept: Vec<(&str, &str)> = pairs
        .iter()
        .map(|(p, r)| (p.trim(), r.trim()))
        .filter(|(p, r)| !p.is_empty() && !r.is_empty())
        .collect();
    if kept.is_empty() {
        return GenerationScore::default();
    }

    let stemmer = Stemmer::create(Algorithm::English);
    let mut total = GenerationScore::default();
    for (prediction, reference) in &kept {
        let p = bleu_tokens(prediction);
        let r = bleu_tokens(reference);
        total.bleu_2 += sentence_bleu(&p, &r, 2);
        total.bleu_4 += sentence_bleu(&p, &r, 4);

        let p = rouge_tokens(&stemmer, prediction);
        let r = rouge_tokens(&stemmer, reference);
        total.rouge_1 += rouge_n(&p, &r, 1);
        total.rouge_2 += rouge_n(&p, &r, 2);
        total.rouge_l += rouge_l(&p, &r);
    }

    let n = kept.len() as f64;
    GenerationScore {
        bleu_2: total.bleu_2 / n,
        bleu_4: total.bleu_4 / n,
        rouge_1: total.rouge_1 / n,
        rouge_2: total.rouge_2 / n,
        rouge_l: total.rouge_l / n,
    }
}

fn ngram_counts<'t, T: AsRef<str>>(tokens: &'t [T], n: usize) -> HashMap<Vec<&'t str>, usize> {
    let mut counts = HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for window in tokens.windows(n) {
        let key: Vec<&str> = window.iter().map(AsRef::as_ref).collect();
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

fn overlap<'t>(
    candidate: &HashMap<Vec<&'t str>, usize>,
    reference: &HashMap<Vec<&'t str>, usize>,
) -> usize {
    candidate
        .iter()
        .map(|(gram, &count)| count.min(reference.get(gram).copied().unwrap_or(0)))
        .sum()
}

/// Uniformly weighted sentence BLEU up to `max_n`, single reference, no smoothing.
///
/// Any order with zero clipped matches makes the score `0.0`.
pub fn sentence_bleu<T: AsRef<str>>(candidate: &[T], reference: &[T], max_n: usize) -> f64 {
    if candidate.is_empty() || reference.is_empty() || max_n == 0 {
        return 0.0;
    }

    let weight = 1.0 / max_n as f64;
    let mut log_sum = 0.0;
    for n in 1..=max_n {
        let cand = ngram_counts(candidate, n);
        let total: usize = cand.values().sum();
        let matched = overlap(&cand, &ngram_counts(reference, n));
        if matched == 0 || total == 0 {
            return 0.0;
        }
        log_sum += weight * (matched as f64 / total as f64).ln();
    }

    let c = candidate.len() as f64;
    let r = reference.len() as f64;
    let brevity_penalty = if c > r { 1.0 } else { (1.0 - r / c).exp() };

    brevity_penalty * log_sum.exp()
}

/// cl100k BPE pieces of `text`, each decoded on its own, capped at [`MAX_BLEU_TOKENS`].
///
/// A piece that splits a multi-byte character decodes to U+FFFD.
pub fn bleu_tokens(text: &str) -> Vec<String> {
    BLEU_TOKENIZER
        .encode_ordinary(text)
        .into_iter()
        .take(MAX_BLEU_TOKENS)
        .map(|token| {
            BLEU_TOKENIZER
                .decode(vec![token])
                .unwrap_or_else(|_| char::REPLACEMENT_CHARACTER.to_string())
        })
        .collect()
}

/// Lowercased alphanumeric runs; runs longer than three characters are stemmed.
pub fn rouge_tokens(stemmer: &Stemmer, text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    ROUGE_TOKEN
        .find_iter(&lowered)
        .map(|m| {
            let token = m.as_str();
            if token.len() > MIN_STEM_LEN {
                stemmer.stem(token).into_owned()
            } else {
                token.to_string()
            }
        })
        .collect()
}

fn f_measure(matched: usize, candidate_len: usize, reference_len: usize) -> f64 {
    if matched == 0 || candidate_len == 0 || reference_len == 0 {
        return 0.0;
    }
    let p = matched as f64 / candidate_len as f64;
    let r = matched as f64 / reference_len as f64;
    2.0 * p * r / (p + r)
}

/// ROUGE-N F-measure.
pub fn rouge_n<T: AsRef<str>>(candidate: &[T], reference: &[T], n: usize) -> f64 {
    let cand = ngram_counts(candidate, n);
    let refs = ngram_counts(reference, n);
    f_measure(
        overlap(&cand, &refs),
        cand.values().sum(),
        refs.values().sum(),
    )
}

/// ROUGE-L F-measure from the longest common subsequence.
pub fn rouge_l<T: AsRef<str>>(candidate: &[T], reference: &[T]) -> f64 {
    f_measure(
        lcs_len(candidate, reference),
        candidate.len(),
        reference.len(),
    )
}

fn lcs_len<T: AsRef<str>>(a: &[T], b: &[T]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x.as_ref() == y.as_ref() {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
