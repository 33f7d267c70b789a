//! TF-IDF Vectorizer
//!
//! Inference-only port of a fitted TF-IDF model: vocabulary, idf weights,
//! n-gram range and stop words come from `vectorizer.json`. Fitting happens
//! offline in the training pipeline.

use std::collections::{HashMap, HashSet};

use crc32fast::Hasher;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::sparse::SparseVector;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("static regex"));

// ============================================================================
// VECTORIZER TRAIT
// ============================================================================

/// Text -> sparse feature vector. Deterministic for identical input.
pub trait Vectorizer: Send + Sync {
    /// Vectorize already-preprocessed text
    fn transform(&self, processed: &str) -> SparseVector;

    /// Number of features
    fn dimension(&self) -> usize;

    /// Stable hash of the feature layout, used to detect mismatched artifacts
    fn fingerprint(&self) -> u32;
}

// ============================================================================
// TF-IDF
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    stop_words: HashSet<String>,
    /// "l2" or null
    #[serde(default = "default_norm")]
    norm: Option<String>,
    #[serde(default)]
    sublinear_tf: bool,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 2)
}

fn default_norm() -> Option<String> {
    Some("l2".to_string())
}

impl TfidfVectorizer {
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Self {
        Self {
            vocabulary,
            idf,
            ngram_range: default_ngram_range(),
            stop_words: HashSet::new(),
            norm: default_norm(),
            sublinear_tf: false,
        }
    }

    /// Unit-idf vectorizer over the given terms, indexed in order
    pub fn from_terms(terms: &[&str]) -> Self {
        let vocabulary = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect();
        Self::new(vocabulary, vec![1.0; terms.len()])
    }

    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.ngram_range = (min_n, max_n);
        self
    }

    pub fn with_stop_words(mut self, words: &[&str]) -> Self {
        self.stop_words = words.iter().map(|w| w.to_string()).collect();
        self
    }

    /// Structural checks run once at load time
    pub fn validate(&self) -> Result<(), String> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(format!(
                "vocabulary has {} terms but idf has {} weights",
                self.vocabulary.len(),
                self.idf.len()
            ));
        }
        let mut seen = vec![false; self.idf.len()];
        for (term, &idx) in &self.vocabulary {
            if idx >= seen.len() || seen[idx] {
                return Err(format!("term '{}' has invalid or duplicate index {}", term, idx));
            }
            seen[idx] = true;
        }
        if let Some(w) = self.idf.iter().find(|w| !w.is_finite()) {
            return Err(format!("non-finite idf weight {}", w));
        }
        let (lo, hi) = self.ngram_range;
        if lo == 0 || lo > hi {
            return Err(format!("invalid ngram_range ({}, {})", lo, hi));
        }
        match self.norm.as_deref() {
            None | Some("l2") => Ok(()),
            Some(other) => Err(format!("unsupported norm '{}'", other)),
        }
    }

    /// Terms after stop-word removal, then n-grams over the remaining tokens
    fn analyze(&self, processed: &str) -> Vec<String> {
        let tokens: Vec<&str> = TOKEN
            .find_iter(processed)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let (lo, hi) = self.ngram_range;
        let mut grams = Vec::new();
        for n in lo..=hi {
            if n == 0 || n > tokens.len() {
                continue;
            }
            for window in tokens.windows(n) {
                grams.push(window.join(" "));
            }
        }
        grams
    }
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, processed: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for gram in self.analyze(processed) {
            if let Some(&idx) = self.vocabulary.get(&gram) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let pairs = counts
            .into_iter()
            .map(|(idx, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (idx, tf * self.idf[idx])
            })
            .collect();

        let mut vector = SparseVector::from_pairs(self.dimension(), pairs);
        if self.norm.is_some() {
            vector.l2_normalize();
        }
        vector
    }

    fn dimension(&self) -> usize {
        self.idf.len()
    }

    fn fingerprint(&self) -> u32 {
        let mut terms: Vec<(&usize, &String)> = self.vocabulary.iter().map(|(t, i)| (i, t)).collect();
        terms.sort();

        let mut hasher = Hasher::new();
        for (_, term) in terms {
            hasher.update(term.as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize()
    }
}
