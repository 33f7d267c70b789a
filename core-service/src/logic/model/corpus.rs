//! Reference Corpus - (text, severity) pairs for similarity estimation
//!
//! Absence of a corpus is a valid state, not an error. `IndexedCorpus` holds
//! the corpus pre-vectorised with the model's vectorizer so each request only
//! vectorises its own text.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::logic::error::{RiskError, RiskResult};
use crate::logic::features::{preprocess, SparseVector, Vectorizer};

#[derive(Debug, Clone, PartialEq)]
pub struct CorpusEntry {
    pub text: String,
    pub severity: f64,
}

/// Dataset record as written by the training pipeline
#[derive(Debug, Deserialize)]
struct DatasetRecord {
    #[serde(default)]
    text_description: Option<String>,
    #[serde(default)]
    cvss_base_score: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceCorpus {
    entries: Vec<CorpusEntry>,
}

impl ReferenceCorpus {
    /// Entries with a non-finite severity are dropped
    pub fn new(entries: Vec<CorpusEntry>) -> Self {
        let entries = entries.into_iter().filter(|e| e.severity.is_finite()).collect();
        Self { entries }
    }

    /// Load a dataset JSON array. Only records carrying a severity are kept;
    /// `Ok(None)` when nothing usable remains.
    pub fn load(path: &Path) -> RiskResult<Option<Self>> {
        if !path.exists() {
            return Err(RiskError::model_not_found(path));
        }
        let data = fs::read(path).map_err(|e| RiskError::model_load(path, e.to_string()))?;
        let records: Vec<DatasetRecord> =
            serde_json::from_slice(&data).map_err(|e| RiskError::model_load(path, e.to_string()))?;

        let entries: Vec<CorpusEntry> = records
            .into_iter()
            .filter_map(|r| {
                r.cvss_base_score.map(|severity| CorpusEntry {
                    text: r.text_description.unwrap_or_default(),
                    severity,
                })
            })
            .collect();

        let corpus = Self::new(entries);
        if corpus.is_empty() {
            return Ok(None);
        }
        Ok(Some(corpus))
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vectorise every entry once
    pub fn index(&self, vectorizer: &dyn Vectorizer) -> IndexedCorpus {
        let entries = self
            .entries
            .iter()
            .map(|e| IndexedEntry {
                vector: vectorizer.transform(&preprocess(&e.text)),
                severity: e.severity,
            })
            .collect();

        IndexedCorpus {
            fingerprint: vectorizer.fingerprint(),
            entries,
        }
    }
}

// ============================================================================
// INDEXED CORPUS
// ============================================================================

#[derive(Debug, Clone)]
pub struct IndexedEntry {
    pub vector: SparseVector,
    pub severity: f64,
}

#[derive(Debug, Clone)]
pub struct IndexedCorpus {
    /// Fingerprint of the vectorizer that produced the vectors
    pub fingerprint: u32,
    pub entries: Vec<IndexedEntry>,
}

impl IndexedCorpus {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
