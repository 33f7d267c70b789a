//! Feature Signal
//!
//! How much of the model's vocabulary a text actually hits. Used as a cheap
//! distribution-shift proxy by the confidence adjuster and the gate.

use serde::{Deserialize, Serialize};

use super::sparse::SparseVector;
use super::text::{has_domain_keywords, text_length};

/// Derived once per sample, immutable afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSignal {
    pub nonzero_features: usize,
    pub total_features: usize,
    /// nonzero / total, in [0, 1]
    pub feature_coverage: f64,
    /// Sum of feature weights
    pub feature_sum: f64,
    /// Chars of the stripped, processed text
    pub text_length: usize,
    pub has_domain_keywords: bool,
}

impl FeatureSignal {
    pub fn extract(processed: &str, vector: &SparseVector) -> Self {
        let nonzero_features = vector.nonzero_count();
        let total_features = vector.dim;
        Self {
            nonzero_features,
            total_features,
            feature_coverage: nonzero_features as f64 / total_features.max(1) as f64,
            feature_sum: vector.sum(),
            text_length: text_length(processed),
            has_domain_keywords: has_domain_keywords(processed),
        }
    }
}
