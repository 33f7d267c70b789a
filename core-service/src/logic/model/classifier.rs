//! Classifier - P(vuln) from a sparse feature vector
//!
//! Trait so the pipeline can be driven by any probability-emitting model.
//! The shipped implementation is a logistic regression exported to JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::MODEL_FILE;
use crate::logic::error::{RiskError, RiskResult};
use crate::logic::features::SparseVector;

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

pub trait Classifier: Send + Sync {
    /// Probability of the positive (vulnerable) class, in [0, 1]
    fn predict_proba(&self, x: &SparseVector) -> RiskResult<f64>;

    /// Expected input dimension
    fn dimension(&self) -> usize;

    fn name(&self) -> &str;
}

// ============================================================================
// LOGISTIC REGRESSION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LogisticClassifier {
    pub fn new(coef: Vec<f64>, intercept: f64) -> Self {
        Self { coef, intercept }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.coef.is_empty() {
            return Err("empty coefficient vector".to_string());
        }
        if !self.intercept.is_finite() || self.coef.iter().any(|c| !c.is_finite()) {
            return Err("non-finite coefficient".to_string());
        }
        Ok(())
    }
}

/// Overflow-safe logistic function
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticClassifier {
    fn predict_proba(&self, x: &SparseVector) -> RiskResult<f64> {
        if x.dim != self.coef.len() {
            return Err(RiskError::model_load(
                Path::new(MODEL_FILE),
                format!("classifier expects {} features, got {}", self.coef.len(), x.dim),
            ));
        }
        let z = x.dot_dense(&self.coef) + self.intercept;
        Ok(sigmoid(z).clamp(0.0, 1.0))
    }

    fn dimension(&self) -> usize {
        self.coef.len()
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}
