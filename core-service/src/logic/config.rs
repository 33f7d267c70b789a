//! Risk Configuration
//!
//! Immutable configuration built once at startup and passed by reference
//! into the pipeline. No ambient globals.

use serde::{Deserialize, Serialize};

use super::error::{RiskError, RiskResult};
use super::risk::rules::{
    DEFAULT_ALPHA, DEFAULT_MIN_NONZERO_FEATURES, DEFAULT_MIN_TEXT_LENGTH,
    DEFAULT_PVULN_THRESHOLD, DEFAULT_PVULN_UNCERTAIN_HIGH, DEFAULT_PVULN_UNCERTAIN_LOW,
    DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TOP_K,
};

// ============================================================================
// GATE MODE
// ============================================================================

/// Which applicability rule set to run.
///
/// The single-sample and batch paths of the service gate differently. Both are
/// kept until product owners confirm which one is canonical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateMode {
    /// Single-sample chain: EMPTY_TEXT, LOW_SIMILARITY, LOW_SIGNAL, LOW_PVULN
    Strict,
    /// Batch chain: EMPTY_TEXT, LOW_SIMILARITY, LOW_PVULN (fixed 0.3),
    /// UNCERTAIN_PVULN, OOD
    Extended,
}

// ============================================================================
// RISK CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Blend weight of P(vuln) against normalized severity
    pub alpha: f64,
    /// Minimum corpus similarity for severity estimation and gating
    pub similarity_threshold: f64,
    /// Lower edge of the uncertain P(vuln) band (batch only)
    pub pvuln_uncertain_low: f64,
    /// Upper edge of the uncertain P(vuln) band (batch only)
    pub pvuln_uncertain_high: f64,
    /// Minimum processed text length
    pub min_text_length: usize,
    /// Master switch for single-sample gating
    pub gate_enabled: bool,
    /// Single-sample LOW_PVULN cutoff
    pub pvuln_threshold: f64,
    /// Minimum non-zero TF-IDF features
    pub min_nonzero_features: usize,
    /// Neighbours used for similarity-weighted severity
    pub top_k: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            pvuln_uncertain_low: DEFAULT_PVULN_UNCERTAIN_LOW,
            pvuln_uncertain_high: DEFAULT_PVULN_UNCERTAIN_HIGH,
            min_text_length: DEFAULT_MIN_TEXT_LENGTH,
            gate_enabled: true,
            pvuln_threshold: DEFAULT_PVULN_THRESHOLD,
            min_nonzero_features: DEFAULT_MIN_NONZERO_FEATURES,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RiskConfig {
    /// Reject configurations the pipeline cannot honour
    pub fn validate(&self) -> RiskResult<()> {
        let unit = |name: &str, v: f64| -> RiskResult<()> {
            if v.is_finite() && (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(RiskError::input(format!("{} must be within [0, 1], got {}", name, v)))
            }
        };

        unit("alpha", self.alpha)?;
        unit("similarity_threshold", self.similarity_threshold)?;
        unit("pvuln_threshold", self.pvuln_threshold)?;
        unit("pvuln_uncertain_low", self.pvuln_uncertain_low)?;
        unit("pvuln_uncertain_high", self.pvuln_uncertain_high)?;

        if self.pvuln_uncertain_low > self.pvuln_uncertain_high {
            return Err(RiskError::input(format!(
                "uncertain band is empty: [{}, {}]",
                self.pvuln_uncertain_low, self.pvuln_uncertain_high
            )));
        }
        if self.top_k == 0 {
            return Err(RiskError::input("top_k must be at least 1"));
        }
        Ok(())
    }

    /// Same config with the blend weight replaced (per-model override)
    pub fn with_alpha(&self, alpha: f64) -> Self {
        Self {
            alpha,
            ..self.clone()
        }
    }
}
