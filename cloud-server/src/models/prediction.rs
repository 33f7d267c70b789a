//! Prediction request/response models
//!
//! Wire format of the prediction endpoints. The tagged `RiskOutcome` is
//! flattened here into `risk_score` / `risk_level` strings.

use serde::{Deserialize, Serialize};
use vulnrisk_core::logic::risk::{
    GateReason, GateThresholds, PredictionReport, RiskSummary, SeverityMethod,
};
use vulnrisk_core::Sample;

// ============================================================================
// REQUESTS
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub model_path: Option<String>,
    #[serde(default)]
    pub sample: Sample,
}

#[derive(Debug, Deserialize)]
pub struct BatchPredictRequest {
    #[serde(default)]
    pub model_path: Option<String>,
    #[serde(default)]
    pub samples: Vec<Sample>,
}

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionMeta {
    pub reason: Option<GateReason>,
    pub max_similarity: Option<f64>,
    pub nonzero_features: Option<usize>,
    pub text_len: usize,
    pub thresholds: GateThresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub sample_id: String,
    pub p_vuln: f64,
    pub p_vuln_raw: f64,
    pub risk_score: f64,
    pub risk_level: String,
    pub cvss_base_score: Option<f64>,
    pub cvss_estimated: bool,
    pub cvss_method: SeverityMethod,
    pub feature_coverage: f64,
    pub feature_sum: f64,
    pub has_security_keywords: bool,
    pub confidence_adjustment: f64,
    pub applicable: bool,
    pub explanation: Option<String>,
    pub meta: PredictionMeta,
}

impl From<PredictionReport> for PredictionResponse {
    fn from(report: PredictionReport) -> Self {
        let outcome = report.verdict.outcome;
        let decision = report.applicability;
        Self {
            sample_id: report.sample_id,
            p_vuln: report.p_adjusted,
            p_vuln_raw: report.p_raw,
            risk_score: outcome.risk_score(),
            risk_level: outcome.label().to_string(),
            cvss_base_score: report.severity.value,
            cvss_estimated: report.severity.estimated,
            cvss_method: report.severity.method,
            feature_coverage: report.feature_coverage,
            feature_sum: report.feature_sum,
            has_security_keywords: report.has_domain_keywords,
            confidence_adjustment: report.confidence_factor,
            applicable: decision.applicable,
            explanation: report.verdict.explanation,
            meta: PredictionMeta {
                reason: decision.reason,
                max_similarity: decision.debug.max_similarity,
                nonzero_features: decision.debug.nonzero_features,
                text_len: decision.debug.text_length,
                thresholds: decision.thresholds,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPredictResponse {
    pub predictions: Vec<PredictionResponse>,
    pub summary: RiskSummary,
}
