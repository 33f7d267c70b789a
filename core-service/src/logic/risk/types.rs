//! Risk Types
//!
//! Data structures flowing through the risk pipeline.
//! No logic beyond small accessors.

use serde::{Deserialize, Serialize};

// ============================================================================
// INPUT
// ============================================================================

/// One text sample submitted for scoring
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sample {
    #[serde(default)]
    pub sample_id: Option<String>,
    #[serde(default)]
    pub text_description: String,
    /// Expert-supplied severity (0-10). Never second-guessed by the gate.
    #[serde(default)]
    pub cvss_base_score: Option<f64>,
}

impl Sample {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text_description: text.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.sample_id = Some(id.into());
        self
    }

    pub fn with_severity(mut self, severity: f64) -> Self {
        self.cvss_base_score = Some(severity);
        self
    }
}

// ============================================================================
// CONFIDENCE ADJUSTMENT
// ============================================================================

/// Suppression applied to the raw probability. `p_adjusted <= p_raw` always.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAdjustment {
    pub factor: f64,
    pub p_adjusted: f64,
}

// ============================================================================
// SEVERITY
// ============================================================================

/// Why the similarity path produced no severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimilarityFailure {
    NoTrainingData,
    LowSimilarity,
    EstimationError,
}

impl SimilarityFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityFailure::NoTrainingData => "NO_TRAINING_DATA",
            SimilarityFailure::LowSimilarity => "LOW_SIMILARITY",
            SimilarityFailure::EstimationError => "ESTIMATION_ERROR",
        }
    }
}

/// Output of the corpus-similarity path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEstimate {
    pub severity: Option<f64>,
    /// `None` when there was no corpus to measure against
    pub max_similarity: Option<f64>,
    pub estimated: bool,
    pub failure: Option<SimilarityFailure>,
}

impl SimilarityEstimate {
    pub fn success(severity: f64, max_similarity: f64) -> Self {
        Self {
            severity: Some(severity),
            max_similarity: Some(max_similarity),
            estimated: true,
            failure: None,
        }
    }

    pub fn failed(failure: SimilarityFailure, max_similarity: Option<f64>) -> Self {
        Self {
            severity: None,
            max_similarity,
            estimated: false,
            failure: Some(failure),
        }
    }

    pub fn is_low_similarity(&self) -> bool {
        self.failure == Some(SimilarityFailure::LowSimilarity)
    }
}

/// Where the severity value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityMethod {
    UserProvided,
    Similarity,
    PVulnFallback,
    SimilarityFailed,
    LowPVuln,
    NotApplicable,
}

impl SeverityMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityMethod::UserProvided => "user_provided",
            SeverityMethod::Similarity => "similarity",
            SeverityMethod::PVulnFallback => "p_vuln_fallback",
            SeverityMethod::SimilarityFailed => "similarity_failed",
            SeverityMethod::LowPVuln => "low_p_vuln",
            SeverityMethod::NotApplicable => "not_applicable",
        }
    }
}

/// Exactly one per sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityResult {
    pub value: Option<f64>,
    pub method: SeverityMethod,
    /// True when the value was computed rather than supplied
    pub estimated: bool,
}

impl SeverityResult {
    pub fn user_provided(value: f64) -> Self {
        Self { value: Some(value), method: SeverityMethod::UserProvided, estimated: false }
    }

    pub fn estimated(value: f64, method: SeverityMethod) -> Self {
        Self { value: Some(value), method, estimated: true }
    }

    pub fn absent(method: SeverityMethod) -> Self {
        Self { value: None, method, estimated: false }
    }

    pub fn is_user_provided(&self) -> bool {
        self.method == SeverityMethod::UserProvided
    }
}

// ============================================================================
// APPLICABILITY
// ============================================================================

/// Why a sample was judged out of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateReason {
    #[serde(rename = "EMPTY_TEXT")]
    EmptyText,
    #[serde(rename = "LOW_SIMILARITY")]
    LowSimilarity,
    #[serde(rename = "LOW_SIGNAL")]
    LowSignal,
    #[serde(rename = "LOW_PVULN")]
    LowPVuln,
    #[serde(rename = "UNCERTAIN_PVULN")]
    UncertainPVuln,
    #[serde(rename = "OOD")]
    Ood,
}

impl GateReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateReason::EmptyText => "EMPTY_TEXT",
            GateReason::LowSimilarity => "LOW_SIMILARITY",
            GateReason::LowSignal => "LOW_SIGNAL",
            GateReason::LowPVuln => "LOW_PVULN",
            GateReason::UncertainPVuln => "UNCERTAIN_PVULN",
            GateReason::Ood => "OOD",
        }
    }

    /// Sentinel level shown for this reason
    pub fn gated_level(&self) -> GatedLevel {
        match self {
            GateReason::UncertainPVuln => GatedLevel::Uncertain,
            _ => GatedLevel::NotApplicable,
        }
    }
}

impl std::fmt::Display for GateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of the configured cutoffs at decision time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateThresholds {
    pub similarity_threshold: f64,
    pub pvuln_threshold: f64,
    pub min_text_length: usize,
    pub min_nonzero_features: usize,
    pub pvuln_uncertain_low: f64,
    pub pvuln_uncertain_high: f64,
}

/// Values the gate looked at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDebug {
    pub max_similarity: Option<f64>,
    pub nonzero_features: Option<usize>,
    pub text_length: usize,
    pub p_adjusted: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicabilityDecision {
    pub applicable: bool,
    pub reason: Option<GateReason>,
    pub thresholds: GateThresholds,
    pub debug: GateDebug,
}

// ============================================================================
// VERDICT
// ============================================================================

/// Computed risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Gate-assigned sentinel level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GatedLevel {
    #[serde(rename = "N/A")]
    NotApplicable,
    Uncertain,
}

impl GatedLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatedLevel::NotApplicable => "N/A",
            GatedLevel::Uncertain => "Uncertain",
        }
    }
}

/// Either a computed score or a gate sentinel. Collapsed to one display
/// string only at the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskOutcome {
    Scored { score: f64, level: RiskLevel },
    Gated { reason: GateReason, level: GatedLevel },
}

impl RiskOutcome {
    pub fn gated(reason: GateReason) -> Self {
        RiskOutcome::Gated { reason, level: reason.gated_level() }
    }

    /// Gated outcomes score 0
    pub fn risk_score(&self) -> f64 {
        match self {
            RiskOutcome::Scored { score, .. } => *score,
            RiskOutcome::Gated { .. } => 0.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskOutcome::Scored { level, .. } => level.as_str(),
            RiskOutcome::Gated { level, .. } => level.as_str(),
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, RiskOutcome::Scored { .. })
    }

    pub fn gate_reason(&self) -> Option<GateReason> {
        match self {
            RiskOutcome::Gated { reason, .. } => Some(*reason),
            RiskOutcome::Scored { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub outcome: RiskOutcome,
    pub explanation: Option<String>,
}

// ============================================================================
// REPORTS
// ============================================================================

/// Verdict plus every diagnostic needed to audit it without recomputation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub sample_id: String,
    pub p_raw: f64,
    pub p_adjusted: f64,
    pub confidence_factor: f64,
    pub feature_coverage: f64,
    pub feature_sum: f64,
    pub nonzero_features: usize,
    pub has_domain_keywords: bool,
    pub severity: SeverityResult,
    pub similarity: Option<SimilarityEstimate>,
    pub applicability: ApplicabilityDecision,
    pub verdict: RiskVerdict,
}

/// Count of verdicts per displayed risk level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub total: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
    pub not_applicable: usize,
    pub uncertain: usize,
}

impl RiskSummary {
    pub fn record(&mut self, outcome: &RiskOutcome) {
        self.total += 1;
        match outcome {
            RiskOutcome::Scored { level, .. } => match level {
                RiskLevel::Low => self.low += 1,
                RiskLevel::Medium => self.medium += 1,
                RiskLevel::High => self.high += 1,
                RiskLevel::Critical => self.critical += 1,
            },
            RiskOutcome::Gated { level, .. } => match level {
                GatedLevel::NotApplicable => self.not_applicable += 1,
                GatedLevel::Uncertain => self.uncertain += 1,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub predictions: Vec<PredictionReport>,
    pub summary: RiskSummary,
}
