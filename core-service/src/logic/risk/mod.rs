//! Risk Module - scoring & applicability gating
//!
//! ## Architecture
//! - `types.rs` - data flowing through the pipeline
//! - `rules.rs` - thresholds and fixed cutoffs
//! - `confidence.rs` - raw probability suppression for weak signals
//! - `severity.rs` - corpus similarity / probability curve severity
//! - `gate.rs` - applicability rule tables
//! - `scorer.rs` - blended score and tier
//! - `explain.rs` - gated verdict explanations
//! - `pipeline.rs` - per-sample orchestration

pub mod types;
pub mod rules;
pub mod confidence;
pub mod severity;
pub mod gate;
pub mod scorer;
pub mod explain;
pub mod pipeline;


// Re-export common types
pub use types::{
    ApplicabilityDecision, BatchReport, ConfidenceAdjustment, GateDebug, GateReason, GateThresholds,
    GatedLevel, PredictionReport, RiskLevel, RiskOutcome, RiskSummary, RiskVerdict, Sample,
    SeverityMethod, SeverityResult, SimilarityEstimate, SimilarityFailure,
};
pub use confidence::adjust_confidence;
pub use severity::{estimate_from_probability, estimate_from_similarity, resolve_severity};
pub use gate::{assess_applicability, GateContext, GateRule};
pub use scorer::{risk_level, risk_score};
pub use pipeline::RiskPipeline;
