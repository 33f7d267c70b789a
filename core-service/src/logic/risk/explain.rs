//! Gate Explanations
//!
//! Human-readable text for gated verdicts. Wording differs between the
//! single-sample and batch chains.

use crate::logic::config::GateMode;

use super::types::{ApplicabilityDecision, GateReason};

/// Explanation for a gated sample. `feature_coverage` is only quoted by OOD.
pub fn explain(reason: GateReason, decision: &ApplicabilityDecision, feature_coverage: f64, mode: GateMode) -> String {
    let t = &decision.thresholds;
    let d = &decision.debug;
    let max_sim = d.max_similarity.unwrap_or(0.0);

    match mode {
        GateMode::Strict => match reason {
            GateReason::EmptyText => format!(
                "Input text too short ({} chars < {} chars). Scoring not applicable.",
                d.text_length, t.min_text_length
            ),
            GateReason::LowSimilarity => format!(
                "Input text has low similarity to vulnerability corpus (max similarity {:.3} < {}). Scoring not applicable.",
                max_sim, t.similarity_threshold
            ),
            GateReason::LowSignal => format!(
                "Input text has insufficient TF-IDF features ({} < {}). Scoring not applicable.",
                d.nonzero_features.unwrap_or(0),
                t.min_nonzero_features
            ),
            GateReason::LowPVuln => format!(
                "Input text has very low vulnerability probability ({:.3} < {}). Input text not vulnerability-related; scoring not applicable.",
                d.p_adjusted, t.pvuln_threshold
            ),
            GateReason::UncertainPVuln | GateReason::Ood => {
                "Input text not vulnerability-related; scoring not applicable.".to_string()
            }
        },
        GateMode::Extended => match reason {
            GateReason::EmptyText => format!(
                "Input text too short ({} chars < {} chars); no valid prediction possible.",
                d.text_length, t.min_text_length
            ),
            GateReason::LowSimilarity => format!(
                "Input text has low similarity to the training data ({:.3} < {}); risk cannot be estimated reliably.",
                max_sim, t.similarity_threshold
            ),
            GateReason::LowPVuln => format!(
                "Vulnerability probability is very low ({:.3} < {}); the model does not consider this a vulnerability, risk level cannot be determined.",
                d.p_adjusted, t.pvuln_threshold
            ),
            GateReason::UncertainPVuln => format!(
                "Vulnerability probability is in the uncertain band ({:.3} in [{}, {}]) and no severity is available; risk level cannot be determined.",
                d.p_adjusted, t.pvuln_uncertain_low, t.pvuln_uncertain_high
            ),
            GateReason::Ood => format!(
                "Input text differs greatly from the training data (feature coverage {:.4} < 0.01) and has no security keywords; risk cannot be assessed.",
                feature_coverage
            ),
            GateReason::LowSignal => format!(
                "Input text has insufficient TF-IDF features ({} < {}); risk cannot be assessed.",
                d.nonzero_features.unwrap_or(0),
                t.min_nonzero_features
            ),
        },
    }
}
