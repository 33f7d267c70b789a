//! Confidence Adjuster
//!
//! Suppresses the raw P(vuln) when the text hits little of the model's
//! vocabulary. Ordered rule table, first match wins.

use crate::logic::features::FeatureSignal;

use super::rules::{COVERAGE_CRITICAL, COVERAGE_LOW, COVERAGE_VERY_LOW, FEATURE_SUM_LOW, SHORT_TEXT_CHARS};
use super::types::ConfidenceAdjustment;

struct ConfidenceRule {
    name: &'static str,
    matches: fn(&FeatureSignal) -> bool,
    factor: f64,
    /// Upper bound on the adjusted probability
    cap: Option<f64>,
}

static CONFIDENCE_RULES: [ConfidenceRule; 5] = [
    ConfidenceRule {
        name: "critical_coverage_or_short_text",
        matches: |s| s.feature_coverage < COVERAGE_CRITICAL || s.text_length < SHORT_TEXT_CHARS,
        factor: 0.1,
        cap: Some(0.15),
    },
    ConfidenceRule {
        name: "very_low_coverage_no_keywords",
        matches: |s| s.feature_coverage < COVERAGE_VERY_LOW && !s.has_domain_keywords,
        factor: 0.2,
        cap: Some(0.25),
    },
    ConfidenceRule {
        name: "low_coverage_no_keywords",
        matches: |s| s.feature_coverage < COVERAGE_LOW && !s.has_domain_keywords,
        factor: 0.4,
        cap: Some(0.35),
    },
    ConfidenceRule {
        name: "low_feature_sum_no_keywords",
        matches: |s| s.feature_sum < FEATURE_SUM_LOW && !s.has_domain_keywords,
        factor: 0.3,
        cap: Some(0.30),
    },
    ConfidenceRule {
        name: "low_coverage_with_keywords",
        matches: |s| s.feature_coverage < COVERAGE_LOW,
        factor: 0.7,
        cap: None,
    },
];

/// Name of the rule that fires for this signal, `None` when no suppression applies
pub fn matching_rule(signal: &FeatureSignal) -> Option<&'static str> {
    CONFIDENCE_RULES
        .iter()
        .find(|rule| (rule.matches)(signal))
        .map(|rule| rule.name)
}

/// Adjust the raw probability for a weak feature signal.
///
/// `p_adjusted <= p_raw` for every `p_raw` in [0, 1].
pub fn adjust_confidence(p_raw: f64, signal: &FeatureSignal) -> ConfidenceAdjustment {
    let p_raw = p_raw.clamp(0.0, 1.0);

    match CONFIDENCE_RULES.iter().find(|rule| (rule.matches)(signal)) {
        Some(rule) => {
            let scaled = p_raw * rule.factor;
            ConfidenceAdjustment {
                factor: rule.factor,
                p_adjusted: rule.cap.map_or(scaled, |cap| scaled.min(cap)),
            }
        }
        None => ConfidenceAdjustment {
            factor: 1.0,
            p_adjusted: p_raw,
        },
    }
}
