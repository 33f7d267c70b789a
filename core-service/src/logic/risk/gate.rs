//! Applicability Gate
//!
//! Decides whether a sample is in scope for scoring at all. Each gating
//! condition is one `GateRule`; rule sets are ordered tables evaluated
//! first-match-wins.
//!
//! Two rule sets exist because the single-sample and batch paths of the
//! service diverged. `GateMode` picks one. A gated sample is a successful
//! verdict, not an error.

use crate::logic::config::{GateMode, RiskConfig};
use crate::logic::features::FeatureSignal;

use super::rules::{BATCH_PVULN_FLOOR, OOD_COVERAGE_THRESHOLD};
use super::types::{
    ApplicabilityDecision, GateDebug, GateReason, GateThresholds, SeverityResult, SimilarityEstimate,
};

// ============================================================================
// GATE CONTEXT
// ============================================================================

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct GateContext<'a> {
    pub p_adjusted: f64,
    pub signal: &'a FeatureSignal,
    pub similarity: Option<&'a SimilarityEstimate>,
    pub severity: &'a SeverityResult,
}

impl GateContext<'_> {
    fn max_similarity(&self) -> Option<f64> {
        self.similarity.and_then(|s| s.max_similarity)
    }

    fn user_severity(&self) -> bool {
        self.severity.is_user_provided()
    }

    fn below_similarity(&self, t: &GateThresholds) -> bool {
        self.max_similarity().is_some_and(|m| m < t.similarity_threshold)
    }
}

// ============================================================================
// GATE RULE TRAIT
// ============================================================================

pub trait GateRule: Send + Sync {
    fn name(&self) -> &str;
    fn reason(&self) -> GateReason;
    fn applies(&self, ctx: &GateContext<'_>, thresholds: &GateThresholds) -> bool;
}

// ============================================================================
// SHARED RULES
// ============================================================================

/// Processed text shorter than the minimum
pub struct EmptyTextRule;

impl GateRule for EmptyTextRule {
    fn name(&self) -> &str {
        "EmptyTextRule"
    }

    fn reason(&self) -> GateReason {
        GateReason::EmptyText
    }

    fn applies(&self, ctx: &GateContext<'_>, t: &GateThresholds) -> bool {
        ctx.signal.text_length < t.min_text_length
    }
}

// ============================================================================
// STRICT RULES (single sample)
// ============================================================================

/// Measured similarity below threshold, no caller severity
pub struct LowSimilarityRule;

impl GateRule for LowSimilarityRule {
    fn name(&self) -> &str {
        "LowSimilarityRule"
    }

    fn reason(&self) -> GateReason {
        GateReason::LowSimilarity
    }

    fn applies(&self, ctx: &GateContext<'_>, t: &GateThresholds) -> bool {
        !ctx.user_severity() && ctx.below_similarity(t)
    }
}

/// Too few discriminative tokens, no caller severity
pub struct LowSignalRule;

impl GateRule for LowSignalRule {
    fn name(&self) -> &str {
        "LowSignalRule"
    }

    fn reason(&self) -> GateReason {
        GateReason::LowSignal
    }

    fn applies(&self, ctx: &GateContext<'_>, t: &GateThresholds) -> bool {
        !ctx.user_severity() && ctx.signal.nonzero_features < t.min_nonzero_features
    }
}

/// Low probability, no caller severity, similarity unknown or low
pub struct LowPVulnRule;

impl GateRule for LowPVulnRule {
    fn name(&self) -> &str {
        "LowPVulnRule"
    }

    fn reason(&self) -> GateReason {
        GateReason::LowPVuln
    }

    fn applies(&self, ctx: &GateContext<'_>, t: &GateThresholds) -> bool {
        !ctx.user_severity()
            && ctx.p_adjusted < t.pvuln_threshold
            && (ctx.max_similarity().is_none() || ctx.below_similarity(t))
    }
}

// ============================================================================
// EXTENDED RULES (batch)
// ============================================================================

/// Severity absent because the similarity path found the text dissimilar
pub struct BatchLowSimilarityRule;

impl GateRule for BatchLowSimilarityRule {
    fn name(&self) -> &str {
        "BatchLowSimilarityRule"
    }

    fn reason(&self) -> GateReason {
        GateReason::LowSimilarity
    }

    fn applies(&self, ctx: &GateContext<'_>, _t: &GateThresholds) -> bool {
        ctx.severity.value.is_none() && ctx.similarity.is_some_and(SimilarityEstimate::is_low_similarity)
    }
}

/// Probability below the fixed floor for any system-derived severity
pub struct BatchLowPVulnRule;

impl GateRule for BatchLowPVulnRule {
    fn name(&self) -> &str {
        "BatchLowPVulnRule"
    }

    fn reason(&self) -> GateReason {
        GateReason::LowPVuln
    }

    fn applies(&self, ctx: &GateContext<'_>, _t: &GateThresholds) -> bool {
        ctx.p_adjusted < BATCH_PVULN_FLOOR && !ctx.user_severity()
    }
}

/// No severity and a probability inside the uncertain band (inclusive)
pub struct UncertainPVulnRule;

impl GateRule for UncertainPVulnRule {
    fn name(&self) -> &str {
        "UncertainPVulnRule"
    }

    fn reason(&self) -> GateReason {
        GateReason::UncertainPVuln
    }

    fn applies(&self, ctx: &GateContext<'_>, t: &GateThresholds) -> bool {
        ctx.severity.value.is_none()
            && (t.pvuln_uncertain_low..=t.pvuln_uncertain_high).contains(&ctx.p_adjusted)
    }
}

/// Out of distribution: almost no vocabulary hit, no keywords, no severity
pub struct OodRule;

impl GateRule for OodRule {
    fn name(&self) -> &str {
        "OodRule"
    }

    fn reason(&self) -> GateReason {
        GateReason::Ood
    }

    fn applies(&self, ctx: &GateContext<'_>, _t: &GateThresholds) -> bool {
        ctx.signal.feature_coverage < OOD_COVERAGE_THRESHOLD
            && !ctx.signal.has_domain_keywords
            && ctx.severity.value.is_none()
    }
}

// ============================================================================
// RULE TABLES
// ============================================================================

pub static STRICT_RULES: &[&dyn GateRule] = &[&EmptyTextRule, &LowSimilarityRule, &LowSignalRule, &LowPVulnRule];

pub static EXTENDED_RULES: &[&dyn GateRule] = &[
    &EmptyTextRule,
    &BatchLowSimilarityRule,
    &BatchLowPVulnRule,
    &UncertainPVulnRule,
    &OodRule,
];

pub fn rules_for(mode: GateMode) -> &'static [&'static dyn GateRule] {
    match mode {
        GateMode::Strict => STRICT_RULES,
        GateMode::Extended => EXTENDED_RULES,
    }
}

/// First matching rule, in table order
pub fn apply_rules(
    rules: &[&dyn GateRule],
    ctx: &GateContext<'_>,
    thresholds: &GateThresholds,
) -> Option<GateReason> {
    for rule in rules {
        if rule.applies(ctx, thresholds) {
            log::debug!("Gate rule {} matched", rule.name());
            return Some(rule.reason());
        }
    }
    None
}

// ============================================================================
// DECISION
// ============================================================================

/// Cutoffs in force for `mode`. The batch chain uses a fixed LOW_PVULN cutoff.
pub fn thresholds(config: &RiskConfig, mode: GateMode) -> GateThresholds {
    GateThresholds {
        similarity_threshold: config.similarity_threshold,
        pvuln_threshold: match mode {
            GateMode::Strict => config.pvuln_threshold,
            GateMode::Extended => BATCH_PVULN_FLOOR,
        },
        min_text_length: config.min_text_length,
        min_nonzero_features: config.min_nonzero_features,
        pvuln_uncertain_low: config.pvuln_uncertain_low,
        pvuln_uncertain_high: config.pvuln_uncertain_high,
    }
}

/// True when the sample is too short to be worth estimating anything for
pub fn is_empty_text(signal: &FeatureSignal, thresholds: &GateThresholds) -> bool {
    signal.text_length < thresholds.min_text_length
}

/// Run the gate for one sample.
///
/// With gating disabled the strict chain is skipped, but the debug snapshot
/// is still filled in. The batch chain has no off switch.
pub fn assess_applicability(ctx: &GateContext<'_>, config: &RiskConfig, mode: GateMode) -> ApplicabilityDecision {
    let thresholds = thresholds(config, mode);
    let debug = GateDebug {
        max_similarity: ctx.max_similarity(),
        nonzero_features: Some(ctx.signal.nonzero_features),
        text_length: ctx.signal.text_length,
        p_adjusted: ctx.p_adjusted,
    };

    let reason = if mode == GateMode::Strict && !config.gate_enabled {
        None
    } else {
        apply_rules(rules_for(mode), ctx, &thresholds)
    };

    ApplicabilityDecision {
        applicable: reason.is_none(),
        reason,
        thresholds,
        debug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::risk::types::{SeverityMethod, SimilarityFailure};

    fn signal(nonzero: usize, coverage: f64, len: usize, keywords: bool) -> FeatureSignal {
        FeatureSignal {
            nonzero_features: nonzero,
            total_features: 1000,
            feature_coverage: coverage,
            feature_sum: 1.0,
            text_length: len,
            has_domain_keywords: keywords,
        }
    }

    fn decide(
        p: f64,
        signal: &FeatureSignal,
        similarity: Option<&SimilarityEstimate>,
        severity: &SeverityResult,
        mode: GateMode,
    ) -> ApplicabilityDecision {
        let ctx = GateContext { p_adjusted: p, signal, similarity, severity };
        assess_applicability(&ctx, &RiskConfig::default(), mode)
    }

    fn low_sim() -> SimilarityEstimate {
        SimilarityEstimate::failed(SimilarityFailure::LowSimilarity, Some(0.10))
    }

    fn fallback(v: f64) -> SeverityResult {
        SeverityResult::estimated(v, SeverityMethod::PVulnFallback)
    }

    // ---- strict ----

    #[test]
    fn test_strict_empty_text_first() {
        let d = decide(0.0, &signal(0, 0.0, 5, false), Some(&low_sim()), &SeverityResult::user_provided(9.0), GateMode::Strict);
        assert_eq!(d.reason, Some(GateReason::EmptyText));
        assert!(!d.applicable);
        assert_eq!(d.debug.text_length, 5);
    }

    #[test]
    fn test_strict_low_similarity() {
        let severity = SeverityResult::absent(SeverityMethod::SimilarityFailed);
        let d = decide(0.9, &signal(1, 0.1, 50, true), Some(&low_sim()), &severity, GateMode::Strict);
        assert_eq!(d.reason, Some(GateReason::LowSimilarity));
        assert_eq!(d.debug.max_similarity, Some(0.10));
    }

    #[test]
    fn test_strict_estimation_error_counts_as_low_similarity() {
        let err = SimilarityEstimate::failed(SimilarityFailure::EstimationError, Some(0.0));
        let d = decide(0.9, &signal(10, 0.1, 50, true), Some(&err), &fallback(9.5), GateMode::Strict);
        assert_eq!(d.reason, Some(GateReason::LowSimilarity));
        assert_eq!(d.debug.max_similarity, Some(0.0));
    }

    #[test]
    fn test_strict_low_signal() {
        let ok = SimilarityEstimate::success(7.0, 0.5);
        let d = decide(0.9, &signal(2, 0.1, 50, true), Some(&ok), &fallback(7.0), GateMode::Strict);
        assert_eq!(d.reason, Some(GateReason::LowSignal));
    }

    #[test]
    fn test_strict_low_pvuln_needs_unknown_or_low_similarity() {
        let no_data = SimilarityEstimate::failed(SimilarityFailure::NoTrainingData, None);
        let d = decide(0.05, &signal(10, 0.1, 50, true), Some(&no_data), &fallback(0.5), GateMode::Strict);
        assert_eq!(d.reason, Some(GateReason::LowPVuln));

        // Measured and above threshold: low probability alone does not gate
        let ok = SimilarityEstimate::success(7.0, 0.5);
        let d = decide(0.05, &signal(10, 0.1, 50, true), Some(&ok), &fallback(7.0), GateMode::Strict);
        assert!(d.applicable);
        assert_eq!(d.reason, None);
    }

    #[test]
    fn test_user_severity_overrides_strict_rules() {
        let user = SeverityResult::user_provided(8.0);
        let d = decide(0.01, &signal(0, 0.0, 50, false), Some(&low_sim()), &user, GateMode::Strict);
        assert!(d.applicable);
    }

    #[test]
    fn test_gate_disabled_still_reports_debug() {
        let cfg = RiskConfig { gate_enabled: false, ..RiskConfig::default() };
        let s = signal(0, 0.0, 3, false);
        let severity = SeverityResult::absent(SeverityMethod::SimilarityFailed);
        let sim = low_sim();
        let ctx = GateContext { p_adjusted: 0.01, signal: &s, similarity: Some(&sim), severity: &severity };

        let d = assess_applicability(&ctx, &cfg, GateMode::Strict);
        assert!(d.applicable);
        assert_eq!(d.debug.text_length, 3);
        assert_eq!(d.debug.nonzero_features, Some(0));
        assert_eq!(d.debug.max_similarity, Some(0.10));

        // The batch chain ignores the switch
        let d = assess_applicability(&ctx, &cfg, GateMode::Extended);
        assert_eq!(d.reason, Some(GateReason::EmptyText));
    }

    // ---- extended ----

    #[test]
    fn test_extended_low_similarity() {
        let severity = SeverityResult::absent(SeverityMethod::SimilarityFailed);
        let d = decide(0.9, &signal(10, 0.1, 50, true), Some(&low_sim()), &severity, GateMode::Extended);
        assert_eq!(d.reason, Some(GateReason::LowSimilarity));
    }

    #[test]
    fn test_extended_low_pvuln_fixed_floor() {
        // Estimated severity does not protect against the floor
        let ok = SimilarityEstimate::success(9.0, 0.7);
        let est = SeverityResult::estimated(9.0, SeverityMethod::Similarity);
        let d = decide(0.25, &signal(10, 0.1, 50, true), Some(&ok), &est, GateMode::Extended);
        assert_eq!(d.reason, Some(GateReason::LowPVuln));
        assert_eq!(d.thresholds.pvuln_threshold, 0.3);

        let d = decide(0.25, &signal(10, 0.1, 50, true), None, &SeverityResult::user_provided(9.0), GateMode::Extended);
        assert!(d.applicable);
    }

    #[test]
    fn test_extended_uncertain_band_inclusive() {
        let absent = SeverityResult::absent(SeverityMethod::SimilarityFailed);
        let no_sim = SimilarityEstimate::failed(SimilarityFailure::NoTrainingData, None);
        for p in [0.35, 0.5, 0.65] {
            let d = decide(p, &signal(10, 0.1, 50, true), Some(&no_sim), &absent, GateMode::Extended);
            assert_eq!(d.reason, Some(GateReason::UncertainPVuln), "p={}", p);
            assert_eq!(GateReason::UncertainPVuln.gated_level().as_str(), "Uncertain");
        }
        let d = decide(0.66, &signal(10, 0.1, 50, true), Some(&no_sim), &absent, GateMode::Extended);
        assert!(d.applicable);
    }

    #[test]
    fn test_extended_ood() {
        let absent = SeverityResult::absent(SeverityMethod::SimilarityFailed);
        let d = decide(0.9, &signal(3, 0.005, 50, false), None, &absent, GateMode::Extended);
        assert_eq!(d.reason, Some(GateReason::Ood));

        let d = decide(0.9, &signal(3, 0.005, 50, true), None, &absent, GateMode::Extended);
        assert!(d.applicable);
    }

    #[test]
    fn test_rule_tables_order() {
        let names: Vec<&str> = STRICT_RULES.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["EmptyTextRule", "LowSimilarityRule", "LowSignalRule", "LowPVulnRule"]);
        let reasons: Vec<GateReason> = EXTENDED_RULES.iter().map(|r| r.reason()).collect();
        assert_eq!(
            reasons,
            [GateReason::EmptyText, GateReason::LowSimilarity, GateReason::LowPVuln, GateReason::UncertainPVuln, GateReason::Ood]
        );
    }
}
