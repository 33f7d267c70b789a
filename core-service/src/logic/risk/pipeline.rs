//! Risk Decision Pipeline
//!
//! Per sample: features -> P(vuln) -> confidence adjustment -> severity ->
//! applicability gate -> score or gated verdict.
//!
//! `assess` runs the strict single-sample chain, `assess_batch` the extended
//! batch chain. Samples are independent; the pipeline holds no mutable state.

use crate::logic::config::{GateMode, RiskConfig};
use crate::logic::error::{RiskError, RiskResult};
use crate::logic::features::{preprocess, FeatureSignal};
use crate::logic::model::ModelBundle;

use super::confidence::{adjust_confidence, matching_rule};
use super::explain::explain;
use super::gate::{self, GateContext};
use super::scorer;
use super::severity::{estimate_from_similarity, resolve_severity};
use super::types::{
    BatchReport, PredictionReport, RiskOutcome, RiskSummary, RiskVerdict, Sample, SeverityMethod,
    SeverityResult,
};

pub struct RiskPipeline<'a> {
    bundle: &'a ModelBundle,
    config: RiskConfig,
}

impl<'a> RiskPipeline<'a> {
    /// The model's own alpha, when present, overrides the configured one
    pub fn new(bundle: &'a ModelBundle, config: &RiskConfig) -> Self {
        let config = match bundle.metadata().alpha() {
            Some(alpha) => config.with_alpha(alpha),
            None => config.clone(),
        };
        Self { bundle, config }
    }

    /// Effective configuration (after the per-model alpha override)
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Single sample, strict gate
    pub fn assess(&self, sample: &Sample) -> RiskResult<PredictionReport> {
        if sample.text_description.is_empty() {
            return Err(RiskError::input("text_description is required"));
        }
        check_severity(sample, None)?;
        self.evaluate(sample, "unknown".to_string(), GateMode::Strict)
    }

    /// Many samples, extended gate, plus a per-level summary
    pub fn assess_batch(&self, samples: &[Sample]) -> RiskResult<BatchReport> {
        if samples.is_empty() {
            return Err(RiskError::input("samples must be a non-empty list"));
        }
        for (i, sample) in samples.iter().enumerate() {
            check_severity(sample, Some(i))?;
        }

        let mut summary = RiskSummary::default();
        let mut predictions = Vec::with_capacity(samples.len());
        for (i, sample) in samples.iter().enumerate() {
            let report = self.evaluate(sample, format!("sample_{}", i), GateMode::Extended)?;
            summary.record(&report.verdict.outcome);
            predictions.push(report);
        }

        log::info!(
            "Batch assessed: {} samples, {} gated",
            summary.total,
            summary.not_applicable + summary.uncertain
        );
        Ok(BatchReport { predictions, summary })
    }

    fn evaluate(&self, sample: &Sample, default_id: String, mode: GateMode) -> RiskResult<PredictionReport> {
        let vectorizer = self.bundle.vectorizer();
        let processed = preprocess(&sample.text_description);
        let x = vectorizer.transform(&processed);
        let signal = FeatureSignal::extract(&processed, &x);

        let p_raw = self.bundle.classifier().predict_proba(&x)?;
        let adjustment = adjust_confidence(p_raw, &signal);
        let thresholds = gate::thresholds(&self.config, mode);

        // Batch skips estimation entirely for texts it will reject as empty
        let (severity, similarity) = if mode == GateMode::Extended && gate::is_empty_text(&signal, &thresholds) {
            (SeverityResult::absent(SeverityMethod::NotApplicable), None)
        } else if let Some(value) = sample.cvss_base_score {
            (SeverityResult::user_provided(value), None)
        } else {
            let estimate = estimate_from_similarity(
                &x,
                self.bundle.corpus(),
                vectorizer.fingerprint(),
                self.config.similarity_threshold,
                self.config.top_k,
            );
            let severity = resolve_severity(None, Some(&estimate), adjustment.p_adjusted, mode);
            (severity, Some(estimate))
        };

        let ctx = GateContext {
            p_adjusted: adjustment.p_adjusted,
            signal: &signal,
            similarity: similarity.as_ref(),
            severity: &severity,
        };
        let applicability = gate::assess_applicability(&ctx, &self.config, mode);

        let (verdict, p_adjusted) = match applicability.reason {
            Some(reason) => {
                let verdict = RiskVerdict {
                    outcome: RiskOutcome::gated(reason),
                    explanation: Some(explain(reason, &applicability, signal.feature_coverage, mode)),
                };
                // Single-sample verdicts zero the probability once gated
                let p = match mode {
                    GateMode::Strict => 0.0,
                    GateMode::Extended => adjustment.p_adjusted,
                };
                (verdict, p)
            }
            None => {
                let verdict = RiskVerdict {
                    outcome: scorer::score(adjustment.p_adjusted, severity.value, self.config.alpha),
                    explanation: None,
                };
                (verdict, adjustment.p_adjusted)
            }
        };

        let sample_id = sample.sample_id.clone().unwrap_or(default_id);
        log::debug!(
            "{}: p_raw={:.3} p_adj={:.3} ({}) severity={:?} via {} -> {}",
            sample_id,
            p_raw,
            adjustment.p_adjusted,
            matching_rule(&signal).unwrap_or("none"),
            severity.value,
            severity.method.as_str(),
            verdict.outcome.label()
        );

        Ok(PredictionReport {
            sample_id,
            p_raw,
            p_adjusted,
            confidence_factor: adjustment.factor,
            feature_coverage: signal.feature_coverage,
            feature_sum: signal.feature_sum,
            nonzero_features: signal.nonzero_features,
            has_domain_keywords: signal.has_domain_keywords,
            severity,
            similarity,
            applicability,
            verdict,
        })
    }
}

/// Caller severities must be real numbers
fn check_severity(sample: &Sample, index: Option<usize>) -> RiskResult<()> {
    match sample.cvss_base_score {
        Some(v) if !v.is_finite() => Err(RiskError::input(match index {
            Some(i) => format!("samples[{}].cvss_base_score must be a finite number", i),
            None => "cvss_base_score must be a finite number".to_string(),
        })),
        _ => Ok(()),
    }
}
