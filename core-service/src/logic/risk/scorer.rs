//! Risk Scorer
//!
//! Blends probability and normalized severity into a score in [0, 1] and
//! maps it to a tier. Never called for gated samples.

use super::rules::{CRITICAL_THRESHOLD, HIGH_THRESHOLD, MEDIUM_THRESHOLD, SEVERITY_MAX};
use super::types::{RiskLevel, RiskOutcome};

/// `alpha * p + (1 - alpha) * severity / 10`, or `p` alone without a severity
pub fn risk_score(p: f64, severity: Option<f64>, alpha: f64) -> f64 {
    let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };

    match severity.filter(|s| s.is_finite()) {
        Some(s) => {
            let c = s.clamp(0.0, SEVERITY_MAX) / SEVERITY_MAX;
            (alpha * p + (1.0 - alpha) * c).clamp(0.0, 1.0)
        }
        None => p,
    }
}

/// Lower bounds are inclusive: 0.4 is Medium, 0.8 is Critical
pub fn risk_level(score: f64) -> RiskLevel {
    if score < MEDIUM_THRESHOLD {
        RiskLevel::Low
    } else if score < HIGH_THRESHOLD {
        RiskLevel::Medium
    } else if score < CRITICAL_THRESHOLD {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

pub fn score(p: f64, severity: Option<f64>, alpha: f64) -> RiskOutcome {
    let score = risk_score(p, severity, alpha);
    RiskOutcome::Scored {
        score,
        level: risk_level(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend() {
        assert!((risk_score(0.5, Some(5.0), 0.6) - 0.5).abs() < 1e-12);
        assert!((risk_score(1.0, Some(0.0), 0.6) - 0.6).abs() < 1e-12);
        assert!((risk_score(0.0, Some(10.0), 0.6) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_edges() {
        assert_eq!(risk_score(0.0, None, 0.6), 0.0);
        for alpha in [0.0, 0.3, 0.6, 1.0] {
            assert!((risk_score(1.0, Some(10.0), alpha) - 1.0).abs() < 1e-12);
        }
        // Out-of-range inputs are clamped
        assert_eq!(risk_score(1.7, None, 0.6), 1.0);
        assert!((risk_score(1.0, Some(42.0), 0.6) - 1.0).abs() < 1e-12);
        assert!((risk_score(0.0, Some(-3.0), 0.6) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_monotone() {
        for alpha in [0.0, 0.25, 0.6, 1.0] {
            for i in 0..10 {
                let p = i as f64 / 10.0;
                let next_p = (i + 1) as f64 / 10.0;
                for j in 0..10 {
                    let s = j as f64;
                    assert!(risk_score(next_p, Some(s), alpha) >= risk_score(p, Some(s), alpha));
                    assert!(risk_score(p, Some(s + 1.0), alpha) >= risk_score(p, Some(s), alpha));
                }
            }
        }
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(risk_level(0.0), RiskLevel::Low);
        assert_eq!(risk_level(0.399_999), RiskLevel::Low);
        assert_eq!(risk_level(0.4), RiskLevel::Medium);
        assert_eq!(risk_level(0.6), RiskLevel::High);
        assert_eq!(risk_level(0.799_999), RiskLevel::High);
        assert_eq!(risk_level(0.8), RiskLevel::Critical);
        assert_eq!(risk_level(1.0), RiskLevel::Critical);
    }

    #[test]
    fn test_score_outcome() {
        let outcome = score(0.9, Some(9.0), 0.6);
        assert!(outcome.is_scored());
        assert_eq!(outcome.label(), "Critical");
    }
}
