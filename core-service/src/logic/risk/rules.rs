//! Risk Rules & Thresholds
//!
//! Constants for confidence adjustment, severity estimation, gating and
//! tiering. No decision logic here.

// ============================================================================
// CONFIGURABLE DEFAULTS (overridable through RiskConfig)
// ============================================================================

/// Weight of P(vuln) in the blended score
pub const DEFAULT_ALPHA: f64 = 0.6;

/// Below this corpus similarity, severity is not estimated
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.18;

pub const DEFAULT_PVULN_UNCERTAIN_LOW: f64 = 0.35;
pub const DEFAULT_PVULN_UNCERTAIN_HIGH: f64 = 0.65;

/// Minimum processed text length (chars)
pub const DEFAULT_MIN_TEXT_LENGTH: usize = 20;

/// Single-sample LOW_PVULN cutoff
pub const DEFAULT_PVULN_THRESHOLD: f64 = 0.10;

/// Minimum number of non-zero TF-IDF features
pub const DEFAULT_MIN_NONZERO_FEATURES: usize = 3;

/// Nearest neighbours used for similarity-weighted severity
pub const DEFAULT_TOP_K: usize = 5;

// ============================================================================
// FIXED CUTOFFS (not part of RiskConfig)
// ============================================================================

/// Neighbours at or below this similarity never contribute to the estimate
pub const NEIGHBOR_MIN_SIMILARITY: f64 = 0.1;

/// Batch path: minimum adjusted P(vuln) for the probability fallback and
/// for scoring a system-estimated severity
pub const BATCH_PVULN_FLOOR: f64 = 0.3;

/// Batch path: feature coverage below this (with no keywords) is OOD
pub const OOD_COVERAGE_THRESHOLD: f64 = 0.01;

// ============================================================================
// CONFIDENCE ADJUSTMENT
// ============================================================================

/// Coverage below this, or a very short text, is the hardest suppression
pub const COVERAGE_CRITICAL: f64 = 0.005;
pub const COVERAGE_VERY_LOW: f64 = 0.02;
pub const COVERAGE_LOW: f64 = 0.05;

/// Sum of TF-IDF weights below this means almost nothing matched
pub const FEATURE_SUM_LOW: f64 = 0.1;

/// Processed texts shorter than this are barely text at all
pub const SHORT_TEXT_CHARS: usize = 10;

// ============================================================================
// RISK TIERS
// ============================================================================

/// Below = Low
pub const MEDIUM_THRESHOLD: f64 = 0.4;
/// Below = Medium
pub const HIGH_THRESHOLD: f64 = 0.6;
/// At or above = Critical
pub const CRITICAL_THRESHOLD: f64 = 0.8;

// ============================================================================
// SEVERITY SCALE
// ============================================================================

pub const SEVERITY_MAX: f64 = 10.0;

/// Piecewise-linear P(vuln) -> severity curve as (p_start, p_end, sev_start, sev_end).
/// Segments are contiguous, so the curve is continuous and monotone.
pub const PROBABILITY_CURVE: [(f64, f64, f64, f64); 6] = [
    (0.0, 0.2, 0.0, 2.0),
    (0.2, 0.4, 2.0, 4.0),
    (0.4, 0.6, 4.0, 6.0),
    (0.6, 0.8, 6.0, 7.5),
    (0.8, 0.9, 7.5, 9.0),
    (0.9, 1.0, 9.0, 10.0),
];
