//! Severity Estimator
//!
//! Two paths: similarity-weighted mean over the nearest corpus entries, or a
//! fixed probability curve as fallback. `resolve_severity` picks between
//! them and between both and a caller-supplied value.

use std::cmp::Ordering;

use crate::logic::config::GateMode;
use crate::logic::error::{RiskError, RiskResult};
use crate::logic::features::SparseVector;
use crate::logic::model::IndexedCorpus;

use super::rules::{BATCH_PVULN_FLOOR, NEIGHBOR_MIN_SIMILARITY, PROBABILITY_CURVE, SEVERITY_MAX};
use super::types::{SeverityMethod, SeverityResult, SimilarityEstimate, SimilarityFailure};

/// Round to one decimal, exact ties to even
pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}

// ============================================================================
// SIMILARITY PATH
// ============================================================================

/// Estimate severity from the `top_k` most similar corpus entries.
///
/// Never fails: errors degrade to `ESTIMATION_ERROR` with a measured
/// similarity of 0, a missing corpus to `NO_TRAINING_DATA`.
pub fn estimate_from_similarity(
    query: &SparseVector,
    corpus: Option<&IndexedCorpus>,
    vectorizer_fingerprint: u32,
    similarity_threshold: f64,
    top_k: usize,
) -> SimilarityEstimate {
    let corpus = match corpus {
        Some(c) if !c.is_empty() => c,
        _ => return SimilarityEstimate::failed(SimilarityFailure::NoTrainingData, None),
    };

    match weighted_neighbor_severity(query, corpus, vectorizer_fingerprint, similarity_threshold, top_k) {
        Ok(estimate) => estimate,
        Err(e) => {
            log::warn!("Similarity estimation failed: {}", e);
            SimilarityEstimate::failed(SimilarityFailure::EstimationError, Some(0.0))
        }
    }
}

fn weighted_neighbor_severity(
    query: &SparseVector,
    corpus: &IndexedCorpus,
    vectorizer_fingerprint: u32,
    similarity_threshold: f64,
    top_k: usize,
) -> RiskResult<SimilarityEstimate> {
    if corpus.fingerprint != vectorizer_fingerprint {
        return Err(RiskError::Estimation(format!(
            "corpus indexed with vectorizer {:08x}, query uses {:08x}",
            corpus.fingerprint, vectorizer_fingerprint
        )));
    }

    let mut scored: Vec<(usize, f64)> = Vec::with_capacity(corpus.len());
    for (i, entry) in corpus.entries.iter().enumerate() {
        if entry.vector.dim != query.dim {
            return Err(RiskError::Estimation(format!(
                "corpus entry {} has {} features, query has {}",
                i, entry.vector.dim, query.dim
            )));
        }
        let sim = query.cosine(&entry.vector);
        if !sim.is_finite() {
            return Err(RiskError::Estimation(format!("non-finite similarity for corpus entry {}", i)));
        }
        scored.push((i, sim));
    }

    let max_similarity = scored.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);
    if max_similarity < similarity_threshold {
        return Ok(SimilarityEstimate::failed(SimilarityFailure::LowSimilarity, Some(max_similarity)));
    }

    // Highest similarity first, ties by corpus order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));

    let (weighted_sum, weight_sum) = scored
        .iter()
        .take(top_k)
        .filter(|(_, sim)| *sim > NEIGHBOR_MIN_SIMILARITY)
        .fold((0.0, 0.0), |(ws, w), (i, sim)| {
            (ws + sim * corpus.entries[*i].severity, w + sim)
        });

    if weight_sum <= 0.0 {
        return Ok(SimilarityEstimate::failed(SimilarityFailure::LowSimilarity, Some(max_similarity)));
    }

    let severity = round1(weighted_sum / weight_sum).clamp(0.0, SEVERITY_MAX);
    Ok(SimilarityEstimate::success(severity, max_similarity))
}

// ============================================================================
// PROBABILITY FALLBACK
// ============================================================================

/// Map P(vuln) onto the 0-10 severity scale with the fixed piecewise curve
pub fn estimate_from_probability(p: f64) -> f64 {
    let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };

    // p == 1.0 falls through to the closed last segment
    let segment = PROBABILITY_CURVE
        .iter()
        .position(|&(_, p_end, _, _)| p < p_end)
        .unwrap_or(PROBABILITY_CURVE.len() - 1);
    let (p0, p1, s0, s1) = PROBABILITY_CURVE[segment];

    round1(s0 + (p - p0) / (p1 - p0) * (s1 - s0))
}

// ============================================================================
// METHOD RESOLUTION
// ============================================================================

/// Decide which severity the sample carries.
///
/// A caller value always wins. `LOW_SIMILARITY` forbids the probability
/// fallback; any other similarity failure permits it. The batch chain also
/// refuses the fallback below the fixed probability floor.
pub fn resolve_severity(
    user_severity: Option<f64>,
    similarity: Option<&SimilarityEstimate>,
    p_adjusted: f64,
    mode: GateMode,
) -> SeverityResult {
    if let Some(value) = user_severity {
        return SeverityResult::user_provided(value);
    }

    if let Some(estimate) = similarity {
        if let Some(value) = estimate.severity {
            return SeverityResult::estimated(value, SeverityMethod::Similarity);
        }
        if estimate.is_low_similarity() {
            return SeverityResult::absent(SeverityMethod::SimilarityFailed);
        }
    }

    if mode == GateMode::Extended && p_adjusted < BATCH_PVULN_FLOOR {
        return SeverityResult::absent(SeverityMethod::LowPVuln);
    }

    SeverityResult::estimated(estimate_from_probability(p_adjusted), SeverityMethod::PVulnFallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::IndexedEntry;

    fn corpus(entries: Vec<(Vec<(usize, f64)>, f64)>) -> IndexedCorpus {
        IndexedCorpus {
            fingerprint: 7,
            entries: entries
                .into_iter()
                .map(|(pairs, severity)| {
                    let mut vector = SparseVector::from_pairs(4, pairs);
                    vector.l2_normalize();
                    IndexedEntry { vector, severity }
                })
                .collect(),
        }
    }

    fn query(pairs: Vec<(usize, f64)>) -> SparseVector {
        let mut q = SparseVector::from_pairs(4, pairs);
        q.l2_normalize();
        q
    }

    #[test]
    fn test_no_corpus() {
        let est = estimate_from_similarity(&query(vec![(0, 1.0)]), None, 7, 0.18, 5);
        assert_eq!(est.failure, Some(SimilarityFailure::NoTrainingData));
        assert_eq!(est.max_similarity, None);

        let empty = IndexedCorpus { fingerprint: 7, entries: vec![] };
        let est = estimate_from_similarity(&query(vec![(0, 1.0)]), Some(&empty), 7, 0.18, 5);
        assert_eq!(est.failure, Some(SimilarityFailure::NoTrainingData));
    }

    #[test]
    fn test_weighted_mean_of_neighbors() {
        let c = corpus(vec![
            (vec![(0, 1.0)], 9.0),
            (vec![(0, 1.0), (1, 1.0)], 5.0),
            (vec![(3, 1.0)], 1.0),
        ]);
        let est = estimate_from_similarity(&query(vec![(0, 1.0)]), Some(&c), 7, 0.18, 5);
        assert!(est.estimated);
        assert_eq!(est.max_similarity, Some(1.0));
        // weights 1.0 and 0.7071, third entry has similarity 0
        let expected = round1((9.0 + 5.0 * 0.5f64.sqrt()) / (1.0 + 0.5f64.sqrt()));
        assert_eq!(est.severity, Some(expected));
    }

    #[test]
    fn test_top_k_limits_neighbors() {
        let c = corpus(vec![
            (vec![(0, 1.0), (1, 0.2)], 2.0),
            (vec![(0, 1.0)], 10.0),
        ]);
        let est = estimate_from_similarity(&query(vec![(0, 1.0)]), Some(&c), 7, 0.18, 1);
        assert_eq!(est.severity, Some(10.0));
    }

    #[test]
    fn test_low_similarity() {
        let c = corpus(vec![(vec![(2, 1.0)], 9.0)]);
        let est = estimate_from_similarity(&query(vec![(0, 1.0)]), Some(&c), 7, 0.18, 5);
        assert_eq!(est.failure, Some(SimilarityFailure::LowSimilarity));
        assert_eq!(est.max_similarity, Some(0.0));
        assert_eq!(est.severity, None);
    }

    #[test]
    fn test_neighbors_filtered_below_floor() {
        // Max similarity passes a low threshold but no entry exceeds 0.1
        let c = corpus(vec![(vec![(0, 0.1), (1, 1.0)], 9.0)]);
        let q = query(vec![(0, 1.0)]);
        let sim = q.cosine(&c.entries[0].vector);
        assert!(sim < 0.1 && sim > 0.05);
        let est = estimate_from_similarity(&q, Some(&c), 7, 0.05, 5);
        assert_eq!(est.failure, Some(SimilarityFailure::LowSimilarity));
    }

    #[test]
    fn test_fingerprint_mismatch_is_estimation_error() {
        let c = corpus(vec![(vec![(0, 1.0)], 9.0)]);
        let est = estimate_from_similarity(&query(vec![(0, 1.0)]), Some(&c), 8, 0.18, 5);
        assert_eq!(est.failure, Some(SimilarityFailure::EstimationError));
        assert_eq!(est.max_similarity, Some(0.0));
    }

    #[test]
    fn test_tied_weighted_mean_rounds_to_even() {
        let c = corpus(vec![
            (vec![(0, 1.0)], 7.0),
            (vec![(0, 1.0)], 7.5),
        ]);
        let est = estimate_from_similarity(&query(vec![(0, 1.0)]), Some(&c), 7, 0.18, 5);
        // mean is exactly 7.25
        assert_eq!(est.severity, Some(7.2));
    }

    #[test]
    fn test_round1_ties() {
        assert_eq!(round1(7.25), 7.2);
        assert_eq!(round1(0.25), 0.2);
        assert_eq!(round1(7.26), 7.3);
        assert_eq!(round1(6.375), 6.4);
    }

    #[test]
    fn test_probability_curve_points() {
        assert_eq!(estimate_from_probability(0.0), 0.0);
        assert_eq!(estimate_from_probability(0.1), 1.0);
        assert_eq!(estimate_from_probability(0.5), 5.0);
        assert_eq!(estimate_from_probability(0.65), 6.4);
        assert_eq!(estimate_from_probability(0.82), 7.8);
        assert_eq!(estimate_from_probability(0.95), 9.5);
        assert_eq!(estimate_from_probability(1.0), 10.0);
        assert_eq!(estimate_from_probability(1.5), 10.0);
        assert_eq!(estimate_from_probability(-0.5), 0.0);
    }

    #[test]
    fn test_probability_curve_continuous_and_monotone() {
        for &b in &[0.2, 0.4, 0.6, 0.8, 0.9] {
            let below = estimate_from_probability(b - 1e-9);
            let at = estimate_from_probability(b);
            assert!((at - below).abs() <= 0.1 + 1e-9, "jump at {}: {} -> {}", b, below, at);
        }
        let mut prev = estimate_from_probability(0.0);
        for i in 1..=1000 {
            let s = estimate_from_probability(i as f64 / 1000.0);
            assert!(s >= prev);
            prev = s;
        }
    }

    #[test]
    fn test_resolve_user_value_wins() {
        let low = SimilarityEstimate::failed(SimilarityFailure::LowSimilarity, Some(0.05));
        let r = resolve_severity(Some(7.5), Some(&low), 0.0, GateMode::Extended);
        assert_eq!(r, SeverityResult::user_provided(7.5));
        assert!(!r.estimated);
    }

    #[test]
    fn test_resolve_low_similarity_forbids_fallback() {
        let low = SimilarityEstimate::failed(SimilarityFailure::LowSimilarity, Some(0.05));
        let r = resolve_severity(None, Some(&low), 0.95, GateMode::Strict);
        assert_eq!(r.method, SeverityMethod::SimilarityFailed);
        assert_eq!(r.value, None);
    }

    #[test]
    fn test_resolve_fallback_paths() {
        let none = SimilarityEstimate::failed(SimilarityFailure::NoTrainingData, None);
        let err = SimilarityEstimate::failed(SimilarityFailure::EstimationError, None);

        let r = resolve_severity(None, Some(&none), 0.95, GateMode::Strict);
        assert_eq!(r, SeverityResult::estimated(9.5, SeverityMethod::PVulnFallback));
        let r = resolve_severity(None, Some(&err), 0.5, GateMode::Extended);
        assert_eq!(r.method, SeverityMethod::PVulnFallback);

        // Batch floor
        let r = resolve_severity(None, Some(&none), 0.29, GateMode::Extended);
        assert_eq!(r, SeverityResult::absent(SeverityMethod::LowPVuln));
        let r = resolve_severity(None, Some(&none), 0.29, GateMode::Strict);
        assert_eq!(r.method, SeverityMethod::PVulnFallback);
    }

    #[test]
    fn test_resolve_similarity_success() {
        let ok = SimilarityEstimate::success(6.4, 0.8);
        let r = resolve_severity(None, Some(&ok), 0.1, GateMode::Extended);
        assert_eq!(r, SeverityResult::estimated(6.4, SeverityMethod::Similarity));
    }
}
