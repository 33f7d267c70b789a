//! Sparse Feature Vector
//!
//! Output of the vectorizer. Entries are kept sorted by index so dot
//! products are a linear merge.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    /// Total number of features (vocabulary size)
    pub dim: usize,
    /// (index, value) pairs, sorted by index, no zeros
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from arbitrary pairs. Duplicates are summed, zeros and
    /// out-of-range indices dropped.
    pub fn from_pairs(dim: usize, mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|(i, _)| *i);

        let mut entries: Vec<(usize, f64)> = Vec::with_capacity(pairs.len());
        for (i, v) in pairs {
            if i >= dim {
                continue;
            }
            match entries.last_mut() {
                Some((last, acc)) if *last == i => *acc += v,
                _ => entries.push((i, v)),
            }
        }
        entries.retain(|(_, v)| *v != 0.0);

        Self { dim, entries }
    }

    pub fn zeros(dim: usize) -> Self {
        Self { dim, entries: Vec::new() }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn nonzero_count(&self) -> usize {
        self.entries.len()
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scale in place to unit L2 norm (no-op on the zero vector)
    pub fn l2_normalize(&mut self) {
        let n = self.norm();
        if n > 0.0 {
            for (_, v) in &mut self.entries {
                *v /= n;
            }
        }
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0usize, 0usize);
        let mut acc = 0.0;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    acc += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        acc
    }

    /// Dot product against a dense weight vector
    pub fn dot_dense(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|(i, v)| weights.get(*i).map(|w| w * v))
            .sum()
    }

    /// Cosine similarity. 0 when either side is the zero vector.
    pub fn cosine(&self, other: &SparseVector) -> f64 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 0.0;
        }
        self.dot(other) / denom
    }
}
