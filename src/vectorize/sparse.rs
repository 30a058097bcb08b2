//! Sparse sentence vectors
//!
//! Each row of the weight matrix is a sparse vector over the vocabulary,
//! stored as `(term id, weight)` pairs sorted by term id so that every
//! reduction runs in the same order on every call.

use rustc_hash::FxHashMap;

/// A sparse row vector, L2-normalized unless it is empty
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    /// Non-zero dimensions: term id -> weight, sorted by term id
    entries: Vec<(u32, f64)>,
    /// L2 norm before normalization
    norm: f64,
}

impl SparseVector {
    /// Create an empty (all-zero) vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a unit vector from raw weights.
    ///
    /// Zero weights are dropped. A vector with zero norm stays empty.
    pub fn from_dimensions(dimensions: FxHashMap<u32, f64>) -> Self {
        let mut entries: Vec<(u32, f64)> =
            dimensions.into_iter().filter(|&(_, w)| w != 0.0).collect();
        entries.sort_unstable_by_key(|&(term, _)| term);

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }
        Self { entries, norm }
    }

    /// Norm the weights had before normalization
    pub fn raw_norm(&self) -> f64 {
        self.norm
    }

    /// Current L2 norm (1.0, or 0.0 for an empty vector)
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    pub fn norm_squared(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum()
    }

    /// Non-zero entries in term order
    pub fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }

    pub fn get(&self, term: u32) -> f64 {
        self.entries
            .binary_search_by_key(&term, |&(t, _)| t)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mean of the non-zero entries (0 for an empty vector)
    pub fn mean_nonzero(&self) -> f64 {
        if self.entries.is_empty() {
            0.0
        } else {
            self.entries.iter().map(|(_, w)| w).sum::<f64>() / self.entries.len() as f64
        }
    }

    /// Dot product with another sparse vector (merge walk)
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ta, wa) = self.entries[i];
            let (tb, wb) = other.entries[j];
            match ta.cmp(&tb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        dot
    }

    /// Cosine similarity; rows are unit length so this is the dot product
    pub fn cosine_similarity(&self, other: &SparseVector) -> f64 {
        self.dot(other)
    }

    /// Dot product with a dense vector
    pub fn dot_dense(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(t, w)| w * dense[t as usize])
            .sum()
    }

    /// Squared Euclidean distance to a dense point whose squared norm is known
    pub fn squared_distance_to(&self, dense: &[f64], dense_norm_sq: f64) -> f64 {
        let d = self.norm_squared() - 2.0 * self.dot_dense(dense) + dense_norm_sq;
        d.max(0.0)
    }

    /// Accumulate this vector into a dense buffer
    pub fn add_to(&self, dense: &mut [f64]) {
        for &(t, w) in &self.entries {
            dense[t as usize] += w;
        }
    }

    /// Expand to a dense vector of the given dimension
    pub fn to_dense(&self, dim: usize) -> Vec<f64> {
        let mut dense = vec![0.0; dim];
        self.add_to(&mut dense);
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(pairs: &[(u32, f64)]) -> SparseVector {
        SparseVector::from_dimensions(pairs.iter().copied().collect())
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let v1 = vector(&[(0, 1.0), (1, 2.0)]);
        let v2 = vector(&[(0, 1.0), (1, 2.0)]);

        let sim = v1.cosine_similarity(&v2);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let v1 = vector(&[(0, 1.0)]);
        let v2 = vector(&[(1, 1.0)]);

        assert!(v1.cosine_similarity(&v2).abs() < 1e-9);
    }

    #[test]
    fn test_empty_vector() {
        let v = SparseVector::from_dimensions(FxHashMap::default());
        assert!(v.is_empty());
        assert_eq!(v.norm(), 0.0);
        assert_eq!(v.mean_nonzero(), 0.0);
    }

    #[test]
    fn test_unit_normalization() {
        let v = vector(&[(3, 3.0), (7, 4.0)]);

        assert!((v.norm() - 1.0).abs() < 1e-9);
        assert!((v.raw_norm() - 5.0).abs() < 1e-9);
        assert!((v.get(3) - 0.6).abs() < 1e-9);
        assert!((v.get(7) - 0.8).abs() < 1e-9);
        assert_eq!(v.get(5), 0.0);
    }

    #[test]
    fn test_entries_sorted_by_term() {
        let v = vector(&[(9, 1.0), (2, 1.0), (5, 1.0)]);
        let terms: Vec<u32> = v.entries().iter().map(|&(t, _)| t).collect();
        assert_eq!(terms, vec![2, 5, 9]);
    }

    #[test]
    fn test_squared_distance_matches_dense() {
        let v = vector(&[(0, 3.0), (2, 4.0)]);
        let point = vec![0.1, 0.5, 0.2];
        let norm_sq: f64 = point.iter().map(|x| x * x).sum();

        let dense = v.to_dense(3);
        let expected: f64 = dense
            .iter()
            .zip(&point)
            .map(|(a, b)| (a - b) * (a - b))
            .sum();

        assert!((v.squared_distance_to(&point, norm_sq) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_mean_nonzero() {
        let v = vector(&[(0, 3.0), (1, 4.0)]);
        assert!((v.mean_nonzero() - 0.7).abs() < 1e-9);
    }
}
