//! Sentence clustering
//!
//! Partitions the TF-IDF rows into topic groups with K-Means and provides
//! the WCSS elbow diagnostic.

pub mod elbow;
pub mod kmeans;

use serde::Serialize;

pub use elbow::{elbow_points, find_elbow, wcss_curve, ElbowPoint};
pub use kmeans::KMeans;

/// Cluster count for a compression ratio: `round(ratio * n)` clamped to `[1, n]`
pub fn clusters_for_ratio(n: usize, ratio: f64) -> usize {
    let k = (ratio * n as f64).round();
    let k = if k.is_finite() && k > 0.0 { k as usize } else { 1 };
    clusters_for_count(n, k)
}

/// Clamp an explicit cluster count to `[1, n]`
pub fn clusters_for_count(n: usize, count: usize) -> usize {
    count.clamp(1, n.max(1))
}

/// Mapping from sentence index to cluster id in `[0, k)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAssignment {
    labels: Vec<usize>,
    k: usize,
    iterations: usize,
    converged: bool,
    wcss: f64,
}

impl ClusterAssignment {
    pub fn new(labels: Vec<usize>, k: usize, iterations: usize, converged: bool, wcss: f64) -> Self {
        Self {
            labels,
            k,
            iterations,
            converged,
            wcss,
        }
    }

    /// Every sentence in its own cluster; no iterations run
    pub fn singletons(n: usize) -> Self {
        Self::new((0..n).collect(), n, 0, true, 0.0)
    }

    /// Sentence `i` goes to cluster `min(i, k - 1)`.
    ///
    /// Used when no sentence has a counted term, so every row is the zero
    /// vector and distances carry no information.
    pub fn positional(n: usize, k: usize) -> Self {
        let k = clusters_for_count(n, k).min(n);
        let labels = (0..n).map(|i| i.min(k.saturating_sub(1))).collect();
        Self::new(labels, k, 0, true, 0.0)
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Cluster id of sentence `i`
    pub fn cluster_of(&self, i: usize) -> Option<usize> {
        self.labels.get(i).copied()
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Member sentence indices of cluster `c`, ascending
    pub fn members(&self, c: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == c)
            .map(|(i, _)| i)
            .collect()
    }

    /// All clusters as member lists, indexed by cluster id
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.k];
        for (i, &c) in self.labels.iter().enumerate() {
            if let Some(group) = groups.get_mut(c) {
                group.push(i);
            }
        }
        groups
    }

    /// Member count per cluster
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        for &c in &self.labels {
            if let Some(size) = sizes.get_mut(c) {
                *size += 1;
            }
        }
        sizes
    }

    /// Every label is in `[0, k)` and no cluster is empty
    pub fn is_complete(&self) -> bool {
        self.labels.iter().all(|&c| c < self.k) && self.sizes().iter().all(|&s| s > 0)
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Within-cluster sum of squared distances to the centroids
    pub fn wcss(&self) -> f64 {
        self.wcss
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clusters_for_ratio() {
        assert_eq!(clusters_for_ratio(10, 0.2), 2);
        assert_eq!(clusters_for_ratio(10, 0.3), 3);
        assert_eq!(clusters_for_ratio(5, 0.3), 2); // 1.5 rounds up
        assert_eq!(clusters_for_ratio(3, 0.1), 1); // never below 1
        assert_eq!(clusters_for_ratio(3, 1.0), 3);
        assert_eq!(clusters_for_ratio(1, 0.5), 1);
    }

    #[test]
    fn test_clusters_for_count() {
        assert_eq!(clusters_for_count(10, 4), 4);
        assert_eq!(clusters_for_count(3, 7), 3);
        assert_eq!(clusters_for_count(3, 0), 1);
    }

    #[test]
    fn test_singletons() {
        let a = ClusterAssignment::singletons(3);
        assert_eq!(a.labels(), &[0, 1, 2]);
        assert_eq!(a.k(), 3);
        assert_eq!(a.iterations(), 0);
    }

    #[test]
    fn test_positional() {
        let a = ClusterAssignment::positional(5, 2);
        assert_eq!(a.labels(), &[0, 1, 1, 1, 1]);
        assert_eq!(a.sizes(), vec![1, 4]);
    }

    #[test]
    fn test_members_and_clusters() {
        let a = ClusterAssignment::new(vec![1, 0, 1, 0, 2], 3, 4, true, 0.5);
        assert_eq!(a.members(0), vec![1, 3]);
        assert_eq!(a.members(1), vec![0, 2]);
        assert_eq!(a.clusters(), vec![vec![1, 3], vec![0, 2], vec![4]]);
        assert_eq!(a.cluster_of(4), Some(2));
        assert_eq!(a.cluster_of(9), None);
    }

    #[test]
    fn test_completeness() {
        assert!(ClusterAssignment::positional(5, 2).is_complete());
        assert!(ClusterAssignment::singletons(0).is_complete());

        let gap = ClusterAssignment::new(vec![0, 0, 2], 3, 1, true, 0.0);
        assert!(!gap.is_complete());
        assert_eq!(gap.sizes(), vec![2, 0, 1]);

        let stray = ClusterAssignment::new(vec![0, 7], 2, 1, true, 0.0);
        assert!(!stray.is_complete());
        assert_eq!(stray.sizes(), vec![1, 0]);
        assert_eq!(stray.clusters(), vec![vec![0], vec![]]);
    }
}
