//! K-Means over sparse sentence vectors
//!
//! Lloyd's iteration with seeded k-means++ initialization and several
//! seeded restarts. Centroids are dense; rows stay sparse, so a distance
//! costs O(nnz(row)) plus the precomputed centroid norm.
//!
//! Tie-breaking is fixed: a row equidistant from several centroids joins
//! the lowest cluster id, and a restart only replaces the best result when
//! its WCSS is strictly lower.

use super::{clusters_for_count, ClusterAssignment};
use crate::vectorize::{SparseVector, WeightMatrix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A dense cluster center with its cached squared norm
#[derive(Debug, Clone, PartialEq)]
struct Centroid {
    values: Vec<f64>,
    norm_sq: f64,
}

impl Centroid {
    fn from_dense(values: Vec<f64>) -> Self {
        let norm_sq = values.iter().map(|v| v * v).sum();
        Self { values, norm_sq }
    }

    fn from_row(row: &SparseVector, dim: usize) -> Self {
        Self::from_dense(row.to_dense(dim))
    }

    fn distance_sq(&self, row: &SparseVector) -> f64 {
        row.squared_distance_to(&self.values, self.norm_sq)
    }
}

/// K-Means clusterer
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Number of clusters
    pub k: usize,
    /// Iteration cap per restart
    pub max_iterations: usize,
    /// Stop when the WCSS shift falls below this
    pub tolerance: f64,
    /// Number of seeded restarts
    pub n_init: usize,
    /// Seed for the initialization RNG
    pub seed: u64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            k: 2,
            max_iterations: 300,
            tolerance: 1e-6,
            n_init: 10,
            seed: 42,
        }
    }
}

impl KMeans {
    /// Create a clusterer for `k` clusters with default settings
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Cluster the rows of `matrix`.
    ///
    /// `k` is clamped to `[1, N]`. With `k == N` every row is its own
    /// cluster and no iteration runs. An all-zero matrix falls back to a
    /// positional assignment.
    pub fn fit(&self, matrix: &WeightMatrix) -> ClusterAssignment {
        let n = matrix.num_rows();
        if n == 0 {
            return ClusterAssignment::new(Vec::new(), 0, 0, true, 0.0);
        }

        let k = clusters_for_count(n, self.k);
        if k >= n {
            return ClusterAssignment::singletons(n);
        }
        if matrix.is_zero() {
            return ClusterAssignment::positional(n, k);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<ClusterAssignment> = None;

        for _run in 0..self.n_init.max(1) {
            let centroids = self.init_plus_plus(matrix, k, &mut rng);
            let result = self.lloyd(matrix, centroids, k);

            #[cfg(feature = "tracing")]
            tracing::debug!(
                run = _run,
                k,
                iterations = result.iterations(),
                converged = result.converged(),
                wcss = result.wcss(),
                "k-means restart finished"
            );

            if best.as_ref().map_or(true, |b| result.wcss() < b.wcss()) {
                best = Some(result);
            }
        }

        best.unwrap_or_else(|| ClusterAssignment::positional(n, k))
    }

    /// k-means++ seeding: first center uniform, then D²-weighted draws
    fn init_plus_plus(&self, matrix: &WeightMatrix, k: usize, rng: &mut StdRng) -> Vec<Centroid> {
        let n = matrix.num_rows();
        let dim = matrix.num_terms();

        let first = rng.gen_range(0..n);
        let mut chosen = vec![first];
        let seed_centroid = Centroid::from_row(matrix.row(first), dim);
        let mut min_dist: Vec<f64> = matrix
            .rows()
            .iter()
            .map(|row| seed_centroid.distance_sq(row))
            .collect();

        while chosen.len() < k {
            let total: f64 = min_dist.iter().sum();
            let next = if total > 0.0 {
                let target = rng.gen::<f64>() * total;
                let mut acc = 0.0;
                let mut pick = None;
                for (i, &d) in min_dist.iter().enumerate() {
                    if d <= 0.0 {
                        continue;
                    }
                    acc += d;
                    if acc >= target {
                        pick = Some(i);
                        break;
                    }
                }
                // rounding can leave `acc` a hair under `target`
                pick.or_else(|| min_dist.iter().rposition(|&d| d > 0.0))
                    .unwrap_or(0)
            } else {
                // every remaining row coincides with a chosen center
                (0..n).find(|i| !chosen.contains(i)).unwrap_or(0)
            };

            chosen.push(next);
            let centroid = Centroid::from_row(matrix.row(next), dim);
            for (d, row) in min_dist.iter_mut().zip(matrix.rows()) {
                *d = d.min(centroid.distance_sq(row));
            }
        }

        chosen
            .into_iter()
            .map(|i| Centroid::from_row(matrix.row(i), dim))
            .collect()
    }

    /// One Lloyd run from the given starting centers.
    ///
    /// At least one assignment step always runs, so the labels are never
    /// left at their placeholder value.
    fn lloyd(&self, matrix: &WeightMatrix, mut centroids: Vec<Centroid>, k: usize) -> ClusterAssignment {
        let n = matrix.num_rows();
        let max_iterations = self.max_iterations.max(1);
        let mut labels = vec![usize::MAX; n];
        let mut prev_wcss = f64::INFINITY;
        let mut wcss = 0.0;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < max_iterations {
            iterations += 1;

            let mut next: Vec<usize> = matrix
                .rows()
                .iter()
                .map(|row| nearest(row, &centroids))
                .collect();

            let (mut new_centroids, mut counts) = mean_centroids(matrix, &next, k);
            reseed_empty(matrix, &mut next, &mut new_centroids, &mut counts);
            centroids = new_centroids;

            wcss = compute_wcss(matrix, &next, &centroids);
            let unchanged = next == labels;
            labels = next;

            if unchanged || (prev_wcss - wcss).abs() < self.tolerance {
                converged = true;
                break;
            }
            prev_wcss = wcss;
        }

        ClusterAssignment::new(labels, k, iterations, converged, wcss)
    }
}

/// Index of the closest centroid; exact ties go to the lowest id
fn nearest(row: &SparseVector, centroids: &[Centroid]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let d = centroid.distance_sq(row);
        if d < best_dist {
            best_dist = d;
            best = c;
        }
    }
    best
}

/// Member means per cluster; empty clusters get a zero center
fn mean_centroids(matrix: &WeightMatrix, labels: &[usize], k: usize) -> (Vec<Centroid>, Vec<usize>) {
    let dim = matrix.num_terms();
    let mut sums = vec![vec![0.0; dim]; k];
    let mut counts = vec![0usize; k];

    for (row, &c) in matrix.rows().iter().zip(labels) {
        row.add_to(&mut sums[c]);
        counts[c] += 1;
    }

    let centroids = sums
        .into_iter()
        .zip(&counts)
        .map(|(mut sum, &count)| {
            if count > 0 {
                for v in &mut sum {
                    *v /= count as f64;
                }
            }
            Centroid::from_dense(sum)
        })
        .collect();

    (centroids, counts)
}

fn cluster_mean(matrix: &WeightMatrix, labels: &[usize], c: usize) -> Centroid {
    let mut sum = vec![0.0; matrix.num_terms()];
    let mut count = 0usize;
    for (row, _) in matrix.rows().iter().zip(labels).filter(|(_, &l)| l == c) {
        row.add_to(&mut sum);
        count += 1;
    }
    if count > 0 {
        for v in &mut sum {
            *v /= count as f64;
        }
    }
    Centroid::from_dense(sum)
}

/// Give every empty cluster the row farthest from its current centroid.
///
/// Donors come only from clusters with more than one member, so no new
/// empty cluster is created. With `k <= N` a donor always exists.
fn reseed_empty(
    matrix: &WeightMatrix,
    labels: &mut [usize],
    centroids: &mut [Centroid],
    counts: &mut [usize],
) {
    let dim = matrix.num_terms();

    for c in 0..centroids.len() {
        if counts[c] > 0 {
            continue;
        }

        let mut donor: Option<(usize, f64)> = None;
        for (i, &l) in labels.iter().enumerate() {
            if counts[l] < 2 {
                continue;
            }
            let d = centroids[l].distance_sq(matrix.row(i));
            if donor.map_or(true, |(_, best)| d > best) {
                donor = Some((i, d));
            }
        }

        let Some((row, _)) = donor else {
            break;
        };

        let old = labels[row];
        labels[row] = c;
        counts[old] -= 1;
        counts[c] = 1;
        centroids[c] = Centroid::from_row(matrix.row(row), dim);
        centroids[old] = cluster_mean(matrix, labels, old);
    }
}

fn compute_wcss(matrix: &WeightMatrix, labels: &[usize], centroids: &[Centroid]) -> f64 {
    matrix
        .rows()
        .iter()
        .zip(labels)
        .map(|(row, &c)| centroids[c].distance_sq(row))
        .sum()
}
