//! Stage trait definitions for the pipeline.
//!
//! Each trait represents one processing stage boundary. Implementations are
//! statically dispatched; the defaults are zero-sized wrappers around the
//! crate's own vectorizer, K-Means and selector.

use crate::cluster::{elbow_points, wcss_curve, ClusterAssignment, ElbowPoint, KMeans};
use crate::summarizer::{SentenceSelector, Summary};
use crate::types::{Sentence, SummarizerConfig};
use crate::vectorize::{TfidfOutput, TfidfVectorizer, WeightMatrix};

// ============================================================================
// SentenceVectorizer: sentences → weighted term vectors (stage 1)
// ============================================================================

/// Turns tokenized sentences into one weight row and one score per sentence.
///
/// # Contract
///
/// - The returned matrix has exactly `sentences.len()` rows, each of L2 norm
///   1 or all-zero.
/// - `scores[i]` belongs to `sentences[i]`.
pub trait SentenceVectorizer {
    fn vectorize(&self, sentences: &[Sentence], cfg: &SummarizerConfig) -> TfidfOutput;
}

/// Sublinear TF-IDF weighting, honoring `cfg.max_df`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfidfSentenceVectorizer;

impl SentenceVectorizer for TfidfSentenceVectorizer {
    fn vectorize(&self, sentences: &[Sentence], cfg: &SummarizerConfig) -> TfidfOutput {
        TfidfVectorizer::new()
            .with_max_df(cfg.max_df)
            .fit_transform(sentences)
    }
}

// ============================================================================
// SentenceClusterer: rows → topic groups (stage 2)
// ============================================================================

/// Partitions matrix rows into `k` non-empty groups.
///
/// The pipeline only calls [`cluster`](Self::cluster) with `1 <= k < N`;
/// `k >= N` is short-circuited to one sentence per cluster. The result must
/// label every row with a cluster in `[0, k)` and leave no cluster empty.
pub trait SentenceClusterer {
    fn cluster(&self, matrix: &WeightMatrix, k: usize, cfg: &SummarizerConfig) -> ClusterAssignment;

    /// WCSS for every k in `min_k..=max_k`.
    ///
    /// The default fits each k in turn; implementations may parallelize as
    /// long as the result is the same.
    fn wcss_curve(
        &self,
        matrix: &WeightMatrix,
        min_k: usize,
        max_k: usize,
        cfg: &SummarizerConfig,
    ) -> Vec<ElbowPoint> {
        let fits: Vec<ClusterAssignment> = (min_k..=max_k)
            .map(|k| self.cluster(matrix, k, cfg))
            .collect();
        elbow_points(&fits)
    }
}

/// Seeded k-means++ / Lloyd clustering.
#[derive(Debug, Clone, Copy, Default)]
pub struct KMeansClusterer;

impl KMeansClusterer {
    fn kmeans(k: usize, cfg: &SummarizerConfig) -> KMeans {
        KMeans::new(k)
            .with_max_iterations(cfg.max_iterations)
            .with_tolerance(cfg.tolerance)
            .with_n_init(cfg.n_init)
            .with_seed(cfg.seed)
    }
}

impl SentenceClusterer for KMeansClusterer {
    fn cluster(&self, matrix: &WeightMatrix, k: usize, cfg: &SummarizerConfig) -> ClusterAssignment {
        Self::kmeans(k, cfg).fit(matrix)
    }

    fn wcss_curve(
        &self,
        matrix: &WeightMatrix,
        min_k: usize,
        max_k: usize,
        cfg: &SummarizerConfig,
    ) -> Vec<ElbowPoint> {
        wcss_curve(matrix, min_k, max_k, &Self::kmeans(min_k, cfg))
    }
}

// ============================================================================
// RepresentativeSelector: groups → summary (stage 3)
// ============================================================================

/// Picks the sentences that stand for each cluster.
///
/// # Contract
///
/// - At most one sentence per cluster.
/// - Output is in document order.
pub trait RepresentativeSelector {
    fn select(
        &self,
        sentences: &[Sentence],
        assignment: &ClusterAssignment,
        scores: &[f64],
        cfg: &SummarizerConfig,
    ) -> Summary;
}

/// Highest TF-IDF score per cluster, earliest sentence on ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopScoreSelector;

impl RepresentativeSelector for TopScoreSelector {
    #[inline]
    fn select(
        &self,
        sentences: &[Sentence],
        assignment: &ClusterAssignment,
        scores: &[f64],
        _cfg: &SummarizerConfig,
    ) -> Summary {
        SentenceSelector::new().select(sentences, assignment, scores)
    }
}
