//! Pipeline runner: orchestrates stage execution and artifact flow.
//!
//! The [`Pipeline`] struct holds a statically-composed set of pipeline stages.
//! Calling [`Pipeline::run`] validates the configuration, then executes the
//! stages in order, threading artifacts between them and notifying a
//! [`PipelineObserver`] at each boundary.
//!
//! # Static dispatch
//!
//! `Pipeline` is generic over all stage types, so every combination is
//! monomorphized into its own concrete type. The default stages are
//! zero-sized.

use serde::Serialize;

use crate::cluster::{clusters_for_count, clusters_for_ratio, find_elbow, ClusterAssignment, ElbowPoint};
use crate::errors::{Result, SummarizeError};
use crate::pipeline::observer::{
    PipelineObserver, StageClock, StageReportBuilder, STAGE_CLUSTER, STAGE_DIAGNOSTICS,
    STAGE_SELECT, STAGE_VECTORIZE,
};
use crate::pipeline::traits::{
    KMeansClusterer, RepresentativeSelector, SentenceClusterer, SentenceVectorizer,
    TfidfSentenceVectorizer, TopScoreSelector,
};
use crate::summarizer::Summary;
use crate::types::{ElbowRange, Sentence, SummarizerConfig, SummaryLength};
use crate::vectorize::WeightMatrix;

// ---------------------------------------------------------------------------
// Conditional tracing support
// ---------------------------------------------------------------------------

/// Enter a tracing span for a pipeline stage (when the `tracing` feature is
/// enabled). When disabled, this is a no-op and the compiler eliminates it.
macro_rules! trace_stage {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

// ============================================================================
// SummaryReport: final pipeline output
// ============================================================================

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    /// Selected sentences joined by a single space
    pub text: String,
    pub summary: Summary,
    /// Number of clusters the summary was built from
    pub k: usize,
    /// Mean TF-IDF weight per input sentence
    pub scores: Vec<f64>,
    pub assignment: ClusterAssignment,
    /// WCSS curve, when diagnostics or elbow length selection ran
    pub elbow: Option<Vec<ElbowPoint>>,
    pub original_sentence_count: usize,
    pub summary_sentence_count: usize,
    /// `summary / original`, rounded to two decimals
    pub compression_ratio: f64,
}

impl SummaryReport {
    fn new(
        summary: Summary,
        k: usize,
        scores: Vec<f64>,
        assignment: ClusterAssignment,
        elbow: Option<Vec<ElbowPoint>>,
    ) -> Self {
        let original = assignment.len();
        let kept = summary.len();
        Self {
            text: summary.text(),
            summary,
            k,
            scores,
            assignment,
            elbow,
            original_sentence_count: original,
            summary_sentence_count: kept,
            compression_ratio: compression_ratio(kept, original),
        }
    }

    /// Input positions of the selected sentences
    pub fn indices(&self) -> Vec<usize> {
        self.summary.indices()
    }
}

fn compression_ratio(kept: usize, original: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (kept as f64 / original as f64 * 100.0).round() / 100.0
}

// ============================================================================
// Pipeline: statically-composed stage container
// ============================================================================

/// A pipeline composed of concrete stage implementations.
///
/// # Type parameters
///
/// | Param | Trait | Default impl |
/// |-------|-------|--------------|
/// | `V` | [`SentenceVectorizer`] | [`TfidfSentenceVectorizer`] |
/// | `C` | [`SentenceClusterer`] | [`KMeansClusterer`] |
/// | `S` | [`RepresentativeSelector`] | [`TopScoreSelector`] |
#[derive(Debug, Clone)]
pub struct Pipeline<V, C, S> {
    pub vectorizer: V,
    pub clusterer: C,
    pub selector: S,
}

/// The TF-IDF → K-Means → top-score pipeline.
pub type DefaultPipeline = Pipeline<TfidfSentenceVectorizer, KMeansClusterer, TopScoreSelector>;

impl DefaultPipeline {
    pub fn standard() -> Self {
        Pipeline {
            vectorizer: TfidfSentenceVectorizer,
            clusterer: KMeansClusterer,
            selector: TopScoreSelector,
        }
    }
}

impl Default for DefaultPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Pipeline::run: execute stages in order
// ============================================================================

impl<V, C, S> Pipeline<V, C, S>
where
    V: SentenceVectorizer,
    C: SentenceClusterer,
    S: RepresentativeSelector,
{
    /// Summarize `sentences`.
    ///
    /// Order of work:
    /// 1. Validate `cfg` (before the input is looked at)
    /// 2. Reject empty input
    /// 3. Vectorize
    /// 4. WCSS curve, when diagnostics or elbow length selection ask for it
    /// 5. Cluster (skipped when k covers every sentence)
    /// 6. Select representatives
    pub fn run(
        &self,
        sentences: &[Sentence],
        cfg: &SummarizerConfig,
        observer: &mut impl PipelineObserver,
    ) -> Result<SummaryReport> {
        cfg.validate()?;
        if sentences.is_empty() {
            return Err(SummarizeError::EmptyInput);
        }
        let n = sentences.len();

        // Stage 1: Vectorize
        trace_stage!(STAGE_VECTORIZE);
        observer.on_stage_start(STAGE_VECTORIZE);
        let clock = StageClock::start();
        let vectors = self.vectorizer.vectorize(sentences, cfg);
        let report = StageReportBuilder::new(clock.elapsed())
            .rows(vectors.matrix.num_rows())
            .terms(vectors.vocabulary.len())
            .build();
        observer.on_stage_end(STAGE_VECTORIZE, &report);
        observer.on_vectors(&vectors);

        // Stage 2: Diagnostics
        let elbow_mode = match cfg.length {
            SummaryLength::Elbow(range) => Some(range),
            _ => None,
        };
        let mut elbow = None;
        let mut elbow_k = None;
        if cfg.diagnostics.is_some() || elbow_mode.is_some() {
            trace_stage!(STAGE_DIAGNOSTICS);
            observer.on_stage_start(STAGE_DIAGNOSTICS);
            let clock = StageClock::start();

            let diagnostics = cfg
                .diagnostics
                .map(|range| self.curve(&vectors.matrix, range, cfg));
            if let Some(range) = elbow_mode {
                let curve = match (&diagnostics, cfg.diagnostics) {
                    (Some(points), Some(d)) if d == range => points.clone(),
                    _ => self.curve(&vectors.matrix, range, cfg),
                };
                elbow_k = Some(find_elbow(&curve).unwrap_or_else(|| clusters_for_count(n, range.min_k)));
                elbow = diagnostics.or(Some(curve));
            } else {
                elbow = diagnostics;
            }

            let points = elbow.as_ref().map_or(0, Vec::len);
            let report = StageReportBuilder::new(clock.elapsed())
                .rows(n)
                .clusters(points)
                .build();
            observer.on_stage_end(STAGE_DIAGNOSTICS, &report);
            if let Some(points) = &elbow {
                observer.on_elbow(points);
            }
        }

        let k = match cfg.length {
            SummaryLength::Ratio(ratio) => clusters_for_ratio(n, ratio),
            SummaryLength::Sentences(count) => clusters_for_count(n, count),
            SummaryLength::Elbow(range) => {
                clusters_for_count(n, elbow_k.unwrap_or(range.min_k))
            }
        };

        // Stage 3: Cluster
        trace_stage!(STAGE_CLUSTER);
        observer.on_stage_start(STAGE_CLUSTER);
        let clock = StageClock::start();
        let assignment = if k >= n {
            ClusterAssignment::singletons(n)
        } else {
            self.clusterer.cluster(&vectors.matrix, k, cfg)
        };
        debug_assert!(
            assignment.len() == n && assignment.is_complete(),
            "clusterer returned an incomplete assignment: k = {}, sizes = {:?}",
            assignment.k(),
            assignment.sizes()
        );
        let report = StageReportBuilder::new(clock.elapsed())
            .rows(n)
            .clusters(assignment.k())
            .iterations(assignment.iterations())
            .converged(assignment.converged())
            .wcss(assignment.wcss())
            .build();
        observer.on_stage_end(STAGE_CLUSTER, &report);
        observer.on_assignment(&assignment);

        // Stage 4: Select
        trace_stage!(STAGE_SELECT);
        observer.on_stage_start(STAGE_SELECT);
        let clock = StageClock::start();
        let summary = self
            .selector
            .select(sentences, &assignment, &vectors.scores, cfg);
        let report = StageReportBuilder::new(clock.elapsed())
            .rows(summary.len())
            .build();
        observer.on_stage_end(STAGE_SELECT, &report);
        observer.on_summary(&summary);

        Ok(SummaryReport::new(
            summary,
            assignment.k(),
            vectors.scores,
            assignment,
            elbow,
        ))
    }

    /// WCSS curve over `range` clamped to the sentence count
    fn curve(&self, matrix: &WeightMatrix, range: ElbowRange, cfg: &SummarizerConfig) -> Vec<ElbowPoint> {
        match range.clamp_to(matrix.num_rows()) {
            Some((lo, hi)) => self.clusterer.wcss_curve(matrix, lo, hi, cfg),
            None => Vec::new(),
        }
    }
}

// ============================================================================
// PipelineBuilder: fluent construction with custom stages
// ============================================================================

/// Fluent builder for constructing a [`Pipeline`] with custom stages.
///
/// Starts from the default stages and allows overriding each one.
///
/// ```
/// # use rapid_summarizer::pipeline::runner::PipelineBuilder;
/// # use rapid_summarizer::pipeline::traits::*;
/// let pipeline = PipelineBuilder::new()
///     .clusterer(KMeansClusterer)
///     .build();
/// ```
pub struct PipelineBuilder<
    V = TfidfSentenceVectorizer,
    C = KMeansClusterer,
    S = TopScoreSelector,
> {
    vectorizer: V,
    clusterer: C,
    selector: S,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        PipelineBuilder {
            vectorizer: TfidfSentenceVectorizer,
            clusterer: KMeansClusterer,
            selector: TopScoreSelector,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C, S> PipelineBuilder<V, C, S> {
    /// Override the vectorizer stage.
    pub fn vectorizer<T: SentenceVectorizer>(self, v: T) -> PipelineBuilder<T, C, S> {
        PipelineBuilder {
            vectorizer: v,
            clusterer: self.clusterer,
            selector: self.selector,
        }
    }

    /// Override the clusterer stage.
    pub fn clusterer<T: SentenceClusterer>(self, c: T) -> PipelineBuilder<V, T, S> {
        PipelineBuilder {
            vectorizer: self.vectorizer,
            clusterer: c,
            selector: self.selector,
        }
    }

    /// Override the selector stage.
    pub fn selector<T: RepresentativeSelector>(self, s: T) -> PipelineBuilder<V, C, T> {
        PipelineBuilder {
            vectorizer: self.vectorizer,
            clusterer: self.clusterer,
            selector: s,
        }
    }

    pub fn build(self) -> Pipeline<V, C, S> {
        Pipeline {
            vectorizer: self.vectorizer,
            clusterer: self.clusterer,
            selector: self.selector,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::observer::{NoopObserver, StageTimingObserver};
    use crate::vectorize::TfidfOutput;

    fn sentence(text: &str) -> Sentence {
        let tokens: Vec<String> = text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphabetic())
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect();
        Sentence::new(text, tokens)
    }

    fn weather_and_finance() -> Vec<Sentence> {
        [
            "Rain storms battered the coast.",
            "Heavy rain storms flooded roads.",
            "Forecast rain storms tomorrow.",
            "Rain storms with thunder overnight.",
            "Cold rain storms cleared later.",
            "Stock markets rallied strongly.",
            "Investors bought stock markets shares.",
            "Stock markets fell at close.",
            "Bond yields diverged from stock markets.",
            "Stock markets reached record highs.",
        ]
        .iter()
        .map(|s| sentence(s))
        .collect()
    }

    fn run(sentences: &[Sentence], cfg: &SummarizerConfig) -> Result<SummaryReport> {
        DefaultPipeline::standard().run(sentences, cfg, &mut NoopObserver)
    }

    #[test]
    fn test_identical_sentences_pick_first() {
        let docs = vec![sentence("Same words here."); 3];
        let cfg = SummarizerConfig::default().with_sentences(1);

        let report = run(&docs, &cfg).unwrap();
        assert_eq!(report.k, 1);
        assert_eq!(report.indices(), vec![0]);
    }

    #[test]
    fn test_two_topics_one_sentence_each() {
        let docs = weather_and_finance();
        let cfg = SummarizerConfig::default().with_ratio(0.2);

        let report = run(&docs, &cfg).unwrap();
        assert_eq!(report.k, 2);
        let idx = report.indices();
        assert_eq!(idx.len(), 2);
        assert!(idx[0] < 5, "first pick should be weather: {idx:?}");
        assert!(idx[1] >= 5, "second pick should be finance: {idx:?}");
    }

    #[test]
    fn test_single_sentence_verbatim() {
        let docs = vec![sentence("Only one sentence is here.")];
        let report = run(&docs, &SummarizerConfig::default()).unwrap();

        assert_eq!(report.text, "Only one sentence is here.");
        assert_eq!(report.k, 1);
        assert_eq!(report.assignment.iterations(), 0);
        assert_eq!(report.compression_ratio, 1.0);
    }

    #[test]
    fn test_empty_input() {
        let err = run(&[], &SummarizerConfig::default()).unwrap_err();
        assert!(matches!(err, SummarizeError::EmptyInput));
    }

    #[test]
    fn test_invalid_ratio_checked_before_input() {
        let cfg = SummarizerConfig::default().with_ratio(1.5);

        let err = run(&[], &cfg).unwrap_err();
        assert!(matches!(err, SummarizeError::InvalidConfiguration(_)));

        let err = run(&weather_and_finance(), &cfg).unwrap_err();
        assert!(matches!(err, SummarizeError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_summary_length_is_min_of_n_and_k() {
        let docs = weather_and_finance();
        for n in 1..=docs.len() {
            for count in [1, 2, 3, 7, 20] {
                let cfg = SummarizerConfig::default().with_sentences(count);
                let report = run(&docs[..n], &cfg).unwrap();
                assert_eq!(report.summary.len(), n.min(count), "n={n} count={count}");
            }
        }
    }

    #[test]
    fn test_indices_strictly_increasing() {
        let docs = weather_and_finance();
        for ratio in [0.1, 0.3, 0.5, 0.8, 1.0] {
            let report = run(&docs, &SummarizerConfig::default().with_ratio(ratio)).unwrap();
            let idx = report.indices();
            assert!(idx.windows(2).all(|w| w[0] < w[1]), "ratio {ratio}: {idx:?}");
        }
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let docs = weather_and_finance();
        let cfg = SummarizerConfig::default().with_ratio(0.3).with_seed(11);

        let a = run(&docs, &cfg).unwrap();
        let b = run(&docs, &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_assignment_covers_every_sentence() {
        let docs = weather_and_finance();
        let report = run(&docs, &SummarizerConfig::default().with_sentences(4)).unwrap();

        assert_eq!(report.assignment.len(), docs.len());
        assert!(report.assignment.sizes().iter().all(|&s| s > 0));
    }

    #[test]
    fn test_all_stopword_document_takes_leading_sentences() {
        let docs: Vec<Sentence> = (0..4)
            .map(|i| Sentence::new(format!("The {i}."), Vec::<String>::new()))
            .collect();
        let report = run(&docs, &SummarizerConfig::default().with_sentences(2)).unwrap();

        assert_eq!(report.indices(), vec![0, 1]);
        assert!(report.scores.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_compression_ratio_rounding() {
        assert_eq!(compression_ratio(1, 3), 0.33);
        assert_eq!(compression_ratio(2, 3), 0.67);
        assert_eq!(compression_ratio(3, 10), 0.3);
        assert_eq!(compression_ratio(0, 0), 0.0);
    }

    #[test]
    fn test_report_counts() {
        let docs = weather_and_finance();
        let report = run(&docs, &SummarizerConfig::default().with_ratio(0.2)).unwrap();

        assert_eq!(report.original_sentence_count, 10);
        assert_eq!(report.summary_sentence_count, 2);
        assert_eq!(report.compression_ratio, 0.2);
        assert_eq!(report.scores.len(), 10);
        assert!(report.elbow.is_none());
    }

    #[test]
    fn test_diagnostics_do_not_change_selection() {
        let docs = weather_and_finance();
        let plain = SummarizerConfig::default().with_ratio(0.3);
        let with_diag = plain.clone().with_diagnostics(1, 6);

        let a = run(&docs, &plain).unwrap();
        let b = run(&docs, &with_diag).unwrap();

        assert_eq!(a.indices(), b.indices());
        let curve = b.elbow.unwrap();
        assert_eq!(curve.iter().map(|p| p.k).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_elbow_length_mode() {
        let docs = weather_and_finance();
        let cfg = SummarizerConfig::default().with_elbow(1, 6);

        let report = run(&docs, &cfg).unwrap();
        assert!((1..=6).contains(&report.k));
        assert_eq!(report.summary.len(), report.k);
        assert_eq!(report.elbow.as_ref().map(Vec::len), Some(6));
    }

    #[test]
    fn test_elbow_range_beyond_input_is_clamped() {
        let docs = weather_and_finance();
        let cfg = SummarizerConfig::default().with_elbow(3, 50);

        let report = run(&docs[..4], &cfg).unwrap();
        assert!((3..=4).contains(&report.k));
        assert_eq!(report.elbow.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_timing_observer_sees_every_stage() {
        let docs = weather_and_finance();
        let mut obs = StageTimingObserver::new();
        DefaultPipeline::standard()
            .run(&docs, &SummarizerConfig::default(), &mut obs)
            .unwrap();

        let names: Vec<&str> = obs.reports().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec![STAGE_VECTORIZE, STAGE_CLUSTER, STAGE_SELECT]);

        let vectorize = obs.report(STAGE_VECTORIZE).unwrap();
        assert_eq!(vectorize.rows(), Some(10));
        assert!(vectorize.terms().is_some());

        let cluster = obs.report(STAGE_CLUSTER).unwrap();
        assert_eq!(cluster.clusters(), Some(3));
        assert!(cluster.iterations().is_some());
        assert!(cluster.converged().is_some());
        assert!(cluster.wcss().is_some());
    }

    #[test]
    fn test_diagnostics_stage_reported() {
        let docs = weather_and_finance();
        let mut obs = StageTimingObserver::new();
        let cfg = SummarizerConfig::default().with_diagnostics(1, 3);
        DefaultPipeline::standard().run(&docs, &cfg, &mut obs).unwrap();

        let names: Vec<&str> = obs.reports().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![STAGE_VECTORIZE, STAGE_DIAGNOSTICS, STAGE_CLUSTER, STAGE_SELECT]
        );
    }

    /// Observer that records which artifact hooks fired.
    #[derive(Default)]
    struct ArtifactObserver {
        saw_vectors: bool,
        saw_elbow: bool,
        saw_assignment: bool,
        saw_summary: bool,
    }

    impl PipelineObserver for ArtifactObserver {
        fn on_vectors(&mut self, _vectors: &TfidfOutput) {
            self.saw_vectors = true;
        }
        fn on_elbow(&mut self, _curve: &[ElbowPoint]) {
            self.saw_elbow = true;
        }
        fn on_assignment(&mut self, _assignment: &ClusterAssignment) {
            self.saw_assignment = true;
        }
        fn on_summary(&mut self, _summary: &Summary) {
            self.saw_summary = true;
        }
    }

    #[test]
    fn test_pipeline_calls_all_artifact_observers() {
        let docs = weather_and_finance();
        let cfg = SummarizerConfig::default().with_diagnostics(1, 2);
        let mut obs = ArtifactObserver::default();

        DefaultPipeline::standard().run(&docs, &cfg, &mut obs).unwrap();

        assert!(obs.saw_vectors, "on_vectors not called");
        assert!(obs.saw_elbow, "on_elbow not called");
        assert!(obs.saw_assignment, "on_assignment not called");
        assert!(obs.saw_summary, "on_summary not called");
    }

    #[test]
    fn test_builder_with_custom_clusterer() {
        struct Positional;

        impl SentenceClusterer for Positional {
            fn cluster(&self, matrix: &WeightMatrix, k: usize, _cfg: &SummarizerConfig) -> ClusterAssignment {
                ClusterAssignment::positional(matrix.num_rows(), k)
            }
        }

        let pipeline = PipelineBuilder::new().clusterer(Positional).build();
        let report = pipeline
            .run(
                &weather_and_finance(),
                &SummarizerConfig::default().with_sentences(2),
                &mut NoopObserver,
            )
            .unwrap();

        // cluster 0 holds only sentence 0
        assert_eq!(report.indices()[0], 0);
        assert_eq!(report.k, 2);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "incomplete assignment")]
    fn test_incomplete_custom_assignment_is_caught() {
        struct LeavesGap;

        impl SentenceClusterer for LeavesGap {
            fn cluster(&self, matrix: &WeightMatrix, k: usize, _cfg: &SummarizerConfig) -> ClusterAssignment {
                ClusterAssignment::new(vec![0; matrix.num_rows()], k, 1, true, 0.0)
            }
        }

        let _ = PipelineBuilder::new().clusterer(LeavesGap).build().run(
            &weather_and_finance(),
            &SummarizerConfig::default().with_sentences(3),
            &mut NoopObserver,
        );
    }

    #[test]
    fn test_default_builder_matches_standard() {
        let docs = weather_and_finance();
        let cfg = SummarizerConfig::default();

        let a = PipelineBuilder::new().build().run(&docs, &cfg, &mut NoopObserver).unwrap();
        let b = run(&docs, &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_report_serializes() {
        let report = run(&weather_and_finance(), &SummarizerConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["original_sentence_count"], 10);
        assert_eq!(json["k"], 3);
        assert!(json["text"].is_string());
        assert!(json["summary"]["sentences"].is_array());
    }
}
