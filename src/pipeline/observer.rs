//! Pipeline observer: hooks for logging, profiling, and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic. Every hook has an empty default body, so an observer only
//! overrides what it cares about and [`NoopObserver`] compiles away.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::cluster::{ClusterAssignment, ElbowPoint};
use crate::summarizer::Summary;
use crate::vectorize::TfidfOutput;

// ============================================================================
// Stage names
// ============================================================================

pub const STAGE_VECTORIZE: &str = "vectorize";
pub const STAGE_DIAGNOSTICS: &str = "diagnostics";
pub const STAGE_CLUSTER: &str = "cluster";
pub const STAGE_SELECT: &str = "select";

// ============================================================================
// StageClock / StageReport
// ============================================================================

/// Wall-clock timer for a single stage.
#[derive(Debug, Clone, Copy)]
pub struct StageClock {
    started: Instant,
}

impl StageClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// What a stage did: how long it took plus whichever metrics apply to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageReport {
    duration: Duration,
    rows: Option<usize>,
    terms: Option<usize>,
    clusters: Option<usize>,
    iterations: Option<usize>,
    converged: Option<bool>,
    wcss: Option<f64>,
}

impl StageReport {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Sentences (matrix rows) processed
    pub fn rows(&self) -> Option<usize> {
        self.rows
    }

    /// Vocabulary size
    pub fn terms(&self) -> Option<usize> {
        self.terms
    }

    pub fn clusters(&self) -> Option<usize> {
        self.clusters
    }

    pub fn iterations(&self) -> Option<usize> {
        self.iterations
    }

    pub fn converged(&self) -> Option<bool> {
        self.converged
    }

    pub fn wcss(&self) -> Option<f64> {
        self.wcss
    }
}

/// Fluent construction of a [`StageReport`].
#[derive(Debug, Clone)]
pub struct StageReportBuilder {
    report: StageReport,
}

impl StageReportBuilder {
    pub fn new(duration: Duration) -> Self {
        Self {
            report: StageReport::new(duration),
        }
    }

    pub fn rows(mut self, rows: usize) -> Self {
        self.report.rows = Some(rows);
        self
    }

    pub fn terms(mut self, terms: usize) -> Self {
        self.report.terms = Some(terms);
        self
    }

    pub fn clusters(mut self, clusters: usize) -> Self {
        self.report.clusters = Some(clusters);
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.report.iterations = Some(iterations);
        self
    }

    pub fn converged(mut self, converged: bool) -> Self {
        self.report.converged = Some(converged);
        self
    }

    pub fn wcss(mut self, wcss: f64) -> Self {
        self.report.wcss = Some(wcss);
        self
    }

    pub fn build(self) -> StageReport {
        self.report
    }
}

// ============================================================================
// PipelineObserver
// ============================================================================

/// Callbacks fired by [`Pipeline::run`](super::runner::Pipeline::run).
///
/// Artifact hooks fire right after the stage that produced the artifact has
/// reported its end.
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    fn on_vectors(&mut self, _vectors: &TfidfOutput) {}

    fn on_elbow(&mut self, _curve: &[ElbowPoint]) {}

    fn on_assignment(&mut self, _assignment: &ClusterAssignment) {}

    fn on_summary(&mut self, _summary: &Summary) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Collects one [`StageReport`] per finished stage, in execution order.
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    /// Report of the first run of `stage`, if it ran
    pub fn report(&self, stage: &str) -> Option<&StageReport> {
        self.reports
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, r)| r)
    }

    pub fn total_duration(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.duration()).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, report.clone()));
    }
}

/// Emits a `tracing` event for every finished stage.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl PipelineObserver for TracingObserver {
    fn on_stage_start(&mut self, stage: &'static str) {
        tracing::trace!(stage, "stage started");
    }

    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        tracing::debug!(
            stage,
            duration_us = report.duration().as_micros() as u64,
            rows = ?report.rows(),
            terms = ?report.terms(),
            clusters = ?report.clusters(),
            iterations = ?report.iterations(),
            converged = ?report.converged(),
            wcss = ?report.wcss(),
            "stage finished"
        );
    }

    fn on_summary(&mut self, summary: &Summary) {
        tracing::info!(sentences = summary.len(), "summary ready");
    }
}
