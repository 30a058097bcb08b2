//! Core types shared across the pipeline
//!
//! Holds the input [`Sentence`] type and the runtime [`SummarizerConfig`].

use crate::errors::{Result, SummarizeError};
use serde::{Deserialize, Serialize};

/// A sentence as handed over by preprocessing.
///
/// The sentence is identified by its position in the input slice; `text`
/// is the original surface form and `tokens` the cleaned terms (lowercase,
/// stopwords removed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    pub tokens: Vec<String>,
}

impl Sentence {
    /// Create a sentence from its surface text and cleaned tokens
    pub fn new<S, T>(text: impl Into<String>, tokens: T) -> Self
    where
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// True when no term survived cleaning
    pub fn has_no_terms(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Inclusive range of cluster counts scanned by the elbow diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElbowRange {
    pub min_k: usize,
    pub max_k: usize,
}

impl ElbowRange {
    pub fn new(min_k: usize, max_k: usize) -> Self {
        Self { min_k, max_k }
    }

    /// Clamp the range to `[1, n]`. Returns `None` when nothing is left.
    pub fn clamp_to(&self, n: usize) -> Option<(usize, usize)> {
        let lo = self.min_k.max(1);
        let hi = self.max_k.min(n);
        (n > 0 && lo <= hi).then_some((lo, hi))
    }

    pub(crate) fn check(&self) -> std::result::Result<(), String> {
        if self.min_k == 0 {
            return Err("elbow min_k must be at least 1".to_string());
        }
        if self.min_k > self.max_k {
            return Err(format!(
                "elbow min_k ({}) must not exceed max_k ({})",
                self.min_k, self.max_k
            ));
        }
        Ok(())
    }
}

/// How many sentences the summary should keep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLength {
    /// Fraction of the input sentence count, in (0, 1]
    Ratio(f64),
    /// Explicit sentence count
    Sentences(usize),
    /// Pick k at the knee of the WCSS curve over the given range
    Elbow(ElbowRange),
}

impl Default for SummaryLength {
    fn default() -> Self {
        SummaryLength::Ratio(0.3)
    }
}

impl SummaryLength {
    pub(crate) fn check(&self) -> std::result::Result<(), String> {
        match *self {
            SummaryLength::Ratio(r) => {
                if !r.is_finite() || r <= 0.0 || r > 1.0 {
                    Err(format!("ratio must be in (0, 1], got {r}"))
                } else {
                    Ok(())
                }
            }
            SummaryLength::Sentences(0) => {
                Err("target sentence count must be greater than 0".to_string())
            }
            SummaryLength::Sentences(_) => Ok(()),
            SummaryLength::Elbow(range) => range.check(),
        }
    }
}

/// Runtime configuration for a summarization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// Target summary length
    pub length: SummaryLength,
    /// Seed for centroid initialization
    pub seed: u64,
    /// Lloyd iteration cap per restart
    pub max_iterations: usize,
    /// Convergence threshold on the WCSS shift between iterations
    pub tolerance: f64,
    /// Number of seeded K-Means restarts; the lowest WCSS wins
    pub n_init: usize,
    /// Drop terms present in more than this fraction of sentences
    pub max_df: Option<f64>,
    /// Compute the WCSS curve for display; never alters the assignment
    pub diagnostics: Option<ElbowRange>,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            length: SummaryLength::default(),
            seed: 42,
            max_iterations: 300,
            tolerance: 1e-6,
            n_init: 10,
            max_df: None,
            diagnostics: None,
        }
    }
}

impl SummarizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep roughly `ratio` of the input sentences
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.length = SummaryLength::Ratio(ratio);
        self
    }

    /// Keep exactly `n` sentences (or all of them when the input is shorter)
    pub fn with_sentences(mut self, n: usize) -> Self {
        self.length = SummaryLength::Sentences(n);
        self
    }

    /// Choose k at the elbow of the WCSS curve
    pub fn with_elbow(mut self, min_k: usize, max_k: usize) -> Self {
        self.length = SummaryLength::Elbow(ElbowRange::new(min_k, max_k));
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
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

    pub fn with_max_df(mut self, max_df: f64) -> Self {
        self.max_df = Some(max_df);
        self
    }

    /// Request the elbow diagnostic for `min_k..=max_k`
    pub fn with_diagnostics(mut self, min_k: usize, max_k: usize) -> Self {
        self.diagnostics = Some(ElbowRange::new(min_k, max_k));
        self
    }

    /// Reject out-of-range values before any computation starts
    pub fn validate(&self) -> Result<()> {
        self.length.check().map_err(SummarizeError::config)?;
        if self.max_iterations == 0 {
            return Err(SummarizeError::config("max_iterations must be greater than 0"));
        }
        if self.n_init == 0 {
            return Err(SummarizeError::config("n_init must be greater than 0"));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SummarizeError::config(format!(
                "tolerance must be a finite non-negative number, got {}",
                self.tolerance
            )));
        }
        if let Some(max_df) = self.max_df {
            if !max_df.is_finite() || max_df <= 0.0 || max_df > 1.0 {
                return Err(SummarizeError::config(format!(
                    "max_df must be in (0, 1], got {max_df}"
                )));
            }
        }
        if let Some(range) = &self.diagnostics {
            range.check().map_err(SummarizeError::config)?;
        }
        Ok(())
    }
}
