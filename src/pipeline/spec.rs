//! Pipeline specification types.
//!
//! A [`SummarySpec`] is the JSON form of a [`SummarizerConfig`]. It is
//! checked by the [`ValidationEngine`](super::validation::ValidationEngine)
//! before being turned into a runtime config.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "length": { "ratio": 0.3 },
//!   "clustering": { "seed": 42, "max_iterations": 300, "tolerance": 1e-6, "n_init": 10 },
//!   "vectorizer": { "max_df": 0.95 },
//!   "diagnostics": { "elbow": { "min_k": 1, "max_k": 8 } },
//!   "strict": false
//! }
//! ```
//!
//! Every field except `v` is optional; omitted values take the
//! [`SummarizerConfig`] defaults.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::validation::ValidationEngine;
use crate::errors::{Result, SummarizeError};
use crate::types::{ElbowRange, SummarizerConfig, SummaryLength};

/// Spec version understood by this crate
pub const SPEC_VERSION: u32 = 1;

/// Top-level summarization spec (v1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarySpec {
    /// Spec version (currently `1`).
    pub v: u32,

    /// Target summary length.
    #[serde(default)]
    pub length: Option<SummaryLength>,

    #[serde(default)]
    pub clustering: ClusteringSpec,

    #[serde(default)]
    pub vectorizer: VectorizerSpec,

    #[serde(default)]
    pub diagnostics: DiagnosticsSpec,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// K-Means settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusteringSpec {
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub max_iterations: Option<usize>,

    #[serde(default)]
    pub tolerance: Option<f64>,

    #[serde(default)]
    pub n_init: Option<usize>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// TF-IDF settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorizerSpec {
    #[serde(default)]
    pub max_df: Option<f64>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// Informational outputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticsSpec {
    /// Compute the WCSS curve over this range of k.
    #[serde(default)]
    pub elbow: Option<ElbowRange>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl SummarySpec {
    /// Parse a spec from JSON (no validation yet)
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and convert into a runtime config.
    ///
    /// Fails with [`SummarizeError::InvalidSpec`] carrying every
    /// error-severity diagnostic; warnings are dropped.
    pub fn into_config(self) -> Result<SummarizerConfig> {
        let report = ValidationEngine::with_defaults().validate(&self);
        if report.has_errors() {
            return Err(SummarizeError::InvalidSpec(report.errors().cloned().collect()));
        }

        let defaults = SummarizerConfig::default();
        Ok(SummarizerConfig {
            length: self.length.unwrap_or(defaults.length),
            seed: self.clustering.seed.unwrap_or(defaults.seed),
            max_iterations: self
                .clustering
                .max_iterations
                .unwrap_or(defaults.max_iterations),
            tolerance: self.clustering.tolerance.unwrap_or(defaults.tolerance),
            n_init: self.clustering.n_init.unwrap_or(defaults.n_init),
            max_df: self.vectorizer.max_df,
            diagnostics: self.diagnostics.elbow,
        })
    }
}

impl SummarizerConfig {
    /// Parse, validate and convert a JSON spec
    pub fn from_spec_json(json: &str) -> Result<Self> {
        SummarySpec::from_json(json)?.into_config()
    }
}
