//! Validation engine for summarization specs.
//!
//! The engine runs all registered [`ValidationRule`]s against a
//! [`SummarySpec`](super::spec::SummarySpec) and collects every diagnostic
//! into a [`ValidationReport`]. It never stops at the first error, so users
//! see all problems at once.
//!
//! ```rust,ignore
//! use rapid_summarizer::pipeline::validation::ValidationEngine;
//!
//! let report = ValidationEngine::with_defaults().validate(&spec);
//! for err in report.errors() {
//!     eprintln!("{err}");
//! }
//! ```

use std::collections::HashMap;

use serde::Serialize;

use super::error_code::ErrorCode;
use super::errors::PipelineSpecError;
use super::spec::{SummarySpec, SPEC_VERSION};
use crate::types::{ElbowRange, SummaryLength};

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: PipelineSpecError,
}

impl ValidationDiagnostic {
    pub fn error(err: PipelineSpecError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: PipelineSpecError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &PipelineSpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &PipelineSpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.error)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// No errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A stateless check over a [`SummarySpec`].
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier (e.g. `"length"`).
    fn name(&self) -> &str;

    fn validate(&self, spec: &SummarySpec) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s and collects their diagnostics.
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Engine pre-loaded with the default rule set.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(VersionRule));
        engine.add_rule(Box::new(LengthRule));
        engine.add_rule(Box::new(ClusteringLimitsRule));
        engine.add_rule(Box::new(VectorizerRule));
        engine.add_rule(Box::new(DiagnosticsRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn validate(&self, spec: &SummarySpec) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(spec));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

fn invalid(path: impl Into<String>, message: impl Into<String>) -> PipelineSpecError {
    PipelineSpecError::new(ErrorCode::InvalidValue, path, message)
}

fn elbow_range_diagnostics(path: &str, range: &ElbowRange) -> Vec<ValidationDiagnostic> {
    let Err(message) = range.check() else {
        return vec![];
    };
    let err = if range.min_k == 0 {
        PipelineSpecError::new(ErrorCode::InvalidValue, format!("{path}/min_k"), message)
            .with_hint("min_k must be at least 1")
    } else {
        PipelineSpecError::new(ErrorCode::InvalidRange, path.to_string(), message)
            .with_hint("Swap min_k and max_k")
    };
    vec![ValidationDiagnostic::error(err)]
}

// ─── 1. version ─────────────────────────────────────────────────────────────

struct VersionRule;

impl ValidationRule for VersionRule {
    fn name(&self) -> &str {
        "version"
    }

    fn validate(&self, spec: &SummarySpec) -> Vec<ValidationDiagnostic> {
        if spec.v == SPEC_VERSION {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            PipelineSpecError::new(
                ErrorCode::UnsupportedVersion,
                "/v",
                format!("unsupported spec version {}", spec.v),
            )
            .with_hint(format!("Set \"v\": {SPEC_VERSION}")),
        )]
    }
}

// ─── 2. length ──────────────────────────────────────────────────────────────

struct LengthRule;

impl ValidationRule for LengthRule {
    fn name(&self) -> &str {
        "length"
    }

    fn validate(&self, spec: &SummarySpec) -> Vec<ValidationDiagnostic> {
        let Some(length) = spec.length else {
            return vec![];
        };
        match length {
            SummaryLength::Elbow(range) => elbow_range_diagnostics("/length/elbow", &range),
            SummaryLength::Ratio(_) | SummaryLength::Sentences(_) => match length.check() {
                Ok(()) => vec![],
                Err(message) => {
                    let (path, hint) = if matches!(length, SummaryLength::Ratio(_)) {
                        ("/length/ratio", "Use a fraction such as 0.3")
                    } else {
                        ("/length/sentences", "Use a positive sentence count")
                    };
                    vec![ValidationDiagnostic::error(invalid(path, message).with_hint(hint))]
                }
            },
        }
    }
}

// ─── 3. clustering limits ───────────────────────────────────────────────────

struct ClusteringLimitsRule;

impl ValidationRule for ClusteringLimitsRule {
    fn name(&self) -> &str {
        "clustering_limits"
    }

    fn validate(&self, spec: &SummarySpec) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();

        let counts: &[(&str, Option<usize>)] = &[
            ("max_iterations", spec.clustering.max_iterations),
            ("n_init", spec.clustering.n_init),
        ];
        for &(field, value) in counts {
            if value == Some(0) {
                out.push(ValidationDiagnostic::error(
                    invalid(format!("/clustering/{field}"), format!("{field} must be greater than 0"))
                        .with_hint(format!("Remove {field} to use the default")),
                ));
            }
        }

        if let Some(tol) = spec.clustering.tolerance {
            if !tol.is_finite() || tol < 0.0 {
                out.push(ValidationDiagnostic::error(invalid(
                    "/clustering/tolerance",
                    format!("tolerance must be a finite non-negative number, got {tol}"),
                )));
            }
        }

        out
    }
}

// ─── 4. vectorizer ──────────────────────────────────────────────────────────

struct VectorizerRule;

impl ValidationRule for VectorizerRule {
    fn name(&self) -> &str {
        "vectorizer"
    }

    fn validate(&self, spec: &SummarySpec) -> Vec<ValidationDiagnostic> {
        match spec.vectorizer.max_df {
            Some(max_df) if !max_df.is_finite() || max_df <= 0.0 || max_df > 1.0 => {
                vec![ValidationDiagnostic::error(
                    invalid("/vectorizer/max_df", format!("max_df must be in (0, 1], got {max_df}"))
                        .with_hint("Remove max_df to keep every term"),
                )]
            }
            _ => vec![],
        }
    }
}

// ─── 5. diagnostics ─────────────────────────────────────────────────────────

struct DiagnosticsRule;

impl ValidationRule for DiagnosticsRule {
    fn name(&self) -> &str {
        "diagnostics"
    }

    fn validate(&self, spec: &SummarySpec) -> Vec<ValidationDiagnostic> {
        match &spec.diagnostics.elbow {
            Some(range) => elbow_range_diagnostics("/diagnostics/elbow", range),
            None => vec![],
        }
    }
}

// ─── 6. unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl UnknownFieldsRule {
    fn check_unknowns(
        path: &str,
        unknowns: &HashMap<String, serde_json::Value>,
        strict: bool,
    ) -> Vec<ValidationDiagnostic> {
        let mut keys: Vec<&String> = unknowns.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                let err = PipelineSpecError::new(
                    ErrorCode::UnknownField,
                    format!("{path}/{key}"),
                    format!("unrecognized field \"{key}\""),
                )
                .with_hint("Check spelling or remove this field");
                if strict {
                    ValidationDiagnostic::error(err)
                } else {
                    ValidationDiagnostic::warning(err)
                }
            })
            .collect()
    }
}

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, spec: &SummarySpec) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();
        out.extend(Self::check_unknowns("", &spec.unknown_fields, spec.strict));
        out.extend(Self::check_unknowns(
            "/clustering",
            &spec.clustering.unknown_fields,
            spec.strict,
        ));
        out.extend(Self::check_unknowns(
            "/vectorizer",
            &spec.vectorizer.unknown_fields,
            spec.strict,
        ));
        out.extend(Self::check_unknowns(
            "/diagnostics",
            &spec.diagnostics.unknown_fields,
            spec.strict,
        ));
        out
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════
