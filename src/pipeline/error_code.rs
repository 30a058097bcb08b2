//! Stable error codes for spec diagnostics.

use serde::Serialize;

/// Machine-readable category of a spec diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The `v` field names a version this crate does not understand
    UnsupportedVersion,
    /// A value is outside its allowed range
    InvalidValue,
    /// A pair of values contradict each other (e.g. `min_k > max_k`)
    InvalidRange,
    /// A field is not part of the schema
    UnknownField,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedVersion => "unsupported_version",
            Self::InvalidValue => "invalid_value",
            Self::InvalidRange => "invalid_range",
            Self::UnknownField => "unknown_field",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
