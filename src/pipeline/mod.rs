//! Summarization pipeline
//!
//! Statically composed stages (vectorize, cluster, select) with observer
//! hooks, plus the JSON spec format and its validation engine.

pub mod error_code;
pub mod errors;
pub mod observer;
pub mod runner;
pub mod spec;
pub mod traits;
pub mod validation;
