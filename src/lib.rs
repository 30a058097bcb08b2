//! # rapid-summarizer
//!
//! Extractive summarization without trained models. Sentences are weighted
//! with sublinear TF-IDF, grouped into topics with seeded K-Means, and one
//! representative per topic is returned in reading order.
//!
//! ```
//! use rapid_summarizer::{summarize_text, SummarizerConfig};
//!
//! let text = "Rain storms battered the coast. Heavy rain flooded roads. \
//!             Stock markets rallied. Investors bought shares.";
//! let report = summarize_text(text, &SummarizerConfig::default().with_sentences(2)).unwrap();
//!
//! assert_eq!(report.summary.len(), 2);
//! assert_eq!(report.original_sentence_count, 4);
//! ```
//!
//! Pre-tokenized input goes through [`summarize`]; custom stages through
//! [`pipeline::runner::PipelineBuilder`].

pub mod cluster;
pub mod errors;
pub mod nlp;
pub mod pipeline;
pub mod summarizer;
pub mod types;
pub mod vectorize;

pub use cluster::{ClusterAssignment, ElbowPoint, KMeans};
pub use errors::{Result, SummarizeError};
pub use nlp::{StopwordFilter, Tokenizer};
pub use pipeline::observer::{NoopObserver, PipelineObserver, StageReport, StageTimingObserver};
pub use pipeline::runner::{DefaultPipeline, Pipeline, PipelineBuilder, SummaryReport};
pub use pipeline::spec::SummarySpec;
pub use summarizer::{SelectedSentence, Summary};
pub use types::{ElbowRange, Sentence, SummarizerConfig, SummaryLength};
pub use vectorize::{TfidfOutput, TfidfVectorizer, WeightMatrix};

#[cfg(feature = "tracing")]
pub use pipeline::observer::TracingObserver;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Summarize pre-tokenized sentences with the default pipeline
pub fn summarize(sentences: &[Sentence], cfg: &SummarizerConfig) -> Result<SummaryReport> {
    DefaultPipeline::standard().run(sentences, cfg, &mut NoopObserver)
}

/// Split, tokenize (English stopwords) and summarize raw text.
///
/// Text that yields no sentences is [`SummarizeError::EmptyInput`]; the
/// configuration is still checked first.
pub fn summarize_text(text: &str, cfg: &SummarizerConfig) -> Result<SummaryReport> {
    cfg.validate()?;
    let sentences = Tokenizer::new().sentences(text);
    summarize(&sentences, cfg)
}
