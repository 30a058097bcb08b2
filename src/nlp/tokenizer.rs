//! Sentence splitting and word tokenization
//!
//! A small front end that turns raw text into [`Sentence`] values:
//! whitespace runs are collapsed, sentences are split on Unicode sentence
//! boundaries, and words are lowercased, kept only when alphabetic, and
//! filtered against a stopword list.

use super::stopwords::StopwordFilter;
use crate::types::Sentence;
use unicode_segmentation::UnicodeSegmentation;

/// Collapse whitespace runs to single spaces and trim the ends
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split cleaned text into trimmed, non-empty sentences.
///
/// Boundaries follow Unicode UAX #29, which has no abbreviation list:
/// "Dr. Smith arrived." splits after "Dr.".
pub fn split_sentences(text: &str) -> Vec<String> {
    clean_text(text)
        .split_sentence_bounds()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Word tokenizer with stopword removal
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: StopwordFilter,
    remove_stopwords: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// English stopwords, removal enabled
    pub fn new() -> Self {
        Self {
            stopwords: StopwordFilter::default(),
            remove_stopwords: true,
        }
    }

    pub fn with_stopwords(mut self, stopwords: StopwordFilter) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn with_stopword_removal(mut self, enabled: bool) -> Self {
        self.remove_stopwords = enabled;
        self
    }

    /// Lowercased alphabetic words of one sentence, stopwords removed
    pub fn tokenize(&self, sentence: &str) -> Vec<String> {
        sentence
            .unicode_words()
            .filter(|w| w.chars().all(char::is_alphabetic))
            .map(str::to_lowercase)
            .filter(|w| !(self.remove_stopwords && self.stopwords.is_stopword(w)))
            .collect()
    }

    /// Split raw text into tokenized sentences
    pub fn sentences(&self, text: &str) -> Vec<Sentence> {
        split_sentences(text)
            .into_iter()
            .map(|s| {
                let tokens = self.tokenize(&s);
                Sentence { text: s, tokens }
            })
            .collect()
    }
}
