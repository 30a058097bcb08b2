//! Stopword filtering
//!
//! Wraps the `stop-words` crate lists. Words are stored and matched in
//! lowercase.

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

/// A set of words removed from sentence token lists
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    stopwords: FxHashSet<String>,
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::new("en")
    }
}

impl StopwordFilter {
    /// Stopwords for a language code or name; unknown languages fall back
    /// to English
    pub fn new(language: &str) -> Self {
        let lang = match language.to_lowercase().as_str() {
            "de" | "german" => LANGUAGE::German,
            "fr" | "french" => LANGUAGE::French,
            "es" | "spanish" => LANGUAGE::Spanish,
            "it" | "italian" => LANGUAGE::Italian,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            _ => LANGUAGE::English,
        };
        Self::from_words(get(lang).iter())
    }

    /// A filter that removes nothing
    pub fn empty() -> Self {
        Self {
            stopwords: FxHashSet::default(),
        }
    }

    /// A filter built from a custom list
    pub fn from_list(words: &[&str]) -> Self {
        Self::from_words(words.iter())
    }

    fn from_words<S: AsRef<str>>(words: impl Iterator<Item = S>) -> Self {
        Self {
            stopwords: words.map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
