//! Natural Language Processing components
//!
//! Optional preprocessing front end: sentence splitting, tokenization and
//! stopword filtering.

pub mod stopwords;
pub mod tokenizer;

pub use stopwords::StopwordFilter;
pub use tokenizer::{clean_text, split_sentences, Tokenizer};
