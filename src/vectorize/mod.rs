//! Sentence vectorization
//!
//! Turns tokenized sentences into L2-normalized sparse TF-IDF rows and
//! per-sentence importance scores.

pub mod sparse;
pub mod tfidf;

pub use sparse::SparseVector;
pub use tfidf::{TermVocabulary, TfidfOutput, TfidfVectorizer, WeightMatrix};
