//! Summary assembly
//!
//! Picks one representative sentence per topic cluster and restores
//! document order.

pub mod selector;

pub use selector::{SelectedSentence, SentenceSelector, Summary};
