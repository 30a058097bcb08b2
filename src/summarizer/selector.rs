//! Representative sentence selection
//!
//! For every cluster the member with the highest TF-IDF score wins; exact
//! score ties go to the earlier sentence. Winners are then put back in
//! document order.

use crate::cluster::ClusterAssignment;
use crate::types::Sentence;
use serde::Serialize;

/// Separator used when rendering a summary as text
pub const DEFAULT_SEPARATOR: &str = " ";

/// A sentence chosen for the summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedSentence {
    /// Position in the input document
    pub index: usize,
    /// Original surface text
    pub text: String,
    /// Mean TF-IDF weight of the sentence
    pub score: f64,
    /// Cluster the sentence represents
    pub cluster: usize,
}

/// Selected sentences in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub sentences: Vec<SelectedSentence>,
}

impl Summary {
    /// Summary text with sentences joined by a single space
    pub fn text(&self) -> String {
        self.join(DEFAULT_SEPARATOR)
    }

    /// Summary text with a custom separator
    pub fn join(&self, separator: &str) -> String {
        self.sentences
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Input positions of the selected sentences
    pub fn indices(&self) -> Vec<usize> {
        self.sentences.iter().map(|s| s.index).collect()
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Picks the top-scoring member of every cluster
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceSelector;

impl SentenceSelector {
    pub fn new() -> Self {
        Self
    }

    /// Representative sentence index per cluster, indexed by cluster id.
    ///
    /// Clusters without members yield `None`; labels outside `[0, k)` are
    /// ignored.
    pub fn representatives(&self, assignment: &ClusterAssignment, scores: &[f64]) -> Vec<Option<usize>> {
        let mut best: Vec<Option<usize>> = vec![None; assignment.k()];
        for (i, &c) in assignment.labels().iter().enumerate() {
            let Some(slot) = best.get_mut(c) else {
                continue;
            };
            let score = scores.get(i).copied().unwrap_or(0.0);
            let replace = match *slot {
                None => true,
                // strict: an earlier sentence keeps the slot on a tie
                Some(j) => score > scores.get(j).copied().unwrap_or(0.0),
            };
            if replace {
                *slot = Some(i);
            }
        }
        best
    }

    /// Build the summary from a cluster assignment and sentence scores
    pub fn select(&self, sentences: &[Sentence], assignment: &ClusterAssignment, scores: &[f64]) -> Summary {
        let mut selected: Vec<SelectedSentence> = self
            .representatives(assignment, scores)
            .into_iter()
            .enumerate()
            .filter_map(|(cluster, rep)| rep.map(|i| (cluster, i)))
            .filter_map(|(cluster, i)| {
                sentences.get(i).map(|s| SelectedSentence {
                    index: i,
                    text: s.text.clone(),
                    score: scores.get(i).copied().unwrap_or(0.0),
                    cluster,
                })
            })
            .collect();

        selected.sort_by_key(|s| s.index);

        Summary { sentences: selected }
    }
}
