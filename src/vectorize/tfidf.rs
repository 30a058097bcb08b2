//! TF-IDF sentence vectorizer
//!
//! Every sentence is treated as a document. Weights use sublinear term
//! frequency and a floored inverse document frequency:
//!
//! ```text
//! tf(t, s)  = 1 + ln(count(t in s))
//! idf(t)    = ln(N / (1 + df(t))) + 1
//! w(t, s)   = tf(t, s) * idf(t)
//! ```
//!
//! Rows are L2-normalized. Sentences without any counted term keep an
//! all-zero row.

use super::sparse::SparseVector;
use crate::types::Sentence;
use rustc_hash::FxHashMap;

/// Document-local vocabulary, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermVocabulary {
    terms: Vec<String>,
    index: FxHashMap<String, u32>,
}

impl TermVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a term if unseen and return its column id
    pub fn get_or_insert(&mut self, term: &str) -> u32 {
        if let Some(&id) = self.index.get(term) {
            return id;
        }
        let id = self.terms.len() as u32;
        self.terms.push(term.to_string());
        self.index.insert(term.to_string(), id);
        id
    }

    pub fn id(&self, term: &str) -> Option<u32> {
        self.index.get(term).copied()
    }

    pub fn term(&self, id: u32) -> Option<&str> {
        self.terms.get(id as usize).map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Sentence-by-term weight matrix with sparse rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightMatrix {
    rows: Vec<SparseVector>,
    num_terms: usize,
}

impl WeightMatrix {
    pub fn new(rows: Vec<SparseVector>, num_terms: usize) -> Self {
        Self { rows, num_terms }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_terms(&self) -> usize {
        self.num_terms
    }

    pub fn row(&self, i: usize) -> &SparseVector {
        &self.rows[i]
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// Weight of term `term` in sentence `row`
    pub fn get(&self, row: usize, term: u32) -> f64 {
        self.rows.get(row).map_or(0.0, |r| r.get(term))
    }

    /// True when every row is all-zero (empty vocabulary)
    pub fn is_zero(&self) -> bool {
        self.rows.iter().all(SparseVector::is_empty)
    }

    /// Total number of stored non-zero weights
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(SparseVector::nnz).sum()
    }

    /// Cosine similarity between two sentences
    pub fn cosine_similarity(&self, a: usize, b: usize) -> f64 {
        self.rows[a].cosine_similarity(&self.rows[b])
    }

    /// Dense pairwise cosine similarity matrix (N x N)
    pub fn similarity_matrix(&self) -> Vec<Vec<f64>> {
        let n = self.rows.len();
        let mut sim = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in i..n {
                let s = self.rows[i].cosine_similarity(&self.rows[j]);
                sim[i][j] = s;
                sim[j][i] = s;
            }
        }
        sim
    }
}

/// Everything the vectorizer produces for one document
#[derive(Debug, Clone, Default)]
pub struct TfidfOutput {
    pub vocabulary: TermVocabulary,
    pub matrix: WeightMatrix,
    /// Mean non-zero weight per sentence
    pub scores: Vec<f64>,
}

/// TF-IDF vectorizer over pre-tokenized sentences
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    /// Ignore terms appearing in more than this fraction of sentences
    max_df: Option<f64>,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum document-frequency ratio (0.0-1.0]
    pub fn with_max_df(mut self, max_df: Option<f64>) -> Self {
        self.max_df = max_df;
        self
    }

    /// Vectorize a document
    pub fn fit_transform(&self, sentences: &[Sentence]) -> TfidfOutput {
        let n = sentences.len();
        if n == 0 {
            return TfidfOutput::default();
        }

        // Document frequencies, keyed by first-appearance order
        let mut seen = TermVocabulary::new();
        let mut df: Vec<usize> = Vec::new();
        for sentence in sentences {
            let mut in_sentence: Vec<u32> = sentence
                .tokens
                .iter()
                .map(|t| seen.get_or_insert(t))
                .collect();
            in_sentence.sort_unstable();
            in_sentence.dedup();
            df.resize(seen.len(), 0);
            for id in in_sentence {
                df[id as usize] += 1;
            }
        }

        // Apply max_df and build the final vocabulary
        let mut vocabulary = TermVocabulary::new();
        let mut idf: Vec<f64> = Vec::new();
        for (term, &freq) in seen.terms().iter().zip(&df) {
            if let Some(max_df) = self.max_df {
                if freq as f64 / n as f64 > max_df {
                    continue;
                }
            }
            vocabulary.get_or_insert(term);
            idf.push((n as f64 / (1.0 + freq as f64)).ln() + 1.0);
        }

        let rows: Vec<SparseVector> = sentences
            .iter()
            .map(|sentence| {
                let mut counts: FxHashMap<u32, usize> = FxHashMap::default();
                for token in &sentence.tokens {
                    if let Some(id) = vocabulary.id(token) {
                        *counts.entry(id).or_insert(0) += 1;
                    }
                }
                let weights: FxHashMap<u32, f64> = counts
                    .into_iter()
                    .map(|(id, c)| (id, sublinear_tf(c) * idf[id as usize]))
                    .collect();
                SparseVector::from_dimensions(weights)
            })
            .collect();

        let scores = rows.iter().map(SparseVector::mean_nonzero).collect();
        let matrix = WeightMatrix::new(rows, vocabulary.len());

        TfidfOutput {
            vocabulary,
            matrix,
            scores,
        }
    }
}

/// `1 + ln(c)` for positive counts
fn sublinear_tf(count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        1.0 + (count as f64).ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(raw: &[&[&str]]) -> Vec<Sentence> {
        raw.iter()
            .map(|tokens| Sentence::new(tokens.join(" "), tokens.iter().copied()))
            .collect()
    }

    #[test]
    fn test_rows_are_unit_or_zero() {
        let input = sentences(&[
            &["machine", "learning", "models"],
            &[],
            &["deep", "learning", "learning", "networks"],
            &["models", "models", "models"],
        ]);
        let out = TfidfVectorizer::new().fit_transform(&input);

        assert_eq!(out.matrix.num_rows(), 4);
        for (i, row) in out.matrix.rows().iter().enumerate() {
            let norm = row.norm();
            if input[i].tokens.is_empty() {
                assert_eq!(norm, 0.0);
            } else {
                assert!((norm - 1.0).abs() < 1e-9, "row {i} norm {norm}");
            }
        }
    }

    #[test]
    fn test_vocabulary_first_appearance_order() {
        let input = sentences(&[&["beta", "alpha"], &["gamma", "alpha"]]);
        let out = TfidfVectorizer::new().fit_transform(&input);

        assert_eq!(out.vocabulary.terms(), &["beta", "alpha", "gamma"]);
        assert_eq!(out.vocabulary.id("gamma"), Some(2));
        assert_eq!(out.vocabulary.term(1), Some("alpha"));
        assert_eq!(out.matrix.num_terms(), 3);
    }

    #[test]
    fn test_weights_follow_formula() {
        // N = 2; "shared" in both, "rare" only in the first
        let input = sentences(&[&["shared", "rare", "rare"], &["shared"]]);
        let out = TfidfVectorizer::new().fit_transform(&input);

        let idf_shared = (2.0_f64 / 3.0).ln() + 1.0;
        let idf_rare = (2.0_f64 / 2.0).ln() + 1.0;
        let w_shared = 1.0 * idf_shared;
        let w_rare = (1.0 + 2.0_f64.ln()) * idf_rare;
        let norm = (w_shared * w_shared + w_rare * w_rare).sqrt();

        let shared = out.vocabulary.id("shared").unwrap();
        let rare = out.vocabulary.id("rare").unwrap();
        assert!((out.matrix.get(0, shared) - w_shared / norm).abs() < 1e-12);
        assert!((out.matrix.get(0, rare) - w_rare / norm).abs() < 1e-12);
        // single-term row normalizes to exactly 1
        assert!((out.matrix.get(1, shared) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_idf_stays_positive_for_ubiquitous_terms() {
        let input = sentences(&[&["cat", "sat"], &["cat", "sat"], &["cat", "sat"]]);
        let out = TfidfVectorizer::new().fit_transform(&input);

        for row in out.matrix.rows() {
            assert_eq!(row.nnz(), 2);
            assert!(row.entries().iter().all(|&(_, w)| w > 0.0));
        }
    }

    #[test]
    fn test_scores_are_mean_nonzero() {
        let input = sentences(&[&["solo"], &["one", "two"], &[]]);
        let out = TfidfVectorizer::new().fit_transform(&input);

        assert!((out.scores[0] - 1.0).abs() < 1e-12);
        // two terms with equal idf -> each 1/sqrt(2)
        assert!((out.scores[1] - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert_eq!(out.scores[2], 0.0);
    }

    #[test]
    fn test_single_sentence() {
        let input = sentences(&[&["only", "sentence"]]);
        let out = TfidfVectorizer::new().fit_transform(&input);

        assert_eq!(out.matrix.num_rows(), 1);
        assert!((out.matrix.row(0).norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_vocabulary() {
        let input = sentences(&[&[], &[]]);
        let out = TfidfVectorizer::new().fit_transform(&input);

        assert!(out.vocabulary.is_empty());
        assert!(out.matrix.is_zero());
        assert_eq!(out.scores, vec![0.0, 0.0]);
    }

    #[test]
    fn test_max_df_drops_ubiquitous_terms() {
        let input = sentences(&[&["the", "cat"], &["the", "dog"], &["the", "fox"]]);
        let out = TfidfVectorizer::new()
            .with_max_df(Some(0.95))
            .fit_transform(&input);

        assert_eq!(out.vocabulary.id("the"), None);
        assert_eq!(out.vocabulary.len(), 3);
    }

    #[test]
    fn test_similarity_matrix() {
        let input = sentences(&[&["rain", "cloud"], &["rain", "cloud"], &["stock", "bond"]]);
        let out = TfidfVectorizer::new().fit_transform(&input);
        let sim = out.matrix.similarity_matrix();

        assert!((sim[0][1] - 1.0).abs() < 1e-9);
        assert!(sim[0][2].abs() < 1e-12);
        assert!((sim[2][2] - 1.0).abs() < 1e-9);
        assert_eq!(sim[1][0], sim[0][1]);
    }
}
