//! TF–IDF term weighting over article bodies.
//!
//! Follows the usual scikit-learn defaults so scores line up with what the
//! Python tooling around the data produces: lowercased tokens of at least two
//! word characters, English stop words removed, raw term counts, smoothed idf
//! `ln((1 + n) / (1 + df)) + 1` and L2-normalized rows.

use std::collections::{BTreeSet, HashMap, HashSet};

use nr_core::{Error, Result};
use unicode_segmentation::UnicodeSegmentation;

use crate::text::is_stop_word;

/// Sparse row: `(term index, weight)` pairs sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_weights(mut weights: Vec<(usize, f64)>) -> Self {
        weights.sort_by_key(|(index, _)| *index);
        let mut vector = Self { entries: weights };
        vector.normalize();
        vector
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, weight) in &mut self.entries {
                *weight /= norm;
            }
        }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product with a dense vector of vocabulary length.
    pub fn dot_dense(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|(index, weight)| dense.get(*index).map(|d| d * weight))
            .sum()
    }

    /// Add `scale * self` into `dense`.
    pub fn add_scaled_to(&self, dense: &mut [f64], scale: f64) {
        for (index, weight) in &self.entries {
            if let Some(slot) = dense.get_mut(*index) {
                *slot += scale * weight;
            }
        }
    }
}

/// Lowercased tokens of two or more word characters, stop words removed.
pub fn analyze(text: &str) -> Vec<String> {
    text.unicode_words()
        .flat_map(|word| word.split(|c: char| !(c.is_alphanumeric() || c == '_')))
        .filter(|piece| piece.chars().count() >= 2)
        .map(str::to_lowercase)
        .filter(|token| !is_stop_word(token))
        .collect()
}

#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    /// term -> column, columns assigned in sorted term order
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfIdfVectorizer {
    /// Learn vocabulary and idf from `documents` and return their weighted rows,
    /// one per document in input order.
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> Result<(Self, Vec<SparseVector>)> {
        if documents.is_empty() {
            return Err(Error::EmptyCorpus("no documents to fit".to_string()));
        }

        let analyzed: Vec<Vec<String>> = documents.iter().map(|d| analyze(d.as_ref())).collect();

        let terms: BTreeSet<&str> = analyzed.iter().flatten().map(String::as_str).collect();
        if terms.is_empty() {
            return Err(Error::EmptyCorpus(format!(
                "{} documents but an empty vocabulary; they may only contain stop words",
                documents.len()
            )));
        }
        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term.to_string(), index))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for tokens in &analyzed {
            let unique: HashSet<usize> = tokens.iter().filter_map(|t| vocabulary.get(t).copied()).collect();
            for index in unique {
                document_frequency[index] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectorizer = Self { vocabulary, idf };
        let rows = analyzed.iter().map(|tokens| vectorizer.weigh(tokens)).collect();
        Ok((vectorizer, rows))
    }

    /// Weigh an unseen document against the fitted vocabulary. Unknown terms are ignored.
    pub fn transform(&self, document: &str) -> SparseVector {
        self.weigh(&analyze(document))
    }

    fn weigh(&self, tokens: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokens {
            if let Some(&index) = self.vocabulary.get(token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }
        SparseVector::from_weights(
            counts
                .into_iter()
                .map(|(index, count)| (index, count * self.idf[index]))
                .collect(),
        )
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.index_of(term).map(|index| self.idf[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_analyze() {
        assert_eq!(
            analyze("The rover's 2 cameras can't see Mars, x-rays aside"),
            vec!["rover", "cameras", "see", "mars", "rays", "aside"]
        );
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let (vectorizer, _) = TfIdfVectorizer::fit_transform(&["zebra apple", "mango"]).unwrap();
        assert_eq!(vectorizer.vocabulary_size(), 3);
        assert_eq!(vectorizer.index_of("apple"), Some(0));
        assert_eq!(vectorizer.index_of("mango"), Some(1));
        assert_eq!(vectorizer.index_of("zebra"), Some(2));
    }

    #[test]
    fn test_smoothed_idf() {
        let docs = ["rocket launch", "rocket engine", "garden party"];
        let (vectorizer, _) = TfIdfVectorizer::fit_transform(&docs).unwrap();

        assert!(approx(vectorizer.idf("rocket").unwrap(), (4.0f64 / 3.0).ln() + 1.0));
        assert!(approx(vectorizer.idf("garden").unwrap(), 2.0f64.ln() + 1.0));
        assert_eq!(vectorizer.idf("the"), None);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let docs = ["rocket rocket launch", "rocket engine", "garden party", "the of and"];
        let (_, rows) = TfIdfVectorizer::fit_transform(&docs).unwrap();

        assert_eq!(rows.len(), 4);
        for row in &rows[..3] {
            assert!(approx(row.norm(), 1.0));
            assert!(row.entries().iter().all(|(_, w)| *w > 0.0));
        }
        assert!(rows[3].is_empty());
    }

    #[test]
    fn test_term_counts_raise_weight() {
        let (vectorizer, rows) = TfIdfVectorizer::fit_transform(&["rocket rocket launch"]).unwrap();
        let rocket = vectorizer.index_of("rocket").unwrap();
        let launch = vectorizer.index_of("launch").unwrap();
        let weight = |i: usize| rows[0].entries().iter().find(|(j, _)| *j == i).unwrap().1;
        assert!(approx(weight(rocket), 2.0 * weight(launch)));
    }

    #[test]
    fn test_transform_ignores_unknown_terms() {
        let (vectorizer, rows) = TfIdfVectorizer::fit_transform(&["rocket launch", "garden party"]).unwrap();
        assert_eq!(vectorizer.transform("rocket launch tomorrow"), rows[0]);
        assert!(vectorizer.transform("submarine").is_empty());
    }

    #[test]
    fn test_empty_inputs_fail() {
        let none: [&str; 0] = [];
        assert!(matches!(TfIdfVectorizer::fit_transform(&none), Err(Error::EmptyCorpus(_))));
        assert!(matches!(
            TfIdfVectorizer::fit_transform(&["", "the and of", "a"]),
            Err(Error::EmptyCorpus(_))
        ));
    }

    #[test]
    fn test_dense_helpers() {
        let (_, rows) = TfIdfVectorizer::fit_transform(&["alpha beta"]).unwrap();
        let mut dense = vec![0.0; 2];
        rows[0].add_scaled_to(&mut dense, 2.0);
        assert!(approx(rows[0].dot_dense(&dense), 2.0));
    }
}
