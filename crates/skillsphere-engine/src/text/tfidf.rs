//! Inverse-document-frequency weighting of short documents.
//!
//! Weights follow the smoothed formulation
//! `idf(t) = ln((1 + n) / (1 + df(t))) + 1` with raw term counts as term
//! frequency; every document vector is L2-normalized so the dot product of
//! two vectors is their cosine similarity.
use std::collections::{BTreeMap, BTreeSet};

use crate::text::tokenize::Tokenizer;

/// Sparse, L2-normalized term vector. `indices` is strictly increasing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Build from `(term index, weight)` pairs; weights of repeated indices
    /// are summed and the result is L2-normalized.
    pub fn from_weights(weights: BTreeMap<usize, f64>) -> Self {
        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm <= 0.0 || !norm.is_finite() {
            return Self::default();
        }
        let (indices, values) = weights.into_iter().map(|(i, w)| (i, w / norm)).unzip();
        Self { indices, values }
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product by merge join over the sorted indices.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Learns a vocabulary and idf weights from a document collection.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    tokenizer: Tokenizer,
}

/// Output of `TfidfVectorizer::fit_transform`.
#[derive(Debug, Clone)]
pub struct TfidfModel {
    /// Term → column index, assigned in lexicographic term order.
    pub vocabulary: BTreeMap<String, usize>,
    pub idf: Vec<f64>,
    pub vectors: Vec<SparseVector>,
}

impl TfidfVectorizer {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> TfidfModel {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| self.tokenizer.tokenize(doc.as_ref()))
            .collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let unique: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n_docs = documents.len() as f64;
        let vocabulary: BTreeMap<String, usize> = document_frequency
            .keys()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();
        let idf: Vec<f64> = document_frequency
            .values()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors = tokenized
            .iter()
            .map(|tokens| {
                let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
                for token in tokens {
                    if let Some(&idx) = vocabulary.get(token) {
                        *weights.entry(idx).or_insert(0.0) += idf[idx];
                    }
                }
                SparseVector::from_weights(weights)
            })
            .collect();

        log::debug!(
            "Fitted tf-idf over {} documents with {} terms",
            documents.len(),
            vocabulary.len()
        );

        TfidfModel {
            vocabulary,
            idf,
            vectors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_are_unit_length_and_nonnegative() {
        let model = TfidfVectorizer::default()
            .fit_transform(&["Python Basics", "Advanced Python", "Yoga 101"]);
        for v in &model.vectors {
            let norm: f64 = v.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
            assert!(v.iter().all(|(_, w)| w >= 0.0));
        }
    }

    #[test]
    fn rarer_terms_weigh_more() {
        let model = TfidfVectorizer::default()
            .fit_transform(&["Python Basics", "Advanced Python", "Python Yoga"]);
        let python = model.idf[model.vocabulary["python"]];
        let yoga = model.idf[model.vocabulary["yoga"]];
        assert!(yoga > python);
        assert!((python - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stop_word_only_document_is_zero() {
        let model = TfidfVectorizer::default().fit_transform(&["The and of", "Guitar"]);
        assert!(model.vectors[0].is_zero());
        assert_eq!(model.vectors[1].nnz(), 1);
    }
}
