//! Pairwise title similarity over a catalog snapshot.
//!
//! The index stores one tf-idf vector per course and the dense N×N cosine
//! similarity matrix between them. Memory and build time are O(N²), which
//! is fine for catalogs of a few thousand rows; the matrix is rebuilt from
//! scratch whenever the catalog changes.
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rayon::prelude::*;

use crate::catalog::Catalog;
use crate::text::{SparseVector, TfidfVectorizer, Tokenizer};

#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    vectors: Vec<SparseVector>,
    vocabulary_size: usize,
    matrix: Array2<f64>,
    centrality: Array1<f64>,
}

impl SimilarityIndex {
    /// Index every title in `catalog` with the default English tokenizer.
    pub fn build(catalog: &Catalog) -> Self {
        let titles: Vec<&str> = catalog.iter().map(|c| c.title.as_str()).collect();
        Self::from_titles(&titles, Tokenizer::default())
    }

    pub fn from_titles<S: AsRef<str>>(titles: &[S], tokenizer: Tokenizer) -> Self {
        let model = TfidfVectorizer::new(tokenizer).fit_transform(titles);
        let vectors = model.vectors;
        let n = vectors.len();

        // Upper triangle only; the lower half is mirrored so the matrix is
        // exactly symmetric.
        let upper: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                ((i + 1)..n)
                    .map(|j| vectors[i].dot(&vectors[j]).clamp(0.0, 1.0))
                    .collect()
            })
            .collect();

        let mut matrix = Array2::<f64>::zeros((n, n));
        for (i, row) in upper.iter().enumerate() {
            matrix[[i, i]] = 1.0;
            for (offset, &value) in row.iter().enumerate() {
                let j = i + 1 + offset;
                matrix[[i, j]] = value;
                matrix[[j, i]] = value;
            }
        }

        let centrality = matrix
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(0));

        let empty_titles = vectors.iter().filter(|v| v.is_zero()).count();
        log::info!(
            "Built similarity index: {} titles, {} terms, {} titles without indexable terms",
            n,
            model.vocabulary.len(),
            empty_titles
        );

        Self {
            vectors,
            vocabulary_size: model.vocabulary.len(),
            matrix,
            centrality,
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    pub fn vector(&self, index: usize) -> Option<&SparseVector> {
        self.vectors.get(index)
    }

    /// Cosine similarity of two titles in `[0, 1]`; a title with itself is 1.
    /// `None` when either index is outside the catalog.
    pub fn similarity(&self, i: usize, j: usize) -> Option<f64> {
        self.matrix.get([i, j]).copied()
    }

    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.matrix.row(index)
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Mean similarity of each title to every title in the catalog.
    pub fn centrality(&self) -> &Array1<f64> {
        &self.centrality
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_wording_scores_one() {
        let index = SimilarityIndex::from_titles(
            &["Learn Guitar", "Guitar Learn", "Cooking"],
            Tokenizer::default(),
        );
        assert!((index.similarity(0, 1).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(index.similarity(0, 2), Some(0.0));
    }

    #[test]
    fn similarity_outside_the_catalog_is_none() {
        let index = SimilarityIndex::from_titles(&["Learn Guitar", "Cooking"], Tokenizer::default());
        assert_eq!(index.similarity(0, 2), None);
        assert_eq!(index.similarity(5, 0), None);
        assert_eq!(index.similarity(1, 1), Some(1.0));
    }

    #[test]
    fn empty_index_has_no_centrality() {
        let titles: Vec<String> = Vec::new();
        let index = SimilarityIndex::from_titles(&titles, Tokenizer::default());
        assert!(index.is_empty());
        assert_eq!(index.centrality().len(), 0);
    }
}
