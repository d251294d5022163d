//! Title text processing: tokenization, stop words and tf-idf weighting.
pub mod stopwords;
pub mod tfidf;
pub mod tokenize;

pub use stopwords::StopWords;
pub use tfidf::{SparseVector, TfidfModel, TfidfVectorizer};
pub use tokenize::Tokenizer;
