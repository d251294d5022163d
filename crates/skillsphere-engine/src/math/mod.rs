//! Small dense containers used by the feature and clustering pipeline.
//!
//! `Array2` holds the row-major feature matrix and centroid tables; the
//! free functions cover the distance arithmetic shared by fit and predict.
pub mod matrix;
pub mod vector;

pub use matrix::{Array2, ShapeError};
pub use vector::{nearest_centroid, squared_distance, Array1};
