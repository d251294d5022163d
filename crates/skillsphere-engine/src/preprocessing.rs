//! Z-score standardization of the clustering feature matrix.
//!
//! The fitted `Scaler` is part of a cluster model: the same per-column
//! mean/std that standardized the training rows must be applied to every
//! preference vector passed to `predict_cluster`.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::math::Array2;

/// Standard scaler (per-column mean and population std).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl Scaler {
    /// Columns whose stddev falls below this are divided by 1 instead.
    const MIN_STD: f64 = 1e-12;

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardize a single feature vector.
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.n_features() {
            return Err(EngineError::InvalidArgument(format!(
                "expected {} features, got {}",
                self.n_features(),
                row.len()
            )));
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(v, (m, s))| (v - m) / s)
            .collect())
    }
}

/// Fit a `Scaler` from an `Array2<f64>` where rows are samples and
/// columns are features.
pub fn fit_scaler(x: &Array2<f64>) -> Result<Scaler> {
    let (nrows, ncols) = x.shape();
    if nrows == 0 || ncols == 0 {
        return Err(EngineError::InsufficientData {
            rows: nrows,
            required: 1,
        });
    }

    let mean = x.column_means();

    let mut var = vec![0.0f64; ncols];
    for row in x.rows() {
        for (c, v) in row.iter().enumerate() {
            let d = v - mean[c];
            var[c] += d * d;
        }
    }
    let nrows_f = nrows as f64;
    let std = var
        .into_iter()
        .map(|v| {
            let s = (v / nrows_f).sqrt();
            if s < Scaler::MIN_STD {
                1.0
            } else {
                s
            }
        })
        .collect();

    Ok(Scaler { mean, std })
}

/// Transform all rows using the provided `Scaler` and return a new `Array2<f64>`.
pub fn transform_all(x: &Array2<f64>, sc: &Scaler) -> Result<Array2<f64>> {
    let (nrows, ncols) = x.shape();
    if ncols != sc.n_features() {
        return Err(EngineError::InvalidArgument(format!(
            "scaler was fitted on {} features, matrix has {}",
            sc.n_features(),
            ncols
        )));
    }
    let mut out = Vec::with_capacity(nrows * ncols);
    for row in x.rows() {
        for (c, v) in row.iter().enumerate() {
            out.push((v - sc.mean[c]) / sc.std[c]);
        }
    }
    Array2::from_shape_vec((nrows, ncols), out)
        .map_err(|e| EngineError::InvalidArgument(e.to_string()))
}

/// Fit a scaler and return it with the transformed matrix.
pub fn fit_transform(x: &Array2<f64>) -> Result<(Scaler, Array2<f64>)> {
    let sc = fit_scaler(x)?;
    let scaled = transform_all(x, &sc)?;
    Ok((sc, scaled))
}
