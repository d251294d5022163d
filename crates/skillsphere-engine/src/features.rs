//! Numeric feature matrix for clustering.
//!
//! Identifier and free-text fields (id, title, url) never become features.
//! Columns are laid out as `price`, `num_subscribers`, `is_paid`, `level`,
//! `content_duration`, then the catalog's extra numeric columns. Known levels
//! use their fixed codes; other level labels are coded after them in sorted
//! order. An optional column is only used when at least one course has a
//! value for it; rows still missing a used column are dropped. Subject is carried alongside as
//! a grouping label and never scaled.
use crate::catalog::{Catalog, Course, LevelCodes};
use crate::error::{EngineError, Result};
use crate::math::Array2;

pub const PRICE: usize = 0;
pub const NUM_SUBSCRIBERS: usize = 1;

#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub names: Vec<String>,
    pub data: Array2<f64>,
    /// Catalog index of every feature row.
    pub row_index: Vec<usize>,
    pub subjects: Vec<Option<String>>,
    /// Courses dropped because a used feature was missing.
    pub dropped: usize,
}

impl FeatureMatrix {
    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

type Extractor = Box<dyn Fn(&Course) -> Option<f64>>;

fn column<F>(name: &str, extract: F) -> (String, Extractor)
where
    F: Fn(&Course) -> Option<f64> + 'static,
{
    (name.to_string(), Box::new(extract))
}

fn candidate_columns(catalog: &Catalog) -> Vec<(String, Extractor)> {
    let level_codes = LevelCodes::from_levels(catalog.iter().filter_map(|c| c.level.as_ref()));
    if level_codes.other_labels() > 0 {
        log::debug!(
            "{} level labels outside the known four are coded from 4 upward",
            level_codes.other_labels()
        );
    }
    let mut columns = vec![
        column("price", |c| Some(c.price)),
        column("num_subscribers", |c| Some(c.num_subscribers as f64)),
        column("is_paid", |c| c.is_paid.map(|paid| if paid { 1.0 } else { 0.0 })),
        column("level", move |c| {
            c.level
                .as_ref()
                .and_then(|level| level_codes.code(level))
                .map(f64::from)
        }),
        column("content_duration", |c| {
            c.content_duration.filter(|d| d.is_finite())
        }),
    ];
    for (slot, name) in catalog.extra_columns().iter().enumerate() {
        columns.push(column(name, move |c| {
            c.extra.get(slot).copied().flatten().filter(|v| v.is_finite())
        }));
    }
    columns
}

/// Build the clustering feature matrix from a catalog.
///
/// Fails with `InsufficientData` when fewer than `n_clusters` rows survive.
pub fn prepare_features(catalog: &Catalog, n_clusters: usize) -> Result<FeatureMatrix> {
    if n_clusters == 0 {
        return Err(EngineError::InvalidArgument(
            "number of clusters must be at least 1".to_string(),
        ));
    }

    let columns: Vec<(String, Extractor)> = candidate_columns(catalog)
        .into_iter()
        .filter(|(name, extract)| {
            let used = catalog.iter().any(|c| extract(c).is_some());
            if !used {
                log::debug!("Feature '{}' has no values in this catalog; skipped", name);
            }
            used
        })
        .collect();

    let mut rows = Vec::with_capacity(catalog.len());
    let mut row_index = Vec::with_capacity(catalog.len());
    let mut subjects = Vec::with_capacity(catalog.len());
    for (idx, course) in catalog.iter().enumerate() {
        let row: Option<Vec<f64>> = columns.iter().map(|(_, extract)| extract(course)).collect();
        if let Some(row) = row {
            rows.push(row);
            row_index.push(idx);
            subjects.push(course.subject.clone());
        }
    }
    let dropped = catalog.len() - rows.len();

    if rows.len() < n_clusters {
        return Err(EngineError::InsufficientData {
            rows: rows.len(),
            required: n_clusters,
        });
    }

    let names: Vec<String> = columns.into_iter().map(|(name, _)| name).collect();
    let data = Array2::from_rows(rows).map_err(|e| EngineError::InvalidArgument(e.to_string()))?;

    log::info!(
        "Prepared {} x {} feature matrix ({}), {} rows dropped for missing values",
        data.nrows(),
        data.ncols(),
        names.join(", "),
        dropped
    );

    Ok(FeatureMatrix {
        names,
        data,
        row_index,
        subjects,
        dropped,
    })
}
