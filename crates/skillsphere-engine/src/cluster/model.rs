use std::collections::BTreeMap;

use crate::catalog::{Catalog, Course};
use crate::cluster::descriptor::ClusterSummary;
use crate::cluster::kmeans::KMeans;
use crate::config::{DescriptorThresholds, EngineConfig, KMeansConfig};
use crate::error::{EngineError, Result};
use crate::features::{prepare_features, FeatureMatrix, NUM_SUBSCRIBERS, PRICE};
use crate::math::{nearest_centroid, Array2};
use crate::preprocessing::{fit_transform, Scaler};

/// A fitted partition of one catalog snapshot.
///
/// Holds everything a later query needs: the centroids in standardized
/// space, the scaler that produced that space, and the assignment of every
/// clustered course. Cluster ids are only meaningful within one fit.
#[derive(Debug, Clone)]
pub struct ClusterModel {
    k: usize,
    feature_names: Vec<String>,
    scaler: Scaler,
    centroids: Array2<f64>,
    /// Cluster of every feature row, aligned with `row_index`.
    assignments: Vec<usize>,
    row_index: Vec<usize>,
    /// Cluster per catalog index; `None` for rows without complete features.
    catalog_clusters: Vec<Option<usize>>,
    training_means: Vec<f64>,
    summaries: Vec<ClusterSummary>,
    inertia: f64,
    n_iter: usize,
}

/// Fit `k` clusters over the catalog's numeric features.
pub fn fit_clusters(catalog: &Catalog, k: usize, config: &EngineConfig) -> Result<ClusterModel> {
    let features = prepare_features(catalog, k)?;
    ClusterModel::fit(catalog.len(), &features, k, &config.kmeans, &config.descriptor)
}

/// Inertia for every `k` in `k_range`, for choosing `k` offline.
///
/// Values of `k` larger than the number of rows are skipped.
pub fn elbow(
    features: &FeatureMatrix,
    k_range: std::ops::RangeInclusive<usize>,
    config: &KMeansConfig,
) -> Result<Vec<(usize, f64)>> {
    let (_, scaled) = fit_transform(&features.data)?;
    let mut curve = Vec::new();
    for k in k_range {
        if k == 0 || k > scaled.nrows() {
            continue;
        }
        let mut km = KMeans::new(k, config.clone());
        km.fit(&scaled)?;
        let inertia = km.inertia()?;
        log::debug!("elbow: k={} inertia={:.4}", k, inertia);
        curve.push((k, inertia));
    }
    Ok(curve)
}

impl ClusterModel {
    pub fn fit(
        catalog_len: usize,
        features: &FeatureMatrix,
        k: usize,
        config: &KMeansConfig,
        thresholds: &DescriptorThresholds,
    ) -> Result<Self> {
        if k == 0 {
            return Err(EngineError::InvalidArgument(
                "number of clusters must be at least 1".to_string(),
            ));
        }
        if features.nrows() < k {
            return Err(EngineError::InsufficientData {
                rows: features.nrows(),
                required: k,
            });
        }

        let (scaler, scaled) = fit_transform(&features.data)?;
        let mut km = KMeans::new(k, config.clone());
        km.fit(&scaled)?;

        let assignments = km.labels()?.to_vec();
        let mut catalog_clusters = vec![None; catalog_len];
        for (&catalog_idx, &cluster) in features.row_index.iter().zip(&assignments) {
            if let Some(slot) = catalog_clusters.get_mut(catalog_idx) {
                *slot = Some(cluster);
            }
        }

        let summaries = (0..k)
            .map(|cluster| {
                let members: Vec<&[f64]> = features
                    .data
                    .rows()
                    .zip(&assignments)
                    .filter(|(_, c)| **c == cluster)
                    .map(|(row, _)| row)
                    .collect();
                let prices: Vec<f64> = members.iter().map(|r| r[PRICE]).collect();
                let subscribers: Vec<f64> = members.iter().map(|r| r[NUM_SUBSCRIBERS]).collect();
                ClusterSummary::from_members(cluster, &prices, &subscribers, thresholds)
            })
            .collect::<Vec<_>>();

        let model = Self {
            k,
            feature_names: features.names.clone(),
            training_means: scaler.mean.clone(),
            scaler,
            centroids: km.centroids()?.clone(),
            assignments,
            row_index: features.row_index.clone(),
            catalog_clusters,
            summaries,
            inertia: km.inertia()?,
            n_iter: km.n_iter()?,
        };
        model.log_summary();
        Ok(model)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    /// Centroids in standardized feature space.
    pub fn centroids(&self) -> &Array2<f64> {
        &self.centroids
    }

    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    pub fn row_index(&self) -> &[usize] {
        &self.row_index
    }

    /// Size of the catalog this model was fitted on.
    pub fn catalog_len(&self) -> usize {
        self.catalog_clusters.len()
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    pub fn training_means(&self) -> &[f64] {
        &self.training_means
    }

    pub fn summaries(&self) -> &[ClusterSummary] {
        &self.summaries
    }

    fn check_cluster(&self, cluster: usize) -> Result<()> {
        if cluster >= self.k {
            return Err(EngineError::InvalidArgument(format!(
                "cluster id {} out of range (k = {})",
                cluster, self.k
            )));
        }
        Ok(())
    }

    pub fn summary(&self, cluster: usize) -> Result<&ClusterSummary> {
        self.check_cluster(cluster)?;
        Ok(&self.summaries[cluster])
    }

    /// Label for one cluster, e.g. "Medium-priced, highly popular courses".
    pub fn describe(&self, cluster: usize) -> Result<String> {
        Ok(self.summary(cluster)?.label())
    }

    pub fn descriptions(&self) -> BTreeMap<usize, String> {
        self.summaries
            .iter()
            .map(|s| (s.cluster, s.label()))
            .collect()
    }

    /// Number of clustered courses per cluster id. Sums to the number of
    /// feature rows.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        for &c in &self.assignments {
            sizes[c] += 1;
        }
        sizes
    }

    /// Cluster of a catalog row, if it had complete features.
    pub fn cluster_of(&self, catalog_index: usize) -> Option<usize> {
        self.catalog_clusters.get(catalog_index).copied().flatten()
    }

    /// The `n` most subscribed courses of a cluster, ties in catalog order.
    ///
    /// `catalog` must be the catalog this model was fitted on.
    pub fn top_courses<'a>(
        &self,
        catalog: &'a Catalog,
        cluster: usize,
        n: usize,
    ) -> Result<Vec<&'a Course>> {
        self.check_cluster(cluster)?;
        if n == 0 {
            return Err(EngineError::InvalidArgument(
                "number of courses must be at least 1".to_string(),
            ));
        }
        if catalog.len() != self.catalog_len() {
            return Err(EngineError::InvalidArgument(format!(
                "model was fitted on {} courses, catalog has {}",
                self.catalog_len(),
                catalog.len()
            )));
        }

        let mut members: Vec<(usize, &Course)> = catalog
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.cluster_of(*idx) == Some(cluster))
            .collect();
        members.sort_by(|a, b| {
            b.1.num_subscribers
                .cmp(&a.1.num_subscribers)
                .then(a.0.cmp(&b.0))
        });
        Ok(members.into_iter().take(n).map(|(_, c)| c).collect())
    }

    /// Map a (price, subscribers) preference onto the nearest cluster.
    ///
    /// Every other feature is held at its training mean, which makes this an
    /// approximation: the answer depends on the scale of the features that
    /// are not set.
    pub fn predict_cluster(&self, price: f64, popularity: f64) -> Result<usize> {
        if !price.is_finite() || price < 0.0 {
            return Err(EngineError::InvalidArgument(format!(
                "price preference must be a non-negative number, got {}",
                price
            )));
        }
        if !popularity.is_finite() || popularity < 0.0 {
            return Err(EngineError::InvalidArgument(format!(
                "popularity preference must be a non-negative number, got {}",
                popularity
            )));
        }

        let mut row = self.training_means.clone();
        row[PRICE] = price;
        row[NUM_SUBSCRIBERS] = popularity;
        let scaled = self.scaler.transform_row(&row)?;
        let (cluster, _) = nearest_centroid(&scaled, self.centroids.rows());
        log::trace!(
            "predict_cluster(price={}, popularity={}) -> {}",
            price,
            popularity,
            cluster
        );
        Ok(cluster)
    }

    pub fn log_summary(&self) {
        log::info!(
            "Fitted {} clusters over {} courses ({} features), inertia {:.4}",
            self.k,
            self.assignments.len(),
            self.feature_names.len(),
            self.inertia
        );
        for summary in &self.summaries {
            match &summary.profile {
                Some(p) => log::debug!(
                    "  cluster {}: {} courses, mean price {:.2}, mean subscribers {:.0} ({})",
                    summary.cluster,
                    summary.size,
                    p.mean_price,
                    p.mean_subscribers,
                    summary.label()
                ),
                None => log::warn!("  cluster {} is empty", summary.cluster),
            }
        }
    }
}
