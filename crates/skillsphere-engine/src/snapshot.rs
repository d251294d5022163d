//! Immutable catalog snapshots and the store that publishes them.
//!
//! Every query runs against one `CatalogSnapshot`: a catalog, its similarity
//! index and optionally a fitted cluster model. Snapshots are never mutated.
//! Reloading the catalog or refitting clusters builds a new snapshot and
//! swaps it into the store, so readers holding the previous `Arc` keep a
//! coherent view.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, TryLockError};
use std::time::Instant;

use crate::catalog::{Catalog, Course};
use crate::cluster::{fit_clusters, ClusterModel};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::recommend::{recommend, recommend_for_skills, Recommendation, RecommendationSet};
use crate::similarity::SimilarityIndex;

#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    version: u64,
    catalog: Arc<Catalog>,
    index: Arc<SimilarityIndex>,
    clusters: Option<Arc<ClusterModel>>,
}

impl CatalogSnapshot {
    /// Index a catalog. The snapshot starts without a cluster model.
    pub fn build(catalog: Catalog, version: u64) -> Self {
        let start = Instant::now();
        let index = SimilarityIndex::build(&catalog);
        log::debug!(
            "Snapshot v{}: indexed {} courses in {:?}",
            version,
            catalog.len(),
            start.elapsed()
        );
        Self {
            version,
            catalog: Arc::new(catalog),
            index: Arc::new(index),
            clusters: None,
        }
    }

    /// A new snapshot sharing this catalog and index, with `model` attached.
    pub fn with_clusters(&self, model: ClusterModel, version: u64) -> Self {
        Self {
            version,
            catalog: Arc::clone(&self.catalog),
            index: Arc::clone(&self.index),
            clusters: Some(Arc::new(model)),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    pub fn has_clusters(&self) -> bool {
        self.clusters.is_some()
    }

    pub fn clusters(&self) -> Result<&ClusterModel> {
        self.clusters.as_deref().ok_or(EngineError::NotFitted)
    }

    pub fn recommend(&self, query: &str, limit: usize) -> Result<RecommendationSet> {
        recommend(&self.catalog, &self.index, query, limit)
    }

    pub fn recommend_for_skills<S: AsRef<str>>(
        &self,
        skills: &[S],
        limit: usize,
    ) -> Result<Vec<Recommendation>> {
        recommend_for_skills(&self.catalog, &self.index, skills, limit)
    }

    pub fn describe(&self, cluster: usize) -> Result<String> {
        self.clusters()?.describe(cluster)
    }

    pub fn top_courses(&self, cluster: usize, n: usize) -> Result<Vec<&Course>> {
        self.clusters()?.top_courses(&self.catalog, cluster, n)
    }

    pub fn predict_cluster(&self, price: f64, popularity: f64) -> Result<usize> {
        self.clusters()?.predict_cluster(price, popularity)
    }
}

/// Holder of the current snapshot.
///
/// Reads take a clone of the current `Arc`. At most one cluster fit runs at
/// a time; a second `refit` while one is running fails with `FitInProgress`.
pub struct SnapshotStore {
    config: EngineConfig,
    current: RwLock<Arc<CatalogSnapshot>>,
    fit_lock: Mutex<()>,
    next_version: AtomicU64,
}

impl SnapshotStore {
    pub fn new(catalog: Catalog, config: EngineConfig) -> Self {
        let snapshot = CatalogSnapshot::build(catalog, 1);
        Self {
            config,
            current: RwLock::new(Arc::new(snapshot)),
            fit_lock: Mutex::new(()),
            next_version: AtomicU64::new(2),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current(&self) -> Arc<CatalogSnapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    fn publish(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        let snapshot = Arc::new(snapshot);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::clone(&snapshot);
        log::info!("Published catalog snapshot v{}", snapshot.version());
        snapshot
    }

    fn bump_version(&self) -> u64 {
        self.next_version.fetch_add(1, Ordering::SeqCst)
    }

    /// Replace the catalog. The new snapshot has no cluster model.
    pub fn reload(&self, catalog: Catalog) -> Arc<CatalogSnapshot> {
        let snapshot = CatalogSnapshot::build(catalog, self.bump_version());
        self.publish(snapshot)
    }

    /// Fit `k` clusters against the current catalog and publish the result.
    ///
    /// If the catalog is reloaded while the fit runs, the fitted snapshot is
    /// returned to the caller but not published.
    pub fn refit(&self, k: usize) -> Result<Arc<CatalogSnapshot>> {
        let _fit_guard = match self.fit_lock.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(EngineError::FitInProgress),
            Err(TryLockError::Poisoned(e)) => e.into_inner(),
        };

        let base = self.current();
        let start = Instant::now();
        let model = fit_clusters(base.catalog(), k, &self.config)?;
        log::info!(
            "Fitted {} clusters on snapshot v{} in {:?}",
            k,
            base.version(),
            start.elapsed()
        );
        let fitted = base.with_clusters(model, self.bump_version());

        let unchanged = Arc::ptr_eq(&self.current().catalog, &base.catalog);
        if unchanged {
            Ok(self.publish(fitted))
        } else {
            log::warn!(
                "Catalog changed during the cluster fit; snapshot v{} not published",
                fitted.version()
            );
            Ok(Arc::new(fitted))
        }
    }
}
