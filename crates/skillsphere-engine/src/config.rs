use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::catalog::CatalogReaderConfig;

/// Central configuration for the engine.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub n_clusters: usize,
    pub recommend_limit: usize,
    pub kmeans: KMeansConfig,
    pub descriptor: DescriptorThresholds,
    pub catalog: CatalogReaderConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            n_clusters: 4,
            recommend_limit: 5,
            kmeans: KMeansConfig::default(),
            descriptor: DescriptorThresholds::default(),
            catalog: CatalogReaderConfig::default(),
        }
    }
}

/// Hyper-parameters for a K-means run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct KMeansConfig {
    /// Number of independent initializations; the lowest inertia wins.
    pub n_init: usize,
    pub max_iter: usize,
    /// Convergence threshold on the total squared centroid shift.
    pub tolerance: f64,
    pub seed: u64,
    pub init: InitMethod,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            n_init: 10,
            max_iter: 300,
            tolerance: 1e-4,
            seed: 42,
            init: InitMethod::KMeansPlusPlus,
        }
    }
}

/// Centroid seeding strategy.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InitMethod {
    #[default]
    KMeansPlusPlus,
    Random,
}

impl FromStr for InitMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "kmeans++" | "k_means++" | "kmeans_plus_plus" | "k_means_plus_plus" => Ok(InitMethod::KMeansPlusPlus),
            "random" => Ok(InitMethod::Random),
            _ => Err(format!(
                "Unknown init method: {}. Expected one of: kmeans++, random",
                s
            )),
        }
    }
}

/// Bucket boundaries used to turn a cluster's mean price and mean
/// subscriber count into a human readable label.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DescriptorThresholds {
    /// Mean price below this is "Low-priced".
    pub low_price: f64,
    /// Mean price below this (and at least `low_price`) is "Medium-priced".
    pub medium_price: f64,
    /// Mean subscribers below this is "niche".
    pub niche_subscribers: f64,
    /// Mean subscribers below this (and at least `niche_subscribers`) is
    /// "moderately popular".
    pub moderate_subscribers: f64,
}

impl Default for DescriptorThresholds {
    fn default() -> Self {
        Self {
            low_price: 20.0,
            medium_price: 80.0,
            niche_subscribers: 10_000.0,
            moderate_subscribers: 50_000.0,
        }
    }
}
