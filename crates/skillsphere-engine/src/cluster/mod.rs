//! Price/popularity clustering of the catalog.
pub mod descriptor;
pub mod kmeans;
pub mod model;

pub use descriptor::{ClusterProfile, ClusterSummary, PopularityTier, PriceTier};
pub use kmeans::KMeans;
pub use model::{elbow, fit_clusters, ClusterModel};
