//! skillsphere-engine: course recommendation and catalog clustering.
//!
//! This crate loads a tabular course catalog, builds a tf-idf similarity
//! index over course titles to answer "courses like this skill" queries, and
//! partitions the catalog into price/popularity groups with K-means so that
//! preference sliders can be mapped onto a cluster.
//!
//! All query state lives in immutable snapshots (`snapshot::CatalogSnapshot`);
//! rebuilding the index or refitting clusters produces a new snapshot instead
//! of mutating the old one.
pub mod catalog;
pub mod cluster;
pub mod config;
pub mod error;
pub mod features;
pub mod math;
pub mod preprocessing;
pub mod recommend;
pub mod report;
pub mod similarity;
pub mod snapshot;
pub mod text;

pub use catalog::{Catalog, CatalogSource, Course, Level};
pub use cluster::{fit_clusters, ClusterModel, KMeans};
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use recommend::{recommend, recommend_for_skills, MatchTier, Recommendation, RecommendationSet};
pub use similarity::SimilarityIndex;
pub use snapshot::{CatalogSnapshot, SnapshotStore};
