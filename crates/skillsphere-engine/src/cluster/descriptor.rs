//! Human-readable cluster labels.
//!
//! A label is derived from the cluster's mean price and mean subscriber
//! count, each bucketed into three tiers, e.g. "Low-priced, niche courses".
use std::fmt;

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::config::DescriptorThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriceTier {
    Low,
    Medium,
    High,
}

impl PriceTier {
    pub fn from_mean(mean_price: f64, thresholds: &DescriptorThresholds) -> Self {
        if mean_price < thresholds.low_price {
            PriceTier::Low
        } else if mean_price < thresholds.medium_price {
            PriceTier::Medium
        } else {
            PriceTier::High
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PriceTier::Low => "Low-priced",
            PriceTier::Medium => "Medium-priced",
            PriceTier::High => "High-priced",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PopularityTier {
    Niche,
    Moderate,
    High,
}

impl PopularityTier {
    pub fn from_mean(mean_subscribers: f64, thresholds: &DescriptorThresholds) -> Self {
        if mean_subscribers < thresholds.niche_subscribers {
            PopularityTier::Niche
        } else if mean_subscribers < thresholds.moderate_subscribers {
            PopularityTier::Moderate
        } else {
            PopularityTier::High
        }
    }
}

impl fmt::Display for PopularityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PopularityTier::Niche => "niche",
            PopularityTier::Moderate => "moderately popular",
            PopularityTier::High => "highly popular",
        };
        write!(f, "{}", label)
    }
}

/// Mean price and popularity of a non-empty cluster, with their tiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterProfile {
    pub mean_price: f64,
    pub mean_subscribers: f64,
    pub price_tier: PriceTier,
    pub popularity_tier: PopularityTier,
}

/// Per-cluster statistics in the original (unscaled) units.
///
/// `profile` is `None` when no course ended up in the cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub cluster: usize,
    pub size: usize,
    pub profile: Option<ClusterProfile>,
}

pub const EMPTY_CLUSTER_LABEL: &str = "Empty cluster";

impl ClusterSummary {
    /// Summarize one cluster from its members' prices and subscriber counts.
    pub fn from_members(
        cluster: usize,
        prices: &[f64],
        subscribers: &[f64],
        thresholds: &DescriptorThresholds,
    ) -> Self {
        let profile = if prices.is_empty() || subscribers.is_empty() {
            None
        } else {
            let mean_price = prices.iter().mean();
            let mean_subscribers = subscribers.iter().mean();
            Some(ClusterProfile {
                mean_price,
                mean_subscribers,
                price_tier: PriceTier::from_mean(mean_price, thresholds),
                popularity_tier: PopularityTier::from_mean(mean_subscribers, thresholds),
            })
        };
        Self {
            cluster,
            size: prices.len(),
            profile,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.profile.is_none()
    }

    pub fn label(&self) -> String {
        match &self.profile {
            Some(p) => format!("{}, {} courses", p.price_tier, p.popularity_tier),
            None => EMPTY_CLUSTER_LABEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_use_half_open_buckets() {
        let t = DescriptorThresholds::default();
        assert_eq!(PriceTier::from_mean(19.99, &t), PriceTier::Low);
        assert_eq!(PriceTier::from_mean(20.0, &t), PriceTier::Medium);
        assert_eq!(PriceTier::from_mean(80.0, &t), PriceTier::High);
        assert_eq!(PopularityTier::from_mean(9_999.0, &t), PopularityTier::Niche);
        assert_eq!(PopularityTier::from_mean(10_000.0, &t), PopularityTier::Moderate);
        assert_eq!(PopularityTier::from_mean(50_000.0, &t), PopularityTier::High);
    }

    #[test]
    fn label_reads_naturally() {
        let t = DescriptorThresholds::default();
        let summary = ClusterSummary::from_members(0, &[10.0, 20.0], &[500.0, 1500.0], &t);
        assert_eq!(summary.size, 2);
        assert_eq!(summary.label(), "Low-priced, niche courses");

        let popular = ClusterSummary::from_members(1, &[150.0], &[120_000.0], &t);
        assert_eq!(popular.label(), "High-priced, highly popular courses");
    }

    #[test]
    fn empty_cluster_has_no_tiers() {
        let t = DescriptorThresholds::default();
        let empty = ClusterSummary::from_members(2, &[], &[], &t);
        assert!(empty.is_empty());
        assert_eq!(empty.size, 0);
        assert_eq!(empty.profile, None);
        assert_eq!(empty.label(), "Empty cluster");
    }
}
