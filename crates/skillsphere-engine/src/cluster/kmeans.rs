//! Lloyd's K-means with k-means++ seeding and multiple restarts.
//!
//! Every restart draws from its own `StdRng` seeded with `seed + run`, so a
//! fit is fully reproducible for a fixed configuration and input. The run
//! with the lowest inertia is kept; on equal inertia the earliest run wins.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::{InitMethod, KMeansConfig};
use crate::error::{EngineError, Result};
use crate::math::{nearest_centroid, squared_distance, Array2};

#[derive(Debug, Clone)]
struct Run {
    centroids: Array2<f64>,
    labels: Vec<usize>,
    inertia: f64,
    n_iter: usize,
}

/// K-means estimator over a dense feature matrix.
#[derive(Debug, Clone)]
pub struct KMeans {
    n_clusters: usize,
    config: KMeansConfig,
    fitted: Option<Run>,
}

impl KMeans {
    pub fn new(n_clusters: usize, config: KMeansConfig) -> Self {
        Self {
            n_clusters,
            config,
            fitted: None,
        }
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        let (n, d) = x.shape();
        if self.n_clusters == 0 {
            return Err(EngineError::InvalidArgument(
                "number of clusters must be at least 1".to_string(),
            ));
        }
        if n < self.n_clusters || d == 0 {
            return Err(EngineError::InsufficientData {
                rows: n,
                required: self.n_clusters,
            });
        }

        let n_init = self.config.n_init.max(1);
        let mut best: Option<Run> = None;
        for run in 0..n_init {
            let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(run as u64));
            let result = lloyd(x, self.n_clusters, &self.config, &mut rng);
            log::trace!(
                "k-means run {}/{}: inertia {:.6} after {} iterations",
                run + 1,
                n_init,
                result.inertia,
                result.n_iter
            );
            let better = match &best {
                Some(current) => result.inertia < current.inertia,
                None => true,
            };
            if better {
                best = Some(result);
            }
        }

        if let Some(run) = &best {
            log::debug!(
                "k-means k={} on {} rows: best inertia {:.6} ({} iterations)",
                self.n_clusters,
                n,
                run.inertia,
                run.n_iter
            );
        }
        self.fitted = best;
        Ok(self)
    }

    fn fitted(&self) -> Result<&Run> {
        self.fitted.as_ref().ok_or(EngineError::NotFitted)
    }

    pub fn centroids(&self) -> Result<&Array2<f64>> {
        Ok(&self.fitted()?.centroids)
    }

    /// Cluster of every training row.
    pub fn labels(&self) -> Result<&[usize]> {
        Ok(&self.fitted()?.labels)
    }

    /// Sum of squared distances of training rows to their centroid.
    pub fn inertia(&self) -> Result<f64> {
        Ok(self.fitted()?.inertia)
    }

    pub fn n_iter(&self) -> Result<usize> {
        Ok(self.fitted()?.n_iter)
    }

    pub fn predict_row(&self, row: &[f64]) -> Result<usize> {
        let centroids = self.centroids()?;
        if row.len() != centroids.ncols() {
            return Err(EngineError::InvalidArgument(format!(
                "expected {} features, got {}",
                centroids.ncols(),
                row.len()
            )));
        }
        Ok(nearest_centroid(row, centroids.rows()).0)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        let centroids = self.centroids()?;
        if x.ncols() != centroids.ncols() {
            return Err(EngineError::InvalidArgument(format!(
                "expected {} features, got {}",
                centroids.ncols(),
                x.ncols()
            )));
        }
        Ok(assign(x, centroids).into_iter().map(|(c, _)| c).collect())
    }
}

/// Nearest centroid and squared distance for every row.
fn assign(x: &Array2<f64>, centroids: &Array2<f64>) -> Vec<(usize, f64)> {
    (0..x.nrows())
        .into_par_iter()
        .map(|i| nearest_centroid(x.row(i), centroids.rows()))
        .collect()
}

fn lloyd(x: &Array2<f64>, k: usize, config: &KMeansConfig, rng: &mut StdRng) -> Run {
    let mut centroids = match config.init {
        InitMethod::KMeansPlusPlus => init_plus_plus(x, k, rng),
        InitMethod::Random => init_random(x, k, rng),
    };
    let mut assignment = assign(x, &centroids);
    let mut n_iter = 0;

    for iter in 0..config.max_iter {
        let updated = update_centroids(x, k, &mut assignment);
        let shift: f64 = centroids
            .rows()
            .zip(updated.rows())
            .map(|(a, b)| squared_distance(a, b))
            .sum();
        centroids = updated;
        assignment = assign(x, &centroids);
        n_iter = iter + 1;
        if shift <= config.tolerance {
            break;
        }
    }

    let inertia = assignment.iter().map(|(_, d)| d).sum();
    let labels = assignment.into_iter().map(|(c, _)| c).collect();
    Run {
        centroids,
        labels,
        inertia,
        n_iter,
    }
}

/// Recompute centroids as member means.
///
/// An empty cluster takes over the point farthest from its current centroid;
/// that point is relabelled so the next update sees a non-empty cluster.
fn update_centroids(x: &Array2<f64>, k: usize, assignment: &mut [(usize, f64)]) -> Array2<f64> {
    let d = x.ncols();
    let mut sums = Array2::<f64>::zeros(k, d);
    let mut counts = vec![0usize; k];
    for (row, &(cluster, _)) in x.rows().zip(assignment.iter()) {
        counts[cluster] += 1;
        for (s, v) in sums.row_mut(cluster).iter_mut().zip(row) {
            *s += v;
        }
    }

    for cluster in 0..k {
        if counts[cluster] > 0 {
            continue;
        }
        let farthest = assignment
            .iter()
            .enumerate()
            .filter(|(_, (owner, _))| counts[*owner] > 1)
            .fold(None, |acc: Option<(usize, f64)>, (i, &(_, dist))| match acc {
                Some((_, best)) if dist <= best => acc,
                _ => Some((i, dist)),
            });
        let Some((point, _)) = farthest else {
            continue;
        };
        let owner = assignment[point].0;
        counts[owner] -= 1;
        for (s, v) in sums.row_mut(owner).iter_mut().zip(x.row(point)) {
            *s -= v;
        }
        sums.row_mut(cluster).copy_from_slice(x.row(point));
        counts[cluster] = 1;
        assignment[point] = (cluster, 0.0);
        log::trace!("Re-seeded empty cluster {} with row {}", cluster, point);
    }

    for (cluster, &count) in counts.iter().enumerate() {
        if count > 0 {
            let n = count as f64;
            for s in sums.row_mut(cluster) {
                *s /= n;
            }
        }
    }
    sums
}

fn init_random(x: &Array2<f64>, k: usize, rng: &mut StdRng) -> Array2<f64> {
    let picks = rand::seq::index::sample(rng, x.nrows(), k).into_vec();
    x.select_rows(&picks)
}

/// k-means++: each further seed is drawn with probability proportional to
/// its squared distance from the nearest seed chosen so far.
fn init_plus_plus(x: &Array2<f64>, k: usize, rng: &mut StdRng) -> Array2<f64> {
    let n = x.nrows();
    let mut picks = Vec::with_capacity(k);
    picks.push(rng.gen_range(0..n));

    let mut closest: Vec<f64> = x
        .rows()
        .map(|row| squared_distance(row, x.row(picks[0])))
        .collect();

    while picks.len() < k {
        let total: f64 = closest.iter().sum();
        let next = if total > 0.0 && total.is_finite() {
            let target = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut chosen = None;
            for (i, &dist) in closest.iter().enumerate() {
                cumulative += dist;
                if dist > 0.0 && cumulative > target {
                    chosen = Some(i);
                    break;
                }
            }
            chosen.or_else(|| closest.iter().rposition(|&dist| dist > 0.0))
        } else {
            None
        };
        // All remaining points coincide with a seed: fall back to any unused row.
        let next = match next {
            Some(i) => i,
            None => (0..n).find(|i| !picks.contains(i)).unwrap_or(0),
        };
        picks.push(next);
        let seed = x.row(next);
        for (dist, row) in closest.iter_mut().zip(x.rows()) {
            let d = squared_distance(row, seed);
            if d < *dist {
                *dist = d;
            }
        }
    }

    x.select_rows(&picks)
}
