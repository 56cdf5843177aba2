//! K-Means clustering.
//!
//! Lloyd iterations from k-means++ seeds, best of `n_init` restarts.

use super::{Result, SegmentationError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, warn};

/// K-Means clustering.
///
/// # Example
///
/// ```
/// use bizlens_core::segmentation::KMeans;
///
/// let points = vec![
///     vec![1.0, 1.0],
///     vec![1.2, 0.8],
///     vec![9.0, 9.0],
///     vec![9.1, 8.7],
/// ];
///
/// let fit = KMeans::new(2).with_random_state(42).fit(&points).unwrap();
/// assert_eq!(fit.labels[0], fit.labels[1]);
/// assert_ne!(fit.labels[0], fit.labels[2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KMeans {
    n_clusters: usize,
    n_init: usize,
    max_iter: usize,
    tol: f64,
    random_state: u64,
}

/// Result of a K-Means fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KMeansFit {
    pub centroids: Vec<Vec<f64>>,
    /// Cluster index per input point.
    pub labels: Vec<usize>,
    /// Sum of squared distances to the assigned centroid.
    pub inertia: f64,
    /// Iterations used by the winning run.
    pub n_iter: usize,
}

impl KMeans {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            n_init: 10,
            max_iter: 300,
            tol: 1e-4,
            random_state: 0,
        }
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Stop once no centroid moves more than `tol` times the mean feature
    /// variance of the input (squared distance), so the threshold follows
    /// the scale of the data.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Clusters `points` and returns the lowest-inertia run.
    pub fn fit(&self, points: &[Vec<f64>]) -> Result<KMeansFit> {
        if self.n_clusters == 0 || self.n_init == 0 {
            return Err(SegmentationError::InvalidParameter(
                "n_clusters and n_init must be at least 1".into(),
            ));
        }
        if points.len() < self.n_clusters {
            return Err(SegmentationError::NotEnoughPoints {
                clusters: self.n_clusters,
                points: points.len(),
            });
        }
        let dim = points[0].len();
        if let Some(bad) = points.iter().find(|p| p.len() != dim) {
            return Err(SegmentationError::DimensionMismatch {
                expected: dim,
                found: bad.len(),
            });
        }

        let tol = scaled_tolerance(points, self.tol);
        let mut rng = StdRng::seed_from_u64(self.random_state);
        let mut best: Option<KMeansFit> = None;

        for run in 0..self.n_init {
            let fit = self.run_once(points, tol, &mut rng);
            debug!(run, inertia = fit.inertia, n_iter = fit.n_iter, "K-Means run finished");
            if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }

        best.ok_or_else(|| SegmentationError::InvalidParameter("no K-Means run completed".into()))
    }

    /// Convenience for `fit(points)?.labels`.
    pub fn fit_predict(&self, points: &[Vec<f64>]) -> Result<Vec<usize>> {
        Ok(self.fit(points)?.labels)
    }

    fn run_once(&self, points: &[Vec<f64>], tol: f64, rng: &mut StdRng) -> KMeansFit {
        let mut centroids = kmeans_plus_plus_init(points, self.n_clusters, rng);
        let mut labels = assign(points, &centroids);
        let mut n_iter = 0;

        for _ in 0..self.max_iter {
            n_iter += 1;
            let updated = compute_centroids(points, &labels, &centroids);
            let shift = centroids
                .iter()
                .zip(&updated)
                .map(|(a, b)| squared_distance(a, b))
                .fold(0.0, f64::max);

            centroids = updated;
            labels = assign(points, &centroids);
            if shift <= tol {
                break;
            }
        }

        let inertia = points
            .iter()
            .zip(&labels)
            .map(|(p, &l)| squared_distance(p, &centroids[l]))
            .sum();

        KMeansFit {
            centroids,
            labels,
            inertia,
            n_iter,
        }
    }
}

/// `tol` multiplied by the mean per-feature variance of `points`.
fn scaled_tolerance(points: &[Vec<f64>], tol: f64) -> f64 {
    let dim = points.first().map_or(0, Vec::len);
    if dim == 0 {
        return 0.0;
    }

    let n = points.len() as f64;
    let total_variance: f64 = (0..dim)
        .map(|d| {
            let mean = points.iter().map(|p| p[d]).sum::<f64>() / n;
            points.iter().map(|p| (p[d] - mean).powi(2)).sum::<f64>() / n
        })
        .sum();

    tol * total_variance / dim as f64
}

pub(crate) fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Seeds centroids with probability proportional to squared distance from
/// the nearest centroid chosen so far.
fn kmeans_plus_plus_init(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())].clone());

    let mut min_distances = vec![f64::MAX; points.len()];
    while centroids.len() < k {
        if let Some(last) = centroids.last() {
            for (d, p) in min_distances.iter_mut().zip(points) {
                *d = d.min(squared_distance(p, last));
            }
        }

        let total: f64 = min_distances.iter().sum();
        let next = if total == 0.0 {
            // Every point sits on a centroid already.
            rng.gen_range(0..points.len())
        } else {
            let mut target = rng.gen_range(0.0..total);
            let mut chosen = points.len() - 1;
            for (i, d) in min_distances.iter().enumerate() {
                if target < *d {
                    chosen = i;
                    break;
                }
                target -= d;
            }
            chosen
        };
        centroids.push(points[next].clone());
    }

    centroids
}

fn assign(points: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    points
        .iter()
        .map(|p| {
            centroids
                .iter()
                .enumerate()
                .map(|(i, c)| (i, squared_distance(p, c)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(i, _)| i)
                .unwrap_or(0)
        })
        .collect()
}

/// Mean of the points in each cluster. An empty cluster keeps its centroid.
fn compute_centroids(points: &[Vec<f64>], labels: &[usize], previous: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let dim = previous.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0; dim]; previous.len()];
    let mut counts = vec![0usize; previous.len()];

    for (p, &l) in points.iter().zip(labels) {
        counts[l] += 1;
        for (s, v) in sums[l].iter_mut().zip(p) {
            *s += v;
        }
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (sum, count))| {
            if count == 0 {
                warn!(cluster = i, "Empty cluster, keeping previous centroid");
                previous[i].clone()
            } else {
                sum.into_iter().map(|s| s / count as f64).collect()
            }
        })
        .collect()
}
