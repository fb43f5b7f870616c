use personalens_embed::vector::{dot, unit_mean};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::ClusterError;

/// Added to centroid norms before dividing.
const CENTROID_EPS: f64 = 1e-12;

/// Result of a k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeans {
    /// Effective cluster count after clamping.
    pub k: usize,
    /// Cluster id per input vector.
    pub assignments: Vec<usize>,
    /// Unit-length centroid per cluster.
    pub centroids: Vec<Vec<f32>>,
    /// Assignment passes performed.
    pub iterations: usize,
    /// True when the loop stopped because no assignment changed.
    pub converged: bool,
}

impl KMeans {
    /// Member indices per cluster, in input order.
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new(); self.k];
        for (i, &c) in self.assignments.iter().enumerate() {
            out[c].push(i);
        }
        out
    }
}

/// Partitions unit vectors into `k` groups by cosine similarity.
///
/// `k` is clamped to `[2, n]` (to `n` when fewer than two vectors exist).
/// Initial centroids are sampled without replacement from a generator
/// seeded with `seed`. Each pass assigns every vector to the centroid with
/// the largest dot product (first wins on ties), stops if nothing moved,
/// then recomputes centroids as re-normalized member means. An empty
/// cluster is re-seeded with a random input vector.
pub fn kmeans_cosine<V: AsRef<[f32]>>(
    vectors: &[V],
    k: usize,
    seed: u64,
    max_iterations: usize,
) -> Result<KMeans, ClusterError> {
    let n = vectors.len();
    let Some(first) = vectors.first() else {
        return Err(ClusterError::Empty);
    };
    let dim = first.as_ref().len();
    if let Some(bad) = vectors.iter().find(|v| v.as_ref().len() != dim) {
        return Err(ClusterError::DimensionMismatch {
            expected: dim,
            got: bad.as_ref().len(),
        });
    }

    let k = k.max(2).min(n);
    let max_iterations = max_iterations.max(1);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut centroids: Vec<Vec<f32>> = index::sample(&mut rng, n, k)
        .into_iter()
        .map(|i| vectors[i].as_ref().to_vec())
        .collect();
    let mut assignments = vec![usize::MAX; n];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iterations {
        iterations += 1;

        let mut changed = false;
        for (i, v) in vectors.iter().enumerate() {
            let best = nearest(v.as_ref(), &centroids);
            if assignments[i] != best {
                assignments[i] = best;
                changed = true;
            }
        }
        if !changed {
            converged = true;
            break;
        }

        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); k];
        for (i, &c) in assignments.iter().enumerate() {
            buckets[c].push(i);
        }
        for (c, bucket) in buckets.iter().enumerate() {
            if bucket.is_empty() {
                let pick = rng.gen_range(0..n);
                centroids[c] = vectors[pick].as_ref().to_vec();
                continue;
            }
            if let Some(mean) = unit_mean(
                bucket.iter().map(|&i| vectors[i].as_ref()),
                dim,
                CENTROID_EPS,
            ) {
                centroids[c] = mean;
            }
        }
    }

    debug!(n, k, iterations, converged, "kmeans finished");
    Ok(KMeans {
        k,
        assignments,
        centroids,
        iterations,
        converged,
    })
}

fn nearest(v: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best = 0;
    let mut best_sim = f64::NEG_INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let sim = dot(v, centroid);
        if sim > best_sim {
            best_sim = sim;
            best = c;
        }
    }
    best
}
