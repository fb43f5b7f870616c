//! Comparison of a flat set of vectors against its own centroid.

use personalens_embed::vector::{dot, unit_mean};
use serde::Serialize;

use crate::error::DriftError;
use crate::stats::{mean, sample_std};

/// Similarities below `mean - OUTLIER_STD_FACTOR * std` are outliers.
pub const OUTLIER_STD_FACTOR: f64 = 1.25;

/// Similarity of each vector to the set's centroid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilaritySet {
    #[serde(skip)]
    pub centroid: Vec<f32>,
    pub similarities: Vec<f64>,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation of the similarities.
    pub std: f64,
    pub drift_score: f64,
    /// Positions (within this set) of the outliers.
    pub outliers: Vec<usize>,
}

/// Builds the centroid of `vectors` and scores every member against it.
///
/// Vectors must be unit length. Returns `Ok(None)` for an empty set.
pub fn similarity_set<V: AsRef<[f32]>>(vectors: &[V], eps: f64) -> Result<Option<SimilaritySet>, DriftError> {
    let Some(first) = vectors.first() else {
        return Ok(None);
    };
    let dim = first.as_ref().len();
    if let Some(bad) = vectors.iter().find(|v| v.as_ref().len() != dim) {
        return Err(DriftError::DimensionMismatch {
            expected: dim,
            got: bad.as_ref().len(),
        });
    }
    let Some(centroid) = unit_mean(vectors.iter().map(AsRef::as_ref), dim, eps) else {
        return Ok(None);
    };

    let similarities: Vec<f64> = vectors.iter().map(|v| dot(v.as_ref(), &centroid)).collect();
    let mean_sim = mean(&similarities);
    let std_sim = sample_std(&similarities);
    let min = similarities.iter().copied().fold(f64::INFINITY, f64::min);
    let max = similarities.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let outliers = outlier_indices(&similarities, mean_sim, std_sim);

    Ok(Some(SimilaritySet {
        centroid,
        drift_score: drift_score(mean_sim),
        similarities,
        mean: mean_sim,
        min,
        max,
        std: std_sim,
        outliers,
    }))
}

/// Indices whose similarity falls below `mean - 1.25 * std`.
pub fn outlier_indices(similarities: &[f64], mean: f64, std: f64) -> Vec<usize> {
    let threshold = mean - OUTLIER_STD_FACTOR * std;
    similarities
        .iter()
        .enumerate()
        .filter(|&(_, &s)| s < threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Maps a mean similarity to a 0..100 drift score; identical sets score 0.
pub fn drift_score(mean_similarity: f64) -> f64 {
    ((1.0 - mean_similarity) * 100.0).clamp(0.0, 100.0)
}
