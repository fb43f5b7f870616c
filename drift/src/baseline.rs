//! Baseline selection and per-channel reference statistics.

use personalens_embed::vector::{dot, unit_mean};
use serde::Serialize;
use tracing::warn;

use crate::error::DriftError;
use crate::segment::Segment;
use crate::stats::{mean, population_std};

/// Warning recorded when the coverage rule finds fewer than two segments.
pub const DEGRADED_BASELINE_WARNING: &str =
    "Baseline too short; using first available segments as baseline.";

/// The reference segments of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineSelection {
    pub indices: Vec<usize>,
    /// True when the coverage rule fell back to the first segments.
    pub degraded: bool,
}

impl BaselineSelection {
    /// The warning to surface, if any.
    pub fn warning(&self) -> Option<&'static str> {
        self.degraded.then_some(DEGRADED_BASELINE_WARNING)
    }
}

/// Selects segments whose end lies within `span` native units of the start.
///
/// With fewer than two qualifying segments the first `min(2, len)` are used
/// instead and the selection is marked degraded.
pub fn select_baseline<P>(segments: &[Segment<P>], span: usize) -> BaselineSelection {
    let indices: Vec<usize> = segments
        .iter()
        .enumerate()
        .filter(|(_, s)| s.end <= span)
        .map(|(i, _)| i)
        .collect();
    if indices.len() >= 2 {
        return BaselineSelection {
            indices,
            degraded: false,
        };
    }
    warn!(
        qualified = indices.len(),
        segments = segments.len(),
        span,
        "baseline too short, falling back to first segments"
    );
    BaselineSelection {
        indices: (0..segments.len().min(2)).collect(),
        degraded: true,
    }
}

/// Mean and standard deviation of one scalar channel.
///
/// `std` already includes the stability epsilon, so [`ChannelStats::zscore`]
/// never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelStats {
    pub mean: f64,
    pub std: f64,
}

impl ChannelStats {
    pub fn zscore(&self, value: f64) -> f64 {
        (value - self.mean) / self.std
    }
}

/// Computes channel statistics over the baseline.
///
/// Absent values (`None`, e.g. an undetected pitch) are skipped. When the
/// baseline holds fewer than two present values the whole sequence is used;
/// when nothing is present the result is `(0, eps)`.
pub fn channel_stats(values: &[Option<f64>], baseline: &[usize], eps: f64) -> ChannelStats {
    let mut picked: Vec<f64> = baseline
        .iter()
        .filter_map(|&i| values.get(i).copied().flatten())
        .collect();
    if picked.len() < 2 {
        picked = values.iter().flatten().copied().collect();
    }
    if picked.is_empty() {
        return ChannelStats { mean: 0.0, std: eps };
    }
    ChannelStats {
        mean: mean(&picked),
        std: population_std(&picked) + eps,
    }
}

/// Baseline centroid of a vector channel and each vector's distance to it.
#[derive(Debug, Clone)]
pub struct CentroidStats {
    /// Unit-length mean of the baseline vectors.
    pub centroid: Vec<f32>,
    /// `1 - cosine similarity` to the centroid, one per vector.
    pub distances: Vec<f64>,
    /// Distance statistics over the baseline vectors only.
    pub stats: ChannelStats,
}

/// Computes the baseline centroid and distance statistics.
///
/// Vectors must be unit length so the dot product is the cosine similarity.
pub fn centroid_stats(
    vectors: &[Vec<f32>],
    baseline: &[usize],
    eps: f64,
) -> Result<CentroidStats, DriftError> {
    if baseline.is_empty() {
        return Err(DriftError::EmptyBaseline);
    }
    let dim = vectors.first().map(Vec::len).unwrap_or(0);
    for v in vectors {
        if v.len() != dim {
            return Err(DriftError::DimensionMismatch {
                expected: dim,
                got: v.len(),
            });
        }
    }
    for &i in baseline {
        if i >= vectors.len() {
            return Err(DriftError::IndexOutOfRange {
                index: i,
                len: vectors.len(),
            });
        }
    }

    let centroid = unit_mean(baseline.iter().map(|&i| vectors[i].as_slice()), dim, eps)
        .ok_or(DriftError::EmptyBaseline)?;
    let distances: Vec<f64> = vectors.iter().map(|v| 1.0 - dot(v, &centroid)).collect();
    let base: Vec<f64> = baseline.iter().map(|&i| distances[i]).collect();
    let stats = ChannelStats {
        mean: mean(&base),
        std: population_std(&base) + eps,
    };

    Ok(CentroidStats {
        centroid,
        distances,
        stats,
    })
}
