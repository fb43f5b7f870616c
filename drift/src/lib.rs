//! Baseline-relative drift and anomaly scoring.
//!
//! The pipeline runs strictly forward:
//!
//! 1. [`segment`] splits a signal, an ordered item list or a timestamped
//!    frame list into [`Segment`]s.
//! 2. [`baseline`] picks the reference segments by coverage and computes
//!    per-channel [`ChannelStats`] or a [`CentroidStats`] for vectors.
//! 3. [`scoring`] turns raw values into |z| deviations, averages them per
//!    [`Modality`], fuses two modalities with `alpha` and summarizes the
//!    result.
//!
//! [`centroid`] covers sets that have no temporal baseline: every item is
//! compared to the centroid of the whole set.
//!
//! Everything here is pure and synchronous. Insufficient input never
//! panics; callers decide how to report it.

pub mod baseline;
pub mod centroid;
pub mod config;
pub mod error;
pub mod scoring;
pub mod segment;
pub mod stats;

pub use baseline::{
    centroid_stats, channel_stats, select_baseline, BaselineSelection, CentroidStats,
    ChannelStats, DEGRADED_BASELINE_WARNING,
};
pub use centroid::{drift_score, outlier_indices, similarity_set, SimilaritySet, OUTLIER_STD_FACTOR};
pub use config::DriftConfig;
pub use error::DriftError;
pub use scoring::{
    attribute, consistency_score, percentile_vs_baseline, score, summarize, AnomalyRecord,
    Attribution, Modality, ScoredChannel, Secondary, Summary,
};
pub use segment::{
    ordered_windows, parse_date, segment_signal, timestamp_windows, window_units, Segment,
};
