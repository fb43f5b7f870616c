//! PersonaLens analyzers.
//!
//! Each analyzer takes an embedding provider by reference plus its
//! request data and returns `Result<Outcome<Report>, AnalyzeError>`:
//!
//! - `Ok(Outcome::Ready(report))` serializes as `{"ok": true, ...}`.
//! - `Ok(Outcome::Insufficient(msg))` serializes as `{"ok": false, "error": msg}`
//!   and covers expected conditions such as fewer than two usable texts.
//! - `Err(_)` is reserved for malformed input (an unparsable date) and
//!   provider failures.
//!
//! | Analyzer | Input |
//! |----------|-------|
//! | [`analyze_text_drift`] | texts |
//! | [`analyze_text_timeline`] | dated texts |
//! | [`analyze_text_reasons`] | texts, optional subset |
//! | [`analyze_text_clusters`] | texts |
//! | [`analyze_audio_shift`] | mono samples |
//! | [`analyze_video_shift`] | timestamped frames |
//!
//! Reported numbers are rounded for presentation; the computations run at
//! full precision.

mod audio;
mod clusters;
mod config;
mod embedding;
mod error;
mod outcome;
mod reasons;
mod round;
mod text_drift;
mod timeline;
mod video;

pub use audio::{
    analyze_audio_shift, AudioBaseline, AudioConfigEcho, AudioFeatures, AudioSegment,
    AudioShiftReport, AudioSummary, AudioZ, EmbeddingBaseline, EmbeddingChannel, AUDIO_DISCLAIMER,
    AUDIO_MODE,
};
pub use clusters::{analyze_text_clusters, ClusterEntry, ClusterItem, ClustersReport};
pub use config::{AudioShiftConfig, TimelineConfig, VideoShiftConfig};
pub use error::AnalyzeError;
pub use outcome::Outcome;
pub use reasons::{analyze_text_reasons, ReasonItem, ReasonsAnomaly, ReasonsReport};
pub use text_drift::{analyze_text_drift, TextDriftReport};
pub use timeline::{
    analyze_text_timeline, PairwiseDrift, TimelineAnomaly, TimelineBaseline, TimelineItem,
    TimelineReport, WindowDrift,
};
pub use video::{
    analyze_video_shift, TimedFrame, VideoBaseline, VideoMeta, VideoModelInfo, VideoParams,
    VideoSegment, VideoShiftReport, VideoSummary, VIDEO_DISCLAIMER,
};

/// Numerical floor for analyzers that take no [`personalens_drift::DriftConfig`].
const EPS: f64 = 1e-8;
