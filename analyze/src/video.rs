//! Baseline-relative visual shift over timestamped frames.

use personalens_drift::{
    centroid_stats, score, select_baseline, summarize, timestamp_windows, Modality, ScoredChannel,
    Secondary,
};
use personalens_embed::{uniform_pick, Embedder, Frame, Payload};
use serde::Serialize;
use tracing::debug;

use crate::config::VideoShiftConfig;
use crate::embedding::embed_payloads;
use crate::error::AnalyzeError;
use crate::outcome::Outcome;
use crate::round::round;

pub const VIDEO_DISCLAIMER: &str = "PersonaLens visual shift surfaces baseline-relative delivery/anomaly signals. It is not a lie detector, not medical, and does not verify truth.";

/// A decoded frame and its presentation time in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedFrame {
    pub time: f64,
    pub frame: Frame,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoModelInfo {
    pub name: String,
    pub frames_per_segment: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoParams {
    pub window_sec: f64,
    pub hop_sec: f64,
    pub baseline_sec: f64,
    pub spike_threshold: f64,
    pub max_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMeta {
    pub frames: usize,
    pub dropped_frames: usize,
    pub duration_sec: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoBaseline {
    pub segment_indices: Vec<usize>,
    pub dist_mean: f64,
    pub dist_std: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub visual_consistency_score: f64,
    pub overall_anomaly: f64,
    pub spike_rate: f64,
    pub spike_count: usize,
    pub spike_segments: Vec<usize>,
    pub peak_anomaly: f64,
    pub total_segments: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSegment {
    pub i: usize,
    pub t0: f64,
    pub t1: f64,
    pub frames_available: usize,
    pub picked_local_indices: Vec<usize>,
    pub cosine_sim_to_baseline: f64,
    pub dist_to_baseline: f64,
    /// Absolute z-score of the distance.
    pub z: f64,
    pub is_spike: bool,
    pub percentile_vs_baseline: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoShiftReport {
    pub model: VideoModelInfo,
    pub params: VideoParams,
    pub meta: VideoMeta,
    pub baseline: VideoBaseline,
    pub summary: VideoSummary,
    pub segments: Vec<VideoSegment>,
    pub warnings: Vec<String>,
    pub disclaimer: String,
}

/// Embeds time windows of frames and scores each against the opening
/// baseline windows. Frames are ordered by time (stable for equal times);
/// frames after `max_seconds` are ignored.
pub fn analyze_video_shift(
    embedder: &dyn Embedder,
    frames: &[TimedFrame],
    cfg: &VideoShiftConfig,
) -> Result<Outcome<VideoShiftReport>, AnalyzeError> {
    let drift = &cfg.drift;
    let mut kept: Vec<&TimedFrame> = frames.iter().filter(|f| f.time <= cfg.max_seconds).collect();
    kept.sort_by(|a, b| a.time.total_cmp(&b.time));
    if kept.len() < 2 {
        return Ok(Outcome::insufficient(
            "Too few decodable frames. Try a different video or ensure it contains a video track.",
        ));
    }

    let times: Vec<f64> = kept.iter().map(|f| f.time).collect();
    let segments = timestamp_windows(&times, drift.window_sec, drift.hop_sec);
    if segments.is_empty() {
        return Ok(Outcome::insufficient("Could not create segments from frames."));
    }
    let span_ms = (drift.baseline_sec * 1000.0).round().max(0.0) as usize;
    let selection = select_baseline(&segments, span_ms);
    let mut warnings = Vec::new();
    if let Some(w) = selection.warning() {
        warnings.push(w.to_string());
    }
    let baseline = &selection.indices;

    let frames_per_segment = cfg.frames_per_segment.max(1);
    let picks: Vec<Vec<usize>> = segments
        .iter()
        .map(|s| uniform_pick(s.payload.len(), frames_per_segment))
        .collect();
    let payloads: Vec<Payload> = segments
        .iter()
        .zip(&picks)
        .map(|(s, pick)| Payload::Video {
            frames: pick
                .iter()
                .map(|&j| kept[s.payload[j]].frame.clone())
                .collect(),
        })
        .collect();
    let vectors = embed_payloads(embedder, &payloads)?;

    let cs = centroid_stats(&vectors, baseline, drift.eps)?;
    let modality = Modality::new(
        "visual",
        vec![ScoredChannel::with_stats(
            "distToBaseline",
            cs.distances.iter().copied().map(Some).collect(),
            cs.stats,
        )],
    );
    let records = score(&modality, Secondary::None, baseline, drift.alpha);
    let summary = summarize(&records, drift);
    debug!(
        frames = kept.len(),
        segments = segments.len(),
        overall = summary.overall_anomaly,
        "video shift scored"
    );

    let segments_out = segments
        .iter()
        .zip(&records)
        .zip(picks)
        .enumerate()
        .map(|(i, ((s, r), pick))| VideoSegment {
            i,
            t0: round(s.start as f64 / 1000.0, 3),
            t1: round(s.end as f64 / 1000.0, 3),
            frames_available: s.payload.len(),
            picked_local_indices: pick,
            cosine_sim_to_baseline: round(1.0 - cs.distances[i], 6),
            dist_to_baseline: round(cs.distances[i], 6),
            z: round(r.fused, 4),
            is_spike: r.fused >= drift.spike_threshold,
            percentile_vs_baseline: r.percentile_vs_baseline.map(|p| round(p, 1)),
        })
        .collect();

    Ok(Outcome::Ready(VideoShiftReport {
        model: VideoModelInfo {
            name: embedder.model_name().to_string(),
            frames_per_segment,
        },
        params: VideoParams {
            window_sec: drift.window_sec,
            hop_sec: drift.hop_sec,
            baseline_sec: drift.baseline_sec,
            spike_threshold: drift.spike_threshold,
            max_seconds: cfg.max_seconds,
        },
        meta: VideoMeta {
            frames: kept.len(),
            dropped_frames: frames.len() - kept.len(),
            duration_sec: times.last().copied().unwrap_or(0.0),
        },
        baseline: VideoBaseline {
            segment_indices: baseline.clone(),
            dist_mean: round(cs.stats.mean, 6),
            dist_std: round(cs.stats.std, 6),
        },
        summary: VideoSummary {
            visual_consistency_score: round(summary.consistency_score, 2),
            overall_anomaly: round(summary.overall_anomaly, 4),
            spike_rate: round(summary.spike_rate, 4),
            spike_count: summary.spike_count,
            spike_segments: summary.spike_segments,
            peak_anomaly: round(summary.peak_anomaly, 4),
            total_segments: summary.segments,
        },
        segments: segments_out,
        warnings,
        disclaimer: VIDEO_DISCLAIMER.to_string(),
    }))
}
