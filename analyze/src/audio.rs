//! Baseline-relative delivery shift for a single audio recording.
//!
//! Two modalities are scored per segment: prosody (RMS, zero-crossing rate,
//! pause ratio, pitch) and, when a provider is available, the distance of
//! the segment embedding to the baseline centroid.

use personalens_drift::{
    attribute, centroid_stats, score, segment_signal, select_baseline, summarize, window_units,
    ChannelStats, Modality, ScoredChannel, Secondary,
};
use personalens_embed::{Embedder, Payload};
use personalens_signals::{prosody, Prosody, ProsodyConfig};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::AudioShiftConfig;
use crate::embedding::embed_payloads;
use crate::error::AnalyzeError;
use crate::outcome::Outcome;
use crate::round::{round, round_opt, round_stats};

pub const AUDIO_MODE: &str = "audio_prosody_plus_embedding_baseline_shift";
pub const AUDIO_DISCLAIMER: &str = "Baseline-relative delivery shift signals (prosody + embeddings). Not medical, not deception detection, not truth verification.";

/// The optional embedding channel.
#[derive(Clone, Copy)]
pub enum EmbeddingChannel<'a> {
    Ready(&'a dyn Embedder),
    /// The provider could not be built; the reason becomes a warning.
    Unavailable(&'a str),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfigEcho {
    pub window_sec: f64,
    pub hop_sec: f64,
    pub baseline_sec: f64,
    pub pitch_hz_range: [f64; 2],
    pub max_audio_sec: f64,
    pub use_embeddings: bool,
    pub embedding_model: Option<String>,
    pub combine_alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingBaseline {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub model: Option<String>,
    pub dim: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioBaseline {
    pub rms: ChannelStats,
    pub zcr: ChannelStats,
    pub pause_ratio: ChannelStats,
    pub pitch_hz: ChannelStats,
    pub embedding_distance: EmbeddingBaseline,
    pub baseline_segments: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFeatures {
    pub rms: f64,
    pub zcr: f64,
    pub pause_ratio: f64,
    /// `None` when no pitch was detected.
    pub pitch_hz: Option<f64>,
    pub embedding_distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioZ {
    pub rms: f64,
    pub zcr: f64,
    pub pause_ratio: f64,
    pub pitch_hz: Option<f64>,
    pub embedding_distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSegment {
    pub start_ms: u64,
    pub end_ms: u64,
    pub features: AudioFeatures,
    pub z: AudioZ,
    pub prosody_anomaly: f64,
    pub embedding_anomaly: f64,
    /// Fused anomaly.
    pub segment_anomaly: f64,
    pub percentile_vs_baseline: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSummary {
    pub segments: usize,
    pub overall_anomaly: f64,
    pub spike_threshold: f64,
    pub spike_segments: Vec<usize>,
    pub spike_count: usize,
    pub embedding_used: bool,
    pub delivery_consistency_score: f64,
    pub spike_rate: f64,
    pub peak_anomaly: f64,
    /// `prosody` or `embeddings`.
    pub driver: String,
    pub driver_share: f64,
    pub decay_k: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioShiftReport {
    pub mode: String,
    pub sr: u32,
    pub config: AudioConfigEcho,
    pub baseline: AudioBaseline,
    pub summary: AudioSummary,
    pub segments: Vec<AudioSegment>,
    pub warnings: Vec<String>,
    pub disclaimer: String,
}

/// Scores each window of `samples` (mono, `[-1, 1]`) against the opening
/// baseline span of the same recording.
pub fn analyze_audio_shift(
    samples: &[f32],
    sample_rate: u32,
    embedding: EmbeddingChannel<'_>,
    cfg: &AudioShiftConfig,
) -> Result<Outcome<AudioShiftReport>, AnalyzeError> {
    if sample_rate == 0 {
        return Ok(Outcome::insufficient("Sample rate must be positive."));
    }
    if samples.is_empty() {
        return Ok(Outcome::insufficient("Audio contains no samples."));
    }
    let drift = &cfg.drift;
    let sr = sample_rate as f64;
    let mut warnings = Vec::new();

    let mut audio = samples;
    if audio.len() as f64 / sr > cfg.max_audio_sec {
        let keep = ((cfg.max_audio_sec * sr) as usize).max(1);
        audio = &audio[..keep.min(audio.len())];
        warn!(max_audio_sec = cfg.max_audio_sec, "audio truncated");
        warnings.push(format!(
            "Audio truncated to {:.0}s for CPU safety.",
            cfg.max_audio_sec
        ));
    }

    let segments = segment_signal(audio, sample_rate, drift.window_sec, drift.hop_sec);
    let selection = select_baseline(&segments, window_units(drift.baseline_sec, sample_rate));
    if let Some(w) = selection.warning() {
        warnings.push(w.to_string());
    }
    let baseline = &selection.indices;

    let pcfg = ProsodyConfig {
        fmin: cfg.fmin,
        fmax: cfg.fmax,
        silence_threshold: cfg.silence_threshold,
        eps: drift.eps,
    };
    let feats: Vec<Prosody> = segments
        .iter()
        .map(|s| prosody(s.payload, sample_rate, &pcfg))
        .collect();
    let column = |f: fn(&Prosody) -> Option<f64>| -> Vec<Option<f64>> { feats.iter().map(f).collect() };
    let prosody_modality = Modality::new(
        "prosody",
        vec![
            ScoredChannel::new("rms", column(|p| Some(p.rms)), baseline, drift.eps),
            ScoredChannel::new("zcr", column(|p| Some(p.zcr)), baseline, drift.eps),
            ScoredChannel::new("pauseRatio", column(|p| Some(p.pause_ratio)), baseline, drift.eps),
            ScoredChannel::new("pitchHz", column(|p| p.pitch_hz), baseline, drift.eps),
        ],
    );

    let mut embed_info: Option<(String, usize)> = None;
    let mut distance: Option<(Vec<f64>, ChannelStats)> = None;
    let embeddings_modality = if !cfg.use_embeddings {
        None
    } else {
        match embedding {
            EmbeddingChannel::Unavailable(reason) => {
                warn!(reason, "audio embeddings disabled");
                warnings.push(format!("Audio embeddings disabled: {reason}"));
                None
            }
            EmbeddingChannel::Ready(embedder) => {
                let payloads: Vec<Payload> = segments
                    .iter()
                    .map(|s| Payload::Audio {
                        samples: s.payload.to_vec(),
                        sample_rate,
                    })
                    .collect();
                let vectors = embed_payloads(embedder, &payloads)?;
                let cs = centroid_stats(&vectors, baseline, drift.eps)?;
                embed_info = Some((
                    embedder.model_name().to_string(),
                    vectors.first().map(Vec::len).unwrap_or(0),
                ));
                let channel = ScoredChannel::with_stats(
                    "embeddingDistance",
                    cs.distances.iter().copied().map(Some).collect(),
                    cs.stats,
                );
                distance = Some((cs.distances, cs.stats));
                Some(Modality::new("embeddings", vec![channel]))
            }
        }
    };
    let embedding_used = embeddings_modality.is_some();

    let secondary = match &embeddings_modality {
        Some(m) => Secondary::Scored(m),
        None => Secondary::Neutral,
    };
    let records = score(&prosody_modality, secondary, baseline, drift.alpha);
    let summary = summarize(&records, drift);
    let attribution = attribute(
        &prosody_modality,
        embeddings_modality.as_ref(),
        drift.alpha,
        drift.eps,
    );
    debug!(
        segments = segments.len(),
        baseline = baseline.len(),
        embedding_used,
        overall = summary.overall_anomaly,
        "audio shift scored"
    );

    let z_of = |name: &str, i: usize| -> Option<f64> {
        prosody_modality
            .channel(name)
            .and_then(|c| c.z.get(i).copied().flatten())
    };
    let stats_of = |name: &str| -> ChannelStats {
        prosody_modality
            .channel(name)
            .map(|c| c.stats)
            .unwrap_or(ChannelStats { mean: 0.0, std: drift.eps })
    };
    let embedding_z = |i: usize| -> Option<f64> {
        embeddings_modality
            .as_ref()
            .and_then(|m| m.channels.first())
            .and_then(|c| c.z.get(i).copied().flatten())
    };

    let segments_out = segments
        .iter()
        .zip(&feats)
        .zip(&records)
        .enumerate()
        .map(|(i, ((seg, f), r))| AudioSegment {
            start_ms: to_ms(seg.start, sr),
            end_ms: to_ms(seg.end, sr),
            features: AudioFeatures {
                rms: round(f.rms, 6),
                zcr: round(f.zcr, 6),
                pause_ratio: round(f.pause_ratio, 6),
                pitch_hz: round_opt(f.pitch_hz, 2),
                embedding_distance: round_opt(distance.as_ref().map(|(d, _)| d[i]), 6),
            },
            z: AudioZ {
                rms: round(z_of("rms", i).unwrap_or(0.0), 4),
                zcr: round(z_of("zcr", i).unwrap_or(0.0), 4),
                pause_ratio: round(z_of("pauseRatio", i).unwrap_or(0.0), 4),
                pitch_hz: round_opt(z_of("pitchHz", i), 4),
                embedding_distance: round_opt(embedding_z(i), 4),
            },
            prosody_anomaly: round(r.primary, 4),
            embedding_anomaly: round(r.secondary.unwrap_or(0.0), 4),
            segment_anomaly: round(r.fused, 4),
            percentile_vs_baseline: round_opt(r.percentile_vs_baseline, 1),
        })
        .collect();

    let pitch = stats_of("pitchHz");
    Ok(Outcome::Ready(AudioShiftReport {
        mode: AUDIO_MODE.to_string(),
        sr: sample_rate,
        config: AudioConfigEcho {
            window_sec: drift.window_sec,
            hop_sec: drift.hop_sec,
            baseline_sec: drift.baseline_sec,
            pitch_hz_range: [cfg.fmin, cfg.fmax],
            max_audio_sec: cfg.max_audio_sec,
            use_embeddings: cfg.use_embeddings,
            embedding_model: embed_info.as_ref().map(|(m, _)| m.clone()),
            combine_alpha: drift.clamped_alpha(),
        },
        baseline: AudioBaseline {
            rms: round_stats(stats_of("rms"), 6),
            zcr: round_stats(stats_of("zcr"), 6),
            pause_ratio: round_stats(stats_of("pauseRatio"), 6),
            pitch_hz: round_stats(pitch, 2),
            embedding_distance: EmbeddingBaseline {
                mean: round_opt(distance.as_ref().map(|(_, s)| s.mean), 6),
                std: round_opt(distance.as_ref().map(|(_, s)| s.std), 6),
                model: embed_info.as_ref().map(|(m, _)| m.clone()),
                dim: embed_info.as_ref().map(|(_, d)| *d),
            },
            baseline_segments: baseline.clone(),
        },
        summary: AudioSummary {
            segments: summary.segments,
            overall_anomaly: round(summary.overall_anomaly, 4),
            spike_threshold: summary.spike_threshold,
            spike_segments: summary.spike_segments,
            spike_count: summary.spike_count,
            embedding_used,
            delivery_consistency_score: round(summary.consistency_score, 1),
            spike_rate: round(summary.spike_rate, 3),
            peak_anomaly: round(summary.peak_anomaly, 4),
            driver: attribution.driver,
            driver_share: round(attribution.share, 3),
            decay_k: summary.decay_k,
        },
        segments: segments_out,
        warnings,
        disclaimer: AUDIO_DISCLAIMER.to_string(),
    }))
}

fn to_ms(sample: usize, sr: f64) -> u64 {
    (1000.0 * sample as f64 / sr) as u64
}
