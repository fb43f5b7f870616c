use std::f64::consts::PI;

use personalens_analyze::{analyze_audio_shift, AudioShiftConfig, EmbeddingChannel};
use personalens_drift::DEGRADED_BASELINE_WARNING;
use personalens_embed::FbankEmbedder;

const SR: u32 = 8000;

/// `first` seconds of a quiet 200 Hz tone followed by `second` seconds of a
/// loud 300 Hz tone.
fn two_part_tone(first: f64, second: f64) -> Vec<f32> {
    let n1 = (first * SR as f64) as usize;
    let n2 = (second * SR as f64) as usize;
    (0..n1 + n2)
        .map(|i| {
            let t = i as f64 / SR as f64;
            let (amp, freq) = if i < n1 { (0.3, 200.0) } else { (0.9, 300.0) };
            (amp * (2.0 * PI * freq * t).sin()) as f32
        })
        .collect()
}

#[test]
fn loud_ending_spikes() {
    let audio = two_part_tone(20.0, 10.0);
    let embedder = FbankEmbedder::new();
    let cfg = AudioShiftConfig::default();
    let report = analyze_audio_shift(&audio, SR, EmbeddingChannel::Ready(&embedder), &cfg)
        .unwrap()
        .into_ready()
        .unwrap();

    assert_eq!(report.sr, SR);
    assert_eq!(report.segments.len(), 14);
    assert_eq!(report.baseline.baseline_segments, (0..9).collect::<Vec<_>>());
    assert!(report.warnings.is_empty());
    assert!(report.summary.embedding_used);
    assert_eq!(report.baseline.embedding_distance.model.as_deref(), Some("log-mel-pooled-v1"));

    let last = report.segments.last().unwrap();
    assert_eq!((last.start_ms, last.end_ms), (26000, 30000));
    assert!(last.segment_anomaly > 100.0);
    assert!(last.features.pitch_hz.is_some());
    assert!(last.z.embedding_distance.is_some());
    assert!(report.summary.spike_segments.contains(&13));
    assert!(report.summary.peak_anomaly >= last.segment_anomaly);
    assert!(report.summary.delivery_consistency_score < 100.0);
    assert!(["prosody", "embeddings"].contains(&report.summary.driver.as_str()));

    let baseline_pitch = report.baseline.pitch_hz.mean;
    assert!((baseline_pitch - 200.0).abs() < 10.0, "pitch {baseline_pitch}");
}

#[test]
fn unavailable_embeddings_fall_back_to_prosody() {
    let audio = two_part_tone(20.0, 10.0);
    let cfg = AudioShiftConfig::default();
    let report = analyze_audio_shift(&audio, SR, EmbeddingChannel::Unavailable("model missing"), &cfg)
        .unwrap()
        .into_ready()
        .unwrap();

    assert!(!report.summary.embedding_used);
    assert_eq!(report.summary.driver, "prosody");
    assert_eq!(report.warnings, vec!["Audio embeddings disabled: model missing".to_string()]);
    assert_eq!(report.baseline.embedding_distance.mean, None);
    for seg in &report.segments {
        assert_eq!(seg.embedding_anomaly, 0.0);
        assert_eq!(seg.features.embedding_distance, None);
        // The missing channel counts as zero, halving the prosody anomaly.
        assert!((seg.segment_anomaly - seg.prosody_anomaly * 0.5).abs() < 1e-3 * seg.prosody_anomaly.max(1.0));
    }
}

#[test]
fn embeddings_switched_off_add_no_warning() {
    let audio = two_part_tone(8.0, 0.0);
    let cfg = AudioShiftConfig {
        use_embeddings: false,
        ..AudioShiftConfig::default()
    };
    let report = analyze_audio_shift(&audio, SR, EmbeddingChannel::Unavailable("unused"), &cfg)
        .unwrap()
        .into_ready()
        .unwrap();
    assert!(!report.summary.embedding_used);
    assert!(report.warnings.is_empty());
    assert_eq!(report.config.embedding_model, None);
}

#[test]
fn long_audio_is_truncated() {
    let audio = two_part_tone(30.0, 0.0);
    let cfg = AudioShiftConfig {
        max_audio_sec: 10.0,
        use_embeddings: false,
        ..AudioShiftConfig::default()
    };
    let report = analyze_audio_shift(&audio, SR, EmbeddingChannel::Unavailable("unused"), &cfg)
        .unwrap()
        .into_ready()
        .unwrap();
    assert_eq!(report.warnings, vec!["Audio truncated to 10s for CPU safety.".to_string()]);
    assert_eq!(report.segments.len(), 4);
    assert_eq!(report.segments.last().unwrap().end_ms, 10000);
}

#[test]
fn short_audio_degrades_baseline() {
    let audio = two_part_tone(1.0, 0.0);
    let embedder = FbankEmbedder::new();
    let report = analyze_audio_shift(
        &audio,
        SR,
        EmbeddingChannel::Ready(&embedder),
        &AudioShiftConfig::default(),
    )
    .unwrap()
    .into_ready()
    .unwrap();
    assert_eq!(report.segments.len(), 1);
    assert_eq!(report.baseline.baseline_segments, vec![0]);
    assert_eq!(report.warnings, vec![DEGRADED_BASELINE_WARNING.to_string()]);
    assert_eq!(report.segments[0].percentile_vs_baseline, Some(100.0));
}

#[test]
fn empty_audio_is_insufficient() {
    let cfg = AudioShiftConfig::default();
    let out = analyze_audio_shift(&[], SR, EmbeddingChannel::Unavailable("x"), &cfg).unwrap();
    assert_eq!(out.message(), Some("Audio contains no samples."));
    let out = analyze_audio_shift(&[0.0; 10], 0, EmbeddingChannel::Unavailable("x"), &cfg).unwrap();
    assert!(!out.is_ready());
}
