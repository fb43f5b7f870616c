use personalens_drift::DriftConfig;
use serde::{Deserialize, Serialize};

/// Audio shift parameters. Drift fields sit at the same level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioShiftConfig {
    #[serde(flatten)]
    pub drift: DriftConfig,
    /// Pitch search range in Hz.
    pub fmin: f64,
    pub fmax: f64,
    /// Amplitude below which a sample counts as a pause.
    pub silence_threshold: f64,
    /// Longer audio is truncated, with a warning.
    pub max_audio_sec: f64,
    /// Score the embedding channel alongside prosody.
    pub use_embeddings: bool,
}

impl Default for AudioShiftConfig {
    fn default() -> Self {
        Self {
            drift: DriftConfig::default(),
            fmin: 70.0,
            fmax: 350.0,
            silence_threshold: 0.01,
            max_audio_sec: 180.0,
            use_embeddings: true,
        }
    }
}

/// Video shift parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoShiftConfig {
    #[serde(flatten)]
    pub drift: DriftConfig,
    pub frames_per_segment: usize,
    /// Frames after this timestamp are ignored.
    pub max_seconds: f64,
}

impl Default for VideoShiftConfig {
    fn default() -> Self {
        Self {
            drift: DriftConfig::default(),
            frames_per_segment: 16,
            max_seconds: 300.0,
        }
    }
}

/// Text timeline parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Items per rolling window; clamped to `[2, n]`.
    pub window: usize,
    pub stride: usize,
    /// When set, the first `baseline_items` entries form a baseline and every
    /// item gets an anomaly score against it.
    pub baseline_items: Option<usize>,
    #[serde(flatten)]
    pub drift: DriftConfig,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            window: 3,
            stride: 1,
            baseline_items: None,
            drift: DriftConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattened_drift_fields() {
        let cfg: AudioShiftConfig =
            serde_yaml::from_str("fmin: 80\nwindow_sec: 3\nuse_embeddings: false\n").unwrap();
        assert_eq!(cfg.fmin, 80.0);
        assert_eq!(cfg.fmax, 350.0);
        assert_eq!(cfg.drift.window_sec, 3.0);
        assert_eq!(cfg.drift.hop_sec, 2.0);
        assert!(!cfg.use_embeddings);
    }

    #[test]
    fn timeline_defaults() {
        let cfg: TimelineConfig = serde_yaml::from_str("baseline_items: 4").unwrap();
        assert_eq!(cfg.window, 3);
        assert_eq!(cfg.stride, 1);
        assert_eq!(cfg.baseline_items, Some(4));
    }
}
