use serde::{Deserialize, Serialize};

/// Tuning knobs shared by every segmented analyzer.
///
/// The spike threshold and decay constant are hand-tuned defaults, not
/// derived values. All fields fall back to their defaults when missing, so
/// a partial YAML section is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Segment length in seconds.
    pub window_sec: f64,
    /// Distance between segment starts in seconds.
    pub hop_sec: f64,
    /// Segments ending within this many seconds form the baseline.
    pub baseline_sec: f64,
    /// Weight of the primary (surface) modality; clamped to `[0, 1]`.
    pub alpha: f64,
    /// Fused anomaly at or above this value is a spike.
    pub spike_threshold: f64,
    /// Decay constant of the consistency score.
    pub decay_k: f64,
    /// Numerical floor added to standard deviations and norms.
    pub eps: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            window_sec: 4.0,
            hop_sec: 2.0,
            baseline_sec: 20.0,
            alpha: 0.5,
            spike_threshold: 1.25,
            decay_k: 0.7,
            eps: 1e-8,
        }
    }
}

impl DriftConfig {
    /// Returns `alpha` clamped to `[0, 1]`. NaN maps to 0.5.
    pub fn clamped_alpha(&self) -> f64 {
        if self.alpha.is_nan() {
            return 0.5;
        }
        self.alpha.clamp(0.0, 1.0)
    }
}
