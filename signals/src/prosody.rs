use std::f64::consts::PI;

/// Configures prosody extraction.
#[derive(Debug, Clone)]
pub struct ProsodyConfig {
    /// Lowest pitch considered, in Hz (default: 70).
    pub fmin: f64,
    /// Highest pitch considered, in Hz (default: 350).
    pub fmax: f64,
    /// Absolute amplitude below which a sample counts as silence (default: 0.01).
    pub silence_threshold: f64,
    /// Numerical floor (default: 1e-8).
    pub eps: f64,
}

impl Default for ProsodyConfig {
    fn default() -> Self {
        Self {
            fmin: 70.0,
            fmax: 350.0,
            silence_threshold: 0.01,
            eps: 1e-8,
        }
    }
}

/// Low-level delivery features of one audio segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Prosody {
    pub rms: f64,
    pub zcr: f64,
    pub pause_ratio: f64,
    /// Estimated fundamental frequency; `None` when unvoiced or undetected.
    pub pitch_hz: Option<f64>,
}

/// Computes prosody features for mono samples in `[-1, 1]`.
pub fn prosody(samples: &[f32], sample_rate: u32, cfg: &ProsodyConfig) -> Prosody {
    Prosody {
        rms: rms(samples, cfg.eps),
        zcr: zero_crossing_rate(samples),
        pause_ratio: pause_ratio(samples, cfg.silence_threshold),
        pitch_hz: pitch_autocorr(samples, sample_rate, cfg),
    }
}

fn rms(x: &[f32], eps: f64) -> f64 {
    if x.is_empty() {
        return eps.sqrt();
    }
    let mean_sq = x.iter().map(|&v| (v as f64) * (v as f64)).sum::<f64>() / x.len() as f64;
    (mean_sq + eps).sqrt()
}

/// Fraction of adjacent sample pairs whose sign differs; zero counts as positive.
fn zero_crossing_rate(x: &[f32]) -> f64 {
    if x.len() < 2 {
        return 0.0;
    }
    let crossings = x.windows(2).filter(|w| (w[0] < 0.0) != (w[1] < 0.0)).count();
    crossings as f64 / (x.len() - 1) as f64
}

fn pause_ratio(x: &[f32], threshold: f64) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let quiet = x.iter().filter(|&&v| (v as f64).abs() < threshold).count();
    quiet as f64 / x.len() as f64
}

/// Autocorrelation pitch estimate on a Hann-windowed, mean-removed segment.
///
/// Only lags in `[sr/fmax, sr/fmin)` are searched. Returns `None` for
/// segments under 50 ms, when the lag range is too narrow, or when the
/// normalized autocorrelation peak is below 0.25.
fn pitch_autocorr(x: &[f32], sample_rate: u32, cfg: &ProsodyConfig) -> Option<f64> {
    let sr = sample_rate as f64;
    let n = x.len();
    if n < 2 || n < (0.05 * sr) as usize {
        return None;
    }

    let mean = x.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    let xw: Vec<f64> = x
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let w = 0.5 - 0.5 * (2.0 * PI * i as f64 / (n - 1) as f64).cos();
            (v as f64 - mean) * w
        })
        .collect();

    let lag_min = (sr / cfg.fmax) as usize;
    let lag_max = ((sr / cfg.fmin) as usize).min(n - 1);
    if lag_max <= lag_min + 2 {
        return None;
    }

    let ac0 = autocorr_at(&xw, 0) + cfg.eps;
    let mut peak_lag = lag_min;
    let mut peak_val = f64::NEG_INFINITY;
    for lag in lag_min..lag_max {
        let v = autocorr_at(&xw, lag) / ac0;
        if v > peak_val {
            peak_val = v;
            peak_lag = lag;
        }
    }

    if peak_val < 0.25 || peak_lag == 0 {
        return None;
    }
    Some(sr / peak_lag as f64)
}

fn autocorr_at(x: &[f64], lag: usize) -> f64 {
    x[..x.len() - lag]
        .iter()
        .zip(&x[lag..])
        .map(|(a, b)| a * b)
        .sum()
}
