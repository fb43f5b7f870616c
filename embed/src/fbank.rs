//! Log mel filterbank audio embeddings.
//!
//! Frames are Povey-windowed (hamming^0.85) after DC removal and
//! pre-emphasis, transformed with a radix-2 FFT and projected onto a
//! triangular mel filterbank. The per-frame log energies are pooled into a
//! fixed-size utterance vector: per-bin mean followed by per-bin standard
//! deviation, each block centered across bins so that the vector encodes
//! spectral shape rather than loudness.

use std::f64::consts::PI;

use crate::embed::Embedder;
use crate::error::EmbedError;
use crate::payload::Payload;
use crate::vector::l2_normalize;

pub const FBANK_MODEL: &str = "log-mel-pooled-v1";

/// Configures mel filterbank feature extraction.
#[derive(Debug, Clone)]
pub struct FbankConfig {
    /// Number of mel filterbank channels (default: 40).
    pub num_mels: usize,
    /// Frame length in milliseconds (default: 25).
    pub frame_ms: f64,
    /// Frame shift in milliseconds (default: 10).
    pub shift_ms: f64,
    /// Pre-emphasis coefficient (default: 0.97).
    pub pre_emphasis: f64,
    /// Floor for filterbank energy before the log (default: 1e-10).
    pub energy_floor: f64,
    /// Low cutoff frequency for mel bins (default: 20 Hz).
    pub low_freq: f64,
    /// High cutoff frequency, non-positive = offset from Nyquist (default: -400).
    pub high_freq: f64,
}

impl Default for FbankConfig {
    fn default() -> Self {
        Self {
            num_mels: 40,
            frame_ms: 25.0,
            shift_ms: 10.0,
            pre_emphasis: 0.97,
            energy_floor: 1e-10,
            low_freq: 20.0,
            high_freq: -400.0,
        }
    }
}

/// Extracts log mel filterbank features from mono samples in `[-1, 1]`.
///
/// Output is `[num_frames][num_mels]`. A signal shorter than one frame is
/// zero-padded to a single frame. Returns `None` for an empty signal or a
/// degenerate configuration.
pub fn compute_fbank(samples: &[f32], sample_rate: u32, cfg: &FbankConfig) -> Option<Vec<Vec<f32>>> {
    if samples.is_empty() || sample_rate == 0 || cfg.num_mels == 0 {
        return None;
    }
    let sr = sample_rate as f64;
    let frame_length = ((sr * cfg.frame_ms / 1000.0).round() as usize).max(2);
    let frame_shift = ((sr * cfg.shift_ms / 1000.0).round() as usize).max(1);

    let mut signal: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    if signal.len() < frame_length {
        signal.resize(frame_length, 0.0);
    }
    let num_frames = (signal.len() - frame_length) / frame_shift + 1;

    let fft_size = next_pow2(frame_length);
    let half_fft = fft_size / 2 + 1;
    let window = povey_window(frame_length);

    let nyquist = sr / 2.0;
    let mut high_freq = if cfg.high_freq <= 0.0 {
        nyquist + cfg.high_freq
    } else {
        cfg.high_freq.min(nyquist)
    };
    if high_freq <= cfg.low_freq {
        high_freq = nyquist;
    }
    let filterbank = mel_filterbank(cfg.num_mels, fft_size, sr, cfg.low_freq, high_freq);

    let mut result = Vec::with_capacity(num_frames);
    let mut fft_buf = vec![(0.0f64, 0.0f64); fft_size];

    for f in 0..num_frames {
        let offset = f * frame_shift;
        let mut frame_buf: Vec<f64> = signal[offset..offset + frame_length].to_vec();

        let mean = frame_buf.iter().sum::<f64>() / frame_length as f64;
        for v in &mut frame_buf {
            *v -= mean;
        }

        if cfg.pre_emphasis > 0.0 {
            for i in (1..frame_length).rev() {
                frame_buf[i] -= cfg.pre_emphasis * frame_buf[i - 1];
            }
            frame_buf[0] *= 1.0 - cfg.pre_emphasis;
        }

        fft_buf.fill((0.0, 0.0));
        for i in 0..frame_length {
            fft_buf[i] = (frame_buf[i] * window[i], 0.0);
        }
        fft(&mut fft_buf);

        let power: Vec<f64> = fft_buf[..half_fft]
            .iter()
            .map(|&(r, im)| r * r + im * im)
            .collect();

        let frame: Vec<f32> = filterbank
            .iter()
            .map(|filter| {
                let energy: f64 = filter.iter().zip(power.iter()).map(|(w, p)| w * p).sum();
                energy.max(cfg.energy_floor).ln() as f32
            })
            .collect();
        result.push(frame);
    }

    Some(result)
}

/// Audio embedder built on pooled log mel filterbank features.
///
/// The output dimension is `2 * num_mels`.
pub struct FbankEmbedder {
    cfg: FbankConfig,
    model: String,
}

impl FbankEmbedder {
    pub fn new() -> Self {
        Self::with_config(FbankConfig::default())
    }

    pub fn with_config(cfg: FbankConfig) -> Self {
        Self {
            cfg,
            model: FBANK_MODEL.to_string(),
        }
    }

    fn embed_wave(&self, index: usize, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>, EmbedError> {
        let features =
            compute_fbank(samples, sample_rate, &self.cfg).ok_or(EmbedError::EmptyPayload(index))?;
        let mels = self.cfg.num_mels;
        let t = features.len() as f64;

        let mut mean = vec![0.0f64; mels];
        for frame in &features {
            for (m, &v) in frame.iter().enumerate() {
                mean[m] += v as f64;
            }
        }
        for m in mean.iter_mut() {
            *m /= t;
        }

        let mut std = vec![0.0f64; mels];
        for frame in &features {
            for (m, &v) in frame.iter().enumerate() {
                let d = v as f64 - mean[m];
                std[m] += d * d;
            }
        }
        for s in std.iter_mut() {
            *s = (*s / t).sqrt();
        }

        let mut out = Vec::with_capacity(2 * mels);
        for block in [&mean, &std] {
            let center = block.iter().sum::<f64>() / mels as f64;
            out.extend(block.iter().map(|&v| (v - center) as f32));
        }
        l2_normalize(&mut out);
        Ok(out)
    }
}

impl Default for FbankEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for FbankEmbedder {
    fn embed(&self, items: &[Payload]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if items.is_empty() {
            return Err(EmbedError::EmptyInput);
        }
        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Payload::Audio { samples, sample_rate } => self.embed_wave(i, samples, *sample_rate),
                other => Err(EmbedError::Unsupported {
                    model: self.model.clone(),
                    kind: other.kind(),
                }),
            })
            .collect()
    }

    fn dimension(&self) -> usize {
        2 * self.cfg.num_mels
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn next_pow2(n: usize) -> usize {
    let mut p = 1;
    while p < n {
        p <<= 1;
    }
    p
}

/// Povey window (hamming^0.85).
fn povey_window(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let hamming = 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos();
            hamming.powf(0.85)
        })
        .collect()
}

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filterbank weights, `[num_mels][fft_size / 2 + 1]`.
fn mel_filterbank(num_mels: usize, fft_size: usize, sample_rate: f64, low_freq: f64, high_freq: f64) -> Vec<Vec<f64>> {
    let half_fft = fft_size / 2 + 1;
    let mel_low = hz_to_mel(low_freq);
    let mel_high = hz_to_mel(high_freq);

    let bins: Vec<usize> = (0..num_mels + 2)
        .map(|i| {
            let mel = mel_low + i as f64 * (mel_high - mel_low) / (num_mels + 1) as f64;
            let bin = (mel_to_hz(mel) * fft_size as f64 / sample_rate).floor() as isize;
            bin.clamp(0, half_fft as isize - 1) as usize
        })
        .collect();

    (0..num_mels)
        .map(|m| {
            let mut filter = vec![0.0f64; half_fft];
            let (left, center, right) = (bins[m], bins[m + 1], bins[m + 2]);
            if center > left {
                for k in left..=center {
                    filter[k] = (k - left) as f64 / (center - left) as f64;
                }
            }
            if right > center {
                for k in center..=right {
                    filter[k] = (right - k) as f64 / (right - center) as f64;
                }
            }
            filter
        })
        .collect()
}

/// In-place iterative Cooley-Tukey FFT over `(re, im)` pairs.
/// Input length must be a power of 2.
fn fft(x: &mut [(f64, f64)]) {
    let n = x.len();
    if n <= 1 {
        return;
    }

    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            x.swap(i, j);
        }
    }

    let mut size = 2;
    while size <= n {
        let half = size / 2;
        let angle = -2.0 * PI / size as f64;
        let wn = (angle.cos(), angle.sin());
        for start in (0..n).step_by(size) {
            let mut w = (1.0, 0.0);
            for k in 0..half {
                let u = x[start + k];
                let v = x[start + k + half];
                let t = (w.0 * v.0 - w.1 * v.1, w.0 * v.1 + w.1 * v.0);
                x[start + k] = (u.0 + t.0, u.1 + t.1);
                x[start + k + half] = (u.0 - t.0, u.1 - t.1);
                w = (w.0 * wn.0 - w.1 * wn.1, w.0 * wn.1 + w.1 * wn.0);
            }
        }
        size <<= 1;
    }
}
