use crate::embed::Embedder;
use crate::error::EmbedError;
use crate::payload::{Frame, Payload};
use crate::vector::l2_normalize;

pub const FRAME_MODEL: &str = "frame-stats-v1";

const BINS_PER_CHANNEL: usize = 4;
const FRAME_DIM: usize = 3 * BINS_PER_CHANNEL + 3 + 1;

/// Video segment embedder built from coarse per-frame colour statistics.
///
/// Per frame: a 4-bin histogram for each RGB channel (as fractions), the
/// mean of each channel and the standard deviation of luma, all scaled to
/// `[0, 1]`. Frames are mean-pooled and the pooled vector is L2-normalized.
pub struct FrameEmbedder {
    model: String,
}

impl FrameEmbedder {
    pub fn new() -> Self {
        Self {
            model: FRAME_MODEL.to_string(),
        }
    }

    fn embed_segment(&self, index: usize, frames: &[Frame]) -> Result<Vec<f32>, EmbedError> {
        let mut pooled = vec![0.0f64; FRAME_DIM];
        let mut used = 0usize;
        for frame in frames {
            if let Some(stats) = frame_stats(frame) {
                for (p, s) in pooled.iter_mut().zip(stats.iter()) {
                    *p += s;
                }
                used += 1;
            }
        }
        if used == 0 {
            return Err(EmbedError::EmptyPayload(index));
        }
        let mut out: Vec<f32> = pooled.iter().map(|&v| (v / used as f64) as f32).collect();
        l2_normalize(&mut out);
        Ok(out)
    }
}

impl Default for FrameEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for FrameEmbedder {
    fn embed(&self, items: &[Payload]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if items.is_empty() {
            return Err(EmbedError::EmptyInput);
        }
        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Payload::Video { frames } => self.embed_segment(i, frames),
                other => Err(EmbedError::Unsupported {
                    model: self.model.clone(),
                    kind: other.kind(),
                }),
            })
            .collect()
    }

    fn dimension(&self) -> usize {
        FRAME_DIM
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn frame_stats(frame: &Frame) -> Option<[f64; FRAME_DIM]> {
    let mut out = [0.0f64; FRAME_DIM];
    let mut sums = [0.0f64; 3];
    let mut luma_sum = 0.0f64;
    let mut luma_sq = 0.0f64;
    let mut n = 0usize;

    for px in frame.pixels() {
        for (c, &v) in px.iter().enumerate() {
            let bin = (v as usize * BINS_PER_CHANNEL) / 256;
            out[c * BINS_PER_CHANNEL + bin] += 1.0;
            sums[c] += v as f64;
        }
        let luma = (0.299 * px[0] as f64 + 0.587 * px[1] as f64 + 0.114 * px[2] as f64) / 255.0;
        luma_sum += luma;
        luma_sq += luma * luma;
        n += 1;
    }
    if n == 0 {
        return None;
    }

    let n = n as f64;
    for h in out[..3 * BINS_PER_CHANNEL].iter_mut() {
        *h /= n;
    }
    for c in 0..3 {
        out[3 * BINS_PER_CHANNEL + c] = sums[c] / n / 255.0;
    }
    let mean = luma_sum / n;
    out[FRAME_DIM - 1] = (luma_sq / n - mean * mean).max(0.0).sqrt();
    Some(out)
}
