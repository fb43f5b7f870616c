use std::fmt;

/// A decoded RGB video frame, row-major, 3 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub rgb: Vec<u8>,
}

impl Frame {
    pub fn new(width: usize, height: usize, rgb: Vec<u8>) -> Self {
        Self { width, height, rgb }
    }

    /// Iterates complete RGB pixels. A truncated trailing pixel is skipped.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.rgb.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }
}

/// Raw input for an embedding provider.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A single text item.
    Text(String),
    /// A mono waveform slice in `[-1, 1]`.
    Audio { samples: Vec<f32>, sample_rate: u32 },
    /// The frames sampled for one video segment.
    Video { frames: Vec<Frame> },
}

impl Payload {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Text(_) => PayloadKind::Text,
            Self::Audio { .. } => PayloadKind::Audio,
            Self::Video { .. } => PayloadKind::Video,
        }
    }
}

/// Discriminant of [`Payload`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Text,
    Audio,
    Video,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// Picks `k` evenly spaced indices from `0..n` (rounded `linspace(0, n-1, k)`).
///
/// Indices repeat when `k > n`. For `n <= 1` every pick is index 0.
pub fn uniform_pick(n: usize, k: usize) -> Vec<usize> {
    if n <= 1 {
        return vec![0; k];
    }
    if k == 1 {
        return vec![0];
    }
    let last = (n - 1) as f64;
    let step = last / (k - 1) as f64;
    (0..k)
        .map(|i| ((i as f64 * step).round_ties_even() as usize).min(n - 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_kind_display() {
        assert_eq!(Payload::text("hi").kind().to_string(), "text");
        let audio = Payload::Audio { samples: vec![0.0], sample_rate: 16000 };
        assert_eq!(audio.kind().to_string(), "audio");
        assert_eq!(Payload::Video { frames: vec![] }.kind().to_string(), "video");
    }

    #[test]
    fn uniform_pick_spreads_across_range() {
        assert_eq!(uniform_pick(5, 3), vec![0, 2, 4]);
        assert_eq!(uniform_pick(10, 2), vec![0, 9]);
    }

    #[test]
    fn uniform_pick_repeats_when_short() {
        let picks = uniform_pick(3, 5);
        assert_eq!(picks.len(), 5);
        assert_eq!(picks[0], 0);
        assert_eq!(picks[4], 2);
        assert!(picks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn uniform_pick_degenerate() {
        assert_eq!(uniform_pick(0, 3), vec![0, 0, 0]);
        assert_eq!(uniform_pick(1, 2), vec![0, 0]);
        assert!(uniform_pick(4, 0).is_empty());
    }

    #[test]
    fn frame_pixels_skip_partial() {
        let f = Frame::new(1, 1, vec![1, 2, 3, 4]);
        let px: Vec<_> = f.pixels().collect();
        assert_eq!(px, vec![[1, 2, 3]]);
    }
}
