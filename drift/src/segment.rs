//! Splits raw sequences into segments.
//!
//! Positions are in the source's native unit: sample index for a signal,
//! item index for an ordered list, milliseconds for timestamped frames.
//! Ends are exclusive.

use chrono::NaiveDate;

use crate::error::DriftError;

/// A contiguous slice of the input with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<P> {
    pub start: usize,
    pub end: usize,
    pub payload: P,
}

impl<P> Segment<P> {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Converts a duration in seconds to native units at `rate`, floored to at least 1.
pub fn window_units(seconds: f64, rate: u32) -> usize {
    let units = (seconds * rate as f64).floor();
    if units.is_finite() && units >= 1.0 {
        units as usize
    } else {
        1
    }
}

/// Sliding windows over a continuous signal sampled at `rate`.
///
/// Emits `[i, i + window)` for `i = 0, hop, 2*hop, ...` while the window
/// fits. A non-empty signal shorter than one window yields a single
/// segment spanning all of it.
pub fn segment_signal<T>(
    signal: &[T],
    rate: u32,
    window_sec: f64,
    hop_sec: f64,
) -> Vec<Segment<&[T]>> {
    let n = signal.len();
    let win = window_units(window_sec, rate);
    let hop = window_units(hop_sec, rate);

    let mut out = Vec::new();
    let mut i = 0;
    while i + win <= n {
        out.push(Segment {
            start: i,
            end: i + win,
            payload: &signal[i..i + win],
        });
        i += hop;
    }
    if out.is_empty() && n > 0 {
        out.push(Segment {
            start: 0,
            end: n,
            payload: signal,
        });
    }
    out
}

/// Rolling windows of `window` consecutive items advancing by `stride`.
///
/// `window` is clamped to `[2, items.len()]` and `stride` to at least 1.
/// The caller sorts the items by their order key beforehand.
pub fn ordered_windows<T>(items: &[T], window: usize, stride: usize) -> Vec<Segment<&[T]>> {
    let n = items.len();
    if n == 0 {
        return Vec::new();
    }
    let w = window.max(2).min(n);
    let stride = stride.max(1);
    (0..=n - w)
        .step_by(stride)
        .map(|start| Segment {
            start,
            end: start + w,
            payload: &items[start..start + w],
        })
        .collect()
}

/// Time windows over frame timestamps (seconds).
///
/// Windows start at `0, hop, 2*hop, ...` while the start does not pass the
/// last timestamp. Each payload holds the indices of frames in
/// `[t0, t0 + window)`; an empty window takes the frame nearest its
/// midpoint so the timeline has no gaps. Bounds are in milliseconds.
pub fn timestamp_windows(times: &[f64], window_sec: f64, hop_sec: f64) -> Vec<Segment<Vec<usize>>> {
    let Some(&duration) = times.last() else {
        return Vec::new();
    };
    if !duration.is_finite() {
        return Vec::new();
    }
    let hop = hop_sec.max(1e-3);
    let window = window_sec.max(1e-3);

    let mut out = Vec::new();
    let mut k = 0usize;
    loop {
        let t0 = k as f64 * hop;
        if t0 > duration {
            break;
        }
        let t1 = t0 + window;
        let mut frames: Vec<usize> = times
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t >= t0 && t < t1)
            .map(|(i, _)| i)
            .collect();
        if frames.is_empty() {
            let mid = (t0 + t1) / 2.0;
            frames.push(nearest(times, mid));
        }
        out.push(Segment {
            start: to_ms(t0),
            end: to_ms(t1),
            payload: frames,
        });
        k += 1;
    }
    out
}

/// Parses a `YYYY-MM-DD` order key.
pub fn parse_date(value: &str) -> Result<NaiveDate, DriftError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| DriftError::InvalidDate {
        value: value.to_string(),
    })
}

fn nearest(times: &[f64], target: f64) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &t) in times.iter().enumerate() {
        let d = (t - target).abs();
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

fn to_ms(seconds: f64) -> usize {
    (seconds * 1000.0).round().max(0.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_windows_cover_and_order() {
        for n in [1usize, 5, 7, 16, 33, 100] {
            let signal = vec![0.0f32; n];
            let segs = segment_signal(&signal, 4, 1.0, 0.5);
            assert!(!segs.is_empty(), "n={n}");
            let mut prev = 0;
            for s in &segs {
                assert!(s.start < s.end && s.end <= n, "n={n} seg={}..{}", s.start, s.end);
                assert!(s.start >= prev);
                assert_eq!(s.payload.len(), s.len());
                prev = s.start;
            }
        }
    }

    #[test]
    fn signal_windows_exact() {
        let signal: Vec<i32> = (0..10).collect();
        let segs = segment_signal(&signal, 1, 4.0, 2.0);
        let bounds: Vec<_> = segs.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(bounds, vec![(0, 4), (2, 6), (4, 8), (6, 10)]);
        assert_eq!(segs[1].payload, &[2, 3, 4, 5]);
    }

    #[test]
    fn short_signal_is_one_segment() {
        let signal = [1.0f32, 2.0, 3.0];
        let segs = segment_signal(&signal, 16000, 4.0, 2.0);
        assert_eq!(segs.len(), 1);
        assert_eq!((segs[0].start, segs[0].end), (0, 3));
    }

    #[test]
    fn empty_signal_has_no_segments() {
        let signal: [f32; 0] = [];
        assert!(segment_signal(&signal, 16000, 4.0, 2.0).is_empty());
        assert!(ordered_windows(&signal, 3, 1).is_empty());
        assert!(timestamp_windows(&[], 4.0, 2.0).is_empty());
    }

    #[test]
    fn window_units_floor_at_one() {
        assert_eq!(window_units(0.0, 16000), 1);
        assert_eq!(window_units(0.00001, 16000), 1);
        assert_eq!(window_units(4.0, 16000), 64000);
        assert_eq!(window_units(0.25, 10), 2);
    }

    #[test]
    fn five_items_window_three() {
        let items = ["a", "b", "c", "d", "e"];
        let wins = ordered_windows(&items, 3, 1);
        let bounds: Vec<_> = wins.iter().map(|s| (s.start, s.end - 1)).collect();
        assert_eq!(bounds, vec![(0, 2), (1, 3), (2, 4)]);
        assert_eq!(wins[2].payload, &["c", "d", "e"]);
    }

    #[test]
    fn ordered_window_is_clamped() {
        let items = [1, 2, 3];
        // Window 1 becomes 2.
        assert_eq!(ordered_windows(&items, 1, 1).len(), 2);
        // Window 10 becomes 3.
        let wins = ordered_windows(&items, 10, 1);
        assert_eq!(wins.len(), 1);
        assert_eq!((wins[0].start, wins[0].end), (0, 3));
        // Stride 0 becomes 1.
        assert_eq!(ordered_windows(&items, 2, 0).len(), 2);
        // A single item still forms one window.
        assert_eq!(ordered_windows(&items[..1], 3, 1).len(), 1);
    }

    #[test]
    fn ordered_window_stride() {
        let items: Vec<i32> = (0..7).collect();
        let starts: Vec<_> = ordered_windows(&items, 3, 2).iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0, 2, 4]);
    }

    #[test]
    fn timestamp_windows_fill_gaps() {
        // Frames at 0, 1, 9 seconds.
        let times = [0.0, 1.0, 9.0];
        let segs = timestamp_windows(&times, 4.0, 2.0);
        // t0 = 0, 2, 4, 6, 8.
        assert_eq!(segs.len(), 5);
        assert_eq!(segs[0].payload, vec![0, 1]);
        assert_eq!((segs[0].start, segs[0].end), (0, 4000));
        // [2, 6) is empty: nearest to 4 is frame 1 (t=1).
        assert_eq!(segs[1].payload, vec![1]);
        // [6, 10) holds the t=9 frame.
        assert_eq!(segs[3].payload, vec![2]);
        assert_eq!(segs[4].payload, vec![2]);
    }

    #[test]
    fn parse_dates() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        let err = parse_date("2024/01/02").unwrap_err();
        assert!(err.to_string().contains("2024/01/02"));
        assert!(parse_date("2023-02-30").is_err());
    }
}
