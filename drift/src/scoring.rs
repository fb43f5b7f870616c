//! Standardized deviations, fusion and summary statistics.

use serde::Serialize;

use crate::baseline::{channel_stats, ChannelStats};
use crate::config::DriftConfig;
use crate::stats::mean;

/// One scalar channel scored against its baseline statistics.
#[derive(Debug, Clone)]
pub struct ScoredChannel {
    pub name: String,
    pub values: Vec<Option<f64>>,
    pub stats: ChannelStats,
    /// Signed z-score per segment; `None` where the value is absent.
    pub z: Vec<Option<f64>>,
}

impl ScoredChannel {
    /// Scores `values` against precomputed statistics.
    pub fn with_stats(name: impl Into<String>, values: Vec<Option<f64>>, stats: ChannelStats) -> Self {
        let z = values.iter().map(|v| v.map(|x| stats.zscore(x))).collect();
        Self {
            name: name.into(),
            values,
            stats,
            z,
        }
    }

    /// Computes baseline statistics with [`channel_stats`] and scores `values`.
    pub fn new(
        name: impl Into<String>,
        values: Vec<Option<f64>>,
        baseline: &[usize],
        eps: f64,
    ) -> Self {
        let stats = channel_stats(&values, baseline, eps);
        Self::with_stats(name, values, stats)
    }
}

/// A group of channels that together describe one signal source.
#[derive(Debug, Clone)]
pub struct Modality {
    pub name: String,
    pub channels: Vec<ScoredChannel>,
    /// Mean |z| over the channels present in each segment, 0 if none are.
    pub anomaly: Vec<f64>,
}

impl Modality {
    pub fn new(name: impl Into<String>, channels: Vec<ScoredChannel>) -> Self {
        let len = channels.iter().map(|c| c.z.len()).max().unwrap_or(0);
        let anomaly = (0..len)
            .map(|i| {
                let present: Vec<f64> = channels
                    .iter()
                    .filter_map(|c| c.z.get(i).copied().flatten())
                    .map(f64::abs)
                    .collect();
                mean(&present)
            })
            .collect();
        Self {
            name: name.into(),
            channels,
            anomaly,
        }
    }

    pub fn channel(&self, name: &str) -> Option<&ScoredChannel> {
        self.channels.iter().find(|c| c.name == name)
    }

    pub fn mean_anomaly(&self) -> f64 {
        mean(&self.anomaly)
    }
}

/// The second input to fusion.
#[derive(Debug, Clone, Copy)]
pub enum Secondary<'a> {
    /// Single-modality analysis: fused anomaly equals the primary's.
    None,
    /// A configured channel that is unavailable; contributes zero.
    Neutral,
    Scored(&'a Modality),
}

/// Per-segment anomaly after fusion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyRecord {
    pub primary: f64,
    /// `None` unless a secondary modality was scored.
    pub secondary: Option<f64>,
    pub fused: f64,
    pub percentile_vs_baseline: Option<f64>,
}

/// Fuses the modalities per segment and ranks each fused score against the
/// baseline segments' fused scores.
///
/// With two modalities the result is `alpha * primary + (1 - alpha) * secondary`,
/// `alpha` clamped to `[0, 1]`.
pub fn score(
    primary: &Modality,
    secondary: Secondary<'_>,
    baseline: &[usize],
    alpha: f64,
) -> Vec<AnomalyRecord> {
    let alpha = if alpha.is_nan() { 0.5 } else { alpha.clamp(0.0, 1.0) };

    let fused: Vec<(f64, Option<f64>, f64)> = primary
        .anomaly
        .iter()
        .enumerate()
        .map(|(i, &p)| match secondary {
            Secondary::None => (p, None, p),
            Secondary::Neutral => (p, None, alpha * p),
            Secondary::Scored(m) => {
                let s = m.anomaly.get(i).copied().unwrap_or(0.0);
                (p, Some(s), alpha * p + (1.0 - alpha) * s)
            }
        })
        .collect();

    let base: Vec<f64> = baseline
        .iter()
        .filter_map(|&i| fused.get(i).map(|f| f.2))
        .collect();

    fused
        .into_iter()
        .map(|(primary, secondary, fused)| AnomalyRecord {
            primary,
            secondary,
            fused,
            percentile_vs_baseline: percentile_vs_baseline(fused, &base),
        })
        .collect()
}

/// Percentage of baseline scores at or below `value`; `None` for an empty baseline.
pub fn percentile_vs_baseline(value: f64, baseline_scores: &[f64]) -> Option<f64> {
    if baseline_scores.is_empty() {
        return None;
    }
    let below = baseline_scores.iter().filter(|&&b| b <= value).count();
    Some(below as f64 / baseline_scores.len() as f64 * 100.0)
}

/// Maps an overall anomaly to `100 * exp(-k * anomaly)`, clamped to `[0, 100]`.
pub fn consistency_score(overall_anomaly: f64, decay_k: f64) -> f64 {
    let score = 100.0 * (-decay_k * overall_anomaly).exp();
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// Request-level statistics over the fused anomaly sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub segments: usize,
    pub overall_anomaly: f64,
    pub spike_threshold: f64,
    pub spike_segments: Vec<usize>,
    pub spike_count: usize,
    pub spike_rate: f64,
    pub peak_anomaly: f64,
    pub consistency_score: f64,
    pub decay_k: f64,
}

pub fn summarize(records: &[AnomalyRecord], cfg: &DriftConfig) -> Summary {
    let fused: Vec<f64> = records.iter().map(|r| r.fused).collect();
    let overall = mean(&fused);
    let spike_segments: Vec<usize> = fused
        .iter()
        .enumerate()
        .filter(|&(_, &a)| a >= cfg.spike_threshold)
        .map(|(i, _)| i)
        .collect();
    let spike_count = spike_segments.len();
    let spike_rate = if fused.is_empty() {
        0.0
    } else {
        spike_count as f64 / fused.len() as f64
    };
    let peak_anomaly = fused.iter().copied().fold(None, |acc: Option<f64>, x| {
        Some(acc.map_or(x, |m| m.max(x)))
    });

    Summary {
        segments: fused.len(),
        overall_anomaly: overall,
        spike_threshold: cfg.spike_threshold,
        spike_segments,
        spike_count,
        spike_rate,
        peak_anomaly: peak_anomaly.unwrap_or(0.0),
        consistency_score: consistency_score(overall, cfg.decay_k),
        decay_k: cfg.decay_k,
    }
}

/// Which modality dominates the fused score on average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribution {
    pub driver: String,
    /// The driver's part of the combined weighted total, in `[0, 1]`.
    pub share: f64,
}

/// Compares `alpha * mean(primary)` with `(1 - alpha) * mean(secondary)`.
///
/// Ties go to the primary modality. A missing secondary contributes zero.
pub fn attribute(primary: &Modality, secondary: Option<&Modality>, alpha: f64, eps: f64) -> Attribution {
    let alpha = if alpha.is_nan() { 0.5 } else { alpha.clamp(0.0, 1.0) };
    let primary_part = alpha * primary.mean_anomaly();
    let secondary_part = (1.0 - alpha) * secondary.map_or(0.0, Modality::mean_anomaly);

    let (driver, top) = if primary_part >= secondary_part {
        (primary.name.clone(), primary_part)
    } else {
        // Only reachable when a secondary exists.
        (
            secondary.map_or_else(String::new, |m| m.name.clone()),
            secondary_part,
        )
    };
    Attribution {
        driver,
        share: top / (primary_part + secondary_part + eps),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-8;

    fn modality(name: &str, anomaly: &[f64]) -> Modality {
        Modality {
            name: name.into(),
            channels: Vec::new(),
            anomaly: anomaly.to_vec(),
        }
    }

    #[test]
    fn modality_averages_present_channels() {
        let a = ScoredChannel::with_stats(
            "a",
            vec![Some(2.0), Some(0.0)],
            ChannelStats { mean: 0.0, std: 1.0 },
        );
        let b = ScoredChannel::with_stats(
            "b",
            vec![Some(-4.0), None],
            ChannelStats { mean: 0.0, std: 1.0 },
        );
        let m = Modality::new("m", vec![a, b]);
        assert_eq!(m.anomaly, vec![3.0, 0.0]);
        assert_eq!(m.channel("b").unwrap().z[1], None);
    }

    #[test]
    fn modality_without_present_channels_is_zero() {
        let a = ScoredChannel::with_stats("a", vec![None, None], ChannelStats { mean: 0.0, std: 1.0 });
        let m = Modality::new("m", vec![a]);
        assert_eq!(m.anomaly, vec![0.0, 0.0]);
    }

    #[test]
    fn fusion_boundaries() {
        let p = modality("p", &[0.5, 1.5, 3.0]);
        let s = modality("s", &[2.0, 0.1, 0.7]);

        let at_one = score(&p, Secondary::Scored(&s), &[0, 1], 1.0);
        for (r, &want) in at_one.iter().zip(&p.anomaly) {
            assert_eq!(r.fused, want);
        }
        let at_zero = score(&p, Secondary::Scored(&s), &[0, 1], 0.0);
        for (r, &want) in at_zero.iter().zip(&s.anomaly) {
            assert_eq!(r.fused, want);
        }
        // Out-of-range alpha is clamped.
        assert_eq!(score(&p, Secondary::Scored(&s), &[0], 7.0), at_one);
    }

    #[test]
    fn fusion_modes() {
        let p = modality("p", &[1.0, 2.0]);
        let single = score(&p, Secondary::None, &[0], 0.25);
        assert_eq!(single[1].fused, 2.0);
        assert_eq!(single[1].secondary, None);

        let neutral = score(&p, Secondary::Neutral, &[0], 0.25);
        assert_eq!(neutral[1].fused, 0.5);

        let s = modality("s", &[0.0, 4.0]);
        let both = score(&p, Secondary::Scored(&s), &[0], 0.25);
        assert_eq!(both[1].fused, 0.25 * 2.0 + 0.75 * 4.0);
        assert_eq!(both[1].secondary, Some(4.0));
    }

    #[test]
    fn percentile_against_baseline() {
        let p = modality("p", &[1.0, 2.0, 3.0, 0.5]);
        let records = score(&p, Secondary::None, &[0, 1], 0.5);
        assert_eq!(records[0].percentile_vs_baseline, Some(50.0));
        assert_eq!(records[2].percentile_vs_baseline, Some(100.0));
        assert_eq!(records[3].percentile_vs_baseline, Some(0.0));

        let none = score(&p, Secondary::None, &[], 0.5);
        assert!(none.iter().all(|r| r.percentile_vs_baseline.is_none()));
    }

    #[test]
    fn consistency_bounds() {
        assert_eq!(consistency_score(0.0, 0.7), 100.0);
        for a in [0.0, 0.01, 0.5, 1.0, 5.0, 100.0, 1e6] {
            let c = consistency_score(a, 0.7);
            assert!((0.0..=100.0).contains(&c), "{a} -> {c}");
        }
        assert!(consistency_score(1.0, 0.7) < consistency_score(0.5, 0.7));
    }

    #[test]
    fn summary_spikes_inclusive() {
        let p = modality("p", &[0.2, 1.25, 2.0, 0.0]);
        let records = score(&p, Secondary::None, &[0, 1], 0.5);
        let s = summarize(&records, &DriftConfig::default());
        assert_eq!(s.segments, 4);
        assert_eq!(s.spike_segments, vec![1, 2]);
        assert_eq!(s.spike_count, 2);
        assert_eq!(s.spike_rate, 0.5);
        assert_eq!(s.peak_anomaly, 2.0);
        assert!((s.overall_anomaly - 0.8625).abs() < 1e-12);
        assert!((s.consistency_score - 100.0 * (-0.7f64 * 0.8625).exp()).abs() < 1e-9);
    }

    #[test]
    fn summary_of_nothing() {
        let s = summarize(&[], &DriftConfig::default());
        assert_eq!(s.segments, 0);
        assert_eq!(s.spike_rate, 0.0);
        assert_eq!(s.peak_anomaly, 0.0);
        assert_eq!(s.consistency_score, 100.0);
    }

    #[test]
    fn driver_attribution() {
        let p = modality("prosody", &[1.0, 1.0]);
        let s = modality("embeddings", &[3.0, 3.0]);
        let a = attribute(&p, Some(&s), 0.5, EPS);
        assert_eq!(a.driver, "embeddings");
        assert!((a.share - 0.75).abs() < 1e-6);

        let a = attribute(&p, Some(&s), 1.0, EPS);
        assert_eq!(a.driver, "prosody");
        assert!((a.share - 1.0).abs() < 1e-6);

        let a = attribute(&p, None, 0.5, EPS);
        assert_eq!(a.driver, "prosody");
    }
}
