//! Presentation rounding for report fields.

use personalens_drift::{ChannelStats, Summary};

pub(crate) fn round(x: f64, places: i32) -> f64 {
    let p = 10f64.powi(places);
    (x * p).round() / p
}

pub(crate) fn round_opt(x: Option<f64>, places: i32) -> Option<f64> {
    x.map(|v| round(v, places))
}

pub(crate) fn round_all(xs: &[f64], places: i32) -> Vec<f64> {
    xs.iter().map(|&x| round(x, places)).collect()
}

pub(crate) fn round_stats(s: ChannelStats, places: i32) -> ChannelStats {
    ChannelStats {
        mean: round(s.mean, places),
        std: round(s.std, places),
    }
}

pub(crate) fn round_summary(s: Summary) -> Summary {
    Summary {
        overall_anomaly: round(s.overall_anomaly, 4),
        spike_rate: round(s.spike_rate, 3),
        peak_anomaly: round(s.peak_anomaly, 4),
        consistency_score: round(s.consistency_score, 1),
        ..s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_places() {
        assert_eq!(round(0.123456, 4), 0.1235);
        assert_eq!(round(99.95, 0), 100.0);
        assert_eq!(round_opt(None, 2), None);
        assert_eq!(round_all(&[1.26, 2.0], 1), vec![1.3, 2.0]);
    }
}
