use personalens_drift::{
    centroid_stats, drift_score, ordered_windows, parse_date, score, select_baseline,
    similarity_set, summarize, ChannelStats, Modality, ScoredChannel, Secondary, Segment,
    Summary,
};
use personalens_embed::vector::dot;
use personalens_embed::Embedder;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::TimelineConfig;
use crate::embedding::embed_texts;
use crate::error::AnalyzeError;
use crate::outcome::Outcome;
use crate::round::{round, round_stats, round_summary};

/// One dated entry. Entries with a blank date or text are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub text: String,
}

impl TimelineItem {
    pub fn new(date: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            text: text.into(),
        }
    }
}

/// Drift between consecutive entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairwiseDrift {
    pub from_index: usize,
    pub to_index: usize,
    pub from_date: String,
    pub to_date: String,
    pub similarity: f64,
    pub drift_score: f64,
}

/// Centroid statistics of one rolling window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowDrift {
    pub start_index: usize,
    /// Inclusive.
    pub end_index: usize,
    pub start_date: String,
    pub end_date: String,
    pub count: usize,
    pub mean_similarity: f64,
    pub min_similarity: f64,
    pub max_similarity: f64,
    pub std_similarity: f64,
    pub drift_score: f64,
    /// Global (sorted) indices.
    pub outlier_indices: Vec<usize>,
}

/// Per-entry deviation from the leading baseline entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineAnomaly {
    pub index: usize,
    pub date: String,
    pub distance: f64,
    pub z: f64,
    pub anomaly: f64,
    pub percentile_vs_baseline: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBaseline {
    pub indices: Vec<usize>,
    pub distance: ChannelStats,
    pub items: Vec<TimelineAnomaly>,
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineReport {
    pub embedding_model: String,
    pub count: usize,
    pub window: usize,
    pub stride: usize,
    pub dates: Vec<String>,
    pub pairwise: Vec<PairwiseDrift>,
    pub windows: Vec<WindowDrift>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<TimelineBaseline>,
    pub warnings: Vec<String>,
}

/// Sorts entries by date and measures how the writing drifts over time.
///
/// An unparsable date fails the whole request because the order cannot be
/// established.
pub fn analyze_text_timeline(
    embedder: &dyn Embedder,
    items: &[TimelineItem],
    cfg: &TimelineConfig,
) -> Result<Outcome<TimelineReport>, AnalyzeError> {
    let mut cleaned = Vec::with_capacity(items.len());
    for item in items {
        let date = item.date.trim();
        let text = item.text.trim();
        if date.is_empty() || text.is_empty() {
            continue;
        }
        cleaned.push((parse_date(date)?, text));
    }
    if cleaned.len() < 2 {
        return Ok(Outcome::insufficient(
            "Need at least 2 valid (date, text) items.",
        ));
    }

    cleaned.sort_by_key(|(d, _)| *d);
    let dates: Vec<String> = cleaned.iter().map(|(d, _)| d.format("%Y-%m-%d").to_string()).collect();
    let texts: Vec<&str> = cleaned.iter().map(|(_, t)| *t).collect();
    let vectors = embed_texts(embedder, &texts)?;
    let n = vectors.len();
    let eps = cfg.drift.eps;

    let pairwise = (1..n)
        .map(|i| {
            let sim = dot(&vectors[i - 1], &vectors[i]);
            PairwiseDrift {
                from_index: i - 1,
                to_index: i,
                from_date: dates[i - 1].clone(),
                to_date: dates[i].clone(),
                similarity: round(sim, 4),
                drift_score: round(drift_score(sim), 2),
            }
        })
        .collect();

    let mut windows = Vec::new();
    let segments = ordered_windows(&vectors, cfg.window, cfg.stride);
    for seg in &segments {
        let Some(set) = similarity_set(seg.payload, eps)? else {
            continue;
        };
        windows.push(WindowDrift {
            start_index: seg.start,
            end_index: seg.end - 1,
            start_date: dates[seg.start].clone(),
            end_date: dates[seg.end - 1].clone(),
            count: seg.len(),
            mean_similarity: round(set.mean, 4),
            min_similarity: round(set.min, 4),
            max_similarity: round(set.max, 4),
            std_similarity: round(set.std, 4),
            drift_score: round(set.drift_score, 2),
            outlier_indices: set.outliers.iter().map(|&i| seg.start + i).collect(),
        });
    }
    let window = segments.first().map(Segment::len).unwrap_or(n);

    let mut warnings = Vec::new();
    let baseline = match cfg.baseline_items {
        Some(span) => Some(score_against_baseline(&vectors, &dates, span, cfg, &mut warnings)?),
        None => None,
    };
    debug!(count = n, windows = windows.len(), "text timeline");

    Ok(Outcome::Ready(TimelineReport {
        embedding_model: embedder.model_name().to_string(),
        count: n,
        window,
        stride: cfg.stride.max(1),
        dates,
        pairwise,
        windows,
        baseline,
        warnings,
    }))
}

fn score_against_baseline(
    vectors: &[Vec<f32>],
    dates: &[String],
    span: usize,
    cfg: &TimelineConfig,
    warnings: &mut Vec<String>,
) -> Result<TimelineBaseline, AnalyzeError> {
    let entries: Vec<Segment<()>> = (0..vectors.len())
        .map(|i| Segment {
            start: i,
            end: i + 1,
            payload: (),
        })
        .collect();
    let selection = select_baseline(&entries, span);
    if let Some(w) = selection.warning() {
        warn!(span, "timeline baseline degraded");
        warnings.push(w.to_string());
    }

    let cs = centroid_stats(vectors, &selection.indices, cfg.drift.eps)?;
    let channel = ScoredChannel::with_stats(
        "distance",
        cs.distances.iter().copied().map(Some).collect(),
        cs.stats,
    );
    let modality = Modality::new("semantic", vec![channel]);
    let records = score(&modality, Secondary::None, &selection.indices, cfg.drift.alpha);
    let summary = summarize(&records, &cfg.drift);

    let z = &modality.channels[0].z;
    let items = records
        .iter()
        .enumerate()
        .map(|(i, r)| TimelineAnomaly {
            index: i,
            date: dates[i].clone(),
            distance: round(cs.distances[i], 6),
            z: round(z[i].unwrap_or(0.0), 4),
            anomaly: round(r.fused, 4),
            percentile_vs_baseline: r.percentile_vs_baseline.map(|p| round(p, 1)),
        })
        .collect();

    Ok(TimelineBaseline {
        indices: selection.indices,
        distance: round_stats(cs.stats, 6),
        items,
        summary: round_summary(summary),
    })
}
