use personalens_drift::{
    attribute, centroid_stats, outlier_indices, score, stats, summarize, DriftConfig, Modality,
    ScoredChannel, Secondary, Summary,
};
use personalens_embed::vector::dot;
use personalens_embed::Embedder;
use personalens_signals::{extract_keywords, lexical_signals, reason_tags, LexicalSignals};
use serde::Serialize;
use tracing::debug;

use crate::embedding::embed_texts;
use crate::error::AnalyzeError;
use crate::outcome::Outcome;
use crate::round::{round, round_opt, round_summary};

const KEYWORDS_PER_ITEM: usize = 6;

/// Explanations for one text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonItem {
    /// Position in the caller's original list.
    pub index: usize,
    pub signals: LexicalSignals,
    pub semantic_similarity_to_centroid: Option<f64>,
    pub semantic_outlier: bool,
    pub reason_tags: Vec<String>,
    pub keywords: Vec<String>,
    pub lexical_anomaly: Option<f64>,
    pub semantic_anomaly: Option<f64>,
    pub fused_anomaly: Option<f64>,
}

/// Set-level blend of the lexical and semantic channels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonsAnomaly {
    pub alpha: f64,
    pub summary: Summary,
    pub driver: String,
    pub driver_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonsReport {
    pub embedding_model: Option<String>,
    pub count: usize,
    pub items: Vec<ReasonItem>,
    pub anomaly: Option<ReasonsAnomaly>,
}

/// Explains each text with lexical signals, keywords and, for two or more
/// texts, its position relative to the set's semantic centroid.
///
/// `indices` restricts the analysis to a subset; out-of-range entries are
/// dropped. The fused anomaly blends the mean |z| of the lexical metrics
/// (weight `alpha`) with the |z| of the centroid distance.
pub fn analyze_text_reasons<S: AsRef<str>>(
    embedder: &dyn Embedder,
    texts: &[S],
    indices: Option<&[i64]>,
    cfg: &DriftConfig,
) -> Result<Outcome<ReasonsReport>, AnalyzeError> {
    let cleaned: Vec<&str> = texts.iter().map(|t| t.as_ref().trim()).collect();
    if cleaned.is_empty() {
        return Ok(Outcome::insufficient("No texts provided."));
    }

    let original: Vec<usize> = match indices {
        Some(idx) => idx
            .iter()
            .filter_map(|&i| usize::try_from(i).ok())
            .filter(|&i| i < cleaned.len())
            .collect(),
        None => (0..cleaned.len()).collect(),
    };
    let subset: Vec<&str> = original.iter().map(|&i| cleaned[i]).collect();
    let signals: Vec<LexicalSignals> = subset.iter().map(|t| lexical_signals(t)).collect();

    let mut sims: Option<Vec<f64>> = None;
    let mut outliers: Vec<usize> = Vec::new();
    let mut fusion: Option<(Modality, Modality, Vec<f64>, ReasonsAnomaly)> = None;

    if subset.len() >= 2 {
        let vectors = embed_texts(embedder, &subset)?;
        let everyone: Vec<usize> = (0..subset.len()).collect();
        let cs = centroid_stats(&vectors, &everyone, cfg.eps)?;

        let s: Vec<f64> = vectors.iter().map(|v| dot(v, &cs.centroid)).collect();
        outliers = outlier_indices(&s, stats::mean(&s), stats::sample_std(&s));
        sims = Some(s);

        let lexical = lexical_modality(&signals, &everyone, cfg.eps);
        let semantic = Modality::new(
            "semantic",
            vec![ScoredChannel::with_stats(
                "centroidDistance",
                cs.distances.iter().copied().map(Some).collect(),
                cs.stats,
            )],
        );
        let records = score(&lexical, Secondary::Scored(&semantic), &everyone, cfg.alpha);
        let fused: Vec<f64> = records.iter().map(|r| r.fused).collect();
        let attribution = attribute(&lexical, Some(&semantic), cfg.alpha, cfg.eps);
        let summary = ReasonsAnomaly {
            alpha: cfg.clamped_alpha(),
            summary: round_summary(summarize(&records, cfg)),
            driver: attribution.driver,
            driver_share: round(attribution.share, 3),
        };
        fusion = Some((lexical, semantic, fused, summary));
    }

    let items = subset
        .iter()
        .zip(signals)
        .enumerate()
        .map(|(i, (text, sig))| {
            let is_outlier = outliers.contains(&i);
            let (lexical, semantic, fused) = match &fusion {
                Some((l, s, f, _)) => (Some(l.anomaly[i]), Some(s.anomaly[i]), Some(f[i])),
                None => (None, None, None),
            };
            ReasonItem {
                index: original[i],
                reason_tags: reason_tags(&sig, is_outlier),
                signals: sig,
                semantic_similarity_to_centroid: round_opt(sims.as_ref().map(|s| s[i]), 4),
                semantic_outlier: is_outlier,
                keywords: extract_keywords(text, KEYWORDS_PER_ITEM),
                lexical_anomaly: round_opt(lexical, 4),
                semantic_anomaly: round_opt(semantic, 4),
                fused_anomaly: round_opt(fused, 4),
            }
        })
        .collect();
    debug!(count = subset.len(), outliers = outliers.len(), "text reasons");

    Ok(Outcome::Ready(ReasonsReport {
        embedding_model: (subset.len() >= 2).then(|| embedder.model_name().to_string()),
        count: subset.len(),
        items,
        anomaly: fusion.map(|(_, _, _, a)| a),
    }))
}

/// Scores each lexical metric against the whole set.
fn lexical_modality(signals: &[LexicalSignals], baseline: &[usize], eps: f64) -> Modality {
    let metric = |f: fn(&LexicalSignals) -> f64| -> Vec<Option<f64>> {
        signals.iter().map(|s| Some(f(s))).collect()
    };
    Modality::new(
        "lexical",
        vec![
            ScoredChannel::new("score", metric(|s| s.score as f64), baseline, eps),
            ScoredChannel::new("metricHits", metric(|s| s.metric_hits as f64), baseline, eps),
            ScoredChannel::new(
                "buzzwordPer100Words",
                metric(|s| s.buzzword_per_100_words),
                baseline,
                eps,
            ),
            ScoredChannel::new("hedgeHits", metric(|s| s.hedge_hits as f64), baseline, eps),
            ScoredChannel::new("absoluteHits", metric(|s| s.absolute_hits as f64), baseline, eps),
        ],
    )
}
