use personalens_cluster::{kmeans_cosine, summarize_clusters, ClusterConfig};
use personalens_embed::Embedder;
use personalens_signals::extract_keywords;
use serde::Serialize;
use tracing::debug;

use crate::embedding::embed_texts;
use crate::error::AnalyzeError;
use crate::outcome::Outcome;
use crate::round::round_opt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterItem {
    pub index: usize,
    pub cluster_id: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterEntry {
    pub cluster_id: usize,
    pub size: usize,
    pub label: String,
    pub representative_index: Option<usize>,
    pub representative_text: Option<String>,
    pub top_keywords: Vec<String>,
    pub avg_similarity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClustersReport {
    pub embedding_model: String,
    pub count: usize,
    /// Effective cluster count after clamping to `[2, count]`.
    pub k: usize,
    pub seed: u64,
    pub iterations: usize,
    pub converged: bool,
    pub items: Vec<ClusterItem>,
    pub clusters: Vec<ClusterEntry>,
}

/// Groups non-empty texts into semantic clusters labelled by keywords.
pub fn analyze_text_clusters<S: AsRef<str>>(
    embedder: &dyn Embedder,
    texts: &[S],
    cfg: &ClusterConfig,
) -> Result<Outcome<ClustersReport>, AnalyzeError> {
    let cleaned: Vec<&str> = texts
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect();
    if cleaned.len() < 2 {
        return Ok(Outcome::insufficient(
            "Need at least 2 non-empty texts to cluster.",
        ));
    }

    let vectors = embed_texts(embedder, &cleaned)?;
    let km = kmeans_cosine(&vectors, cfg.k, cfg.seed, cfg.max_iterations)?;
    let summaries = summarize_clusters(&vectors, &km, cfg.keyword_count, |i| {
        extract_keywords(cleaned[i], cfg.keyword_count)
    });
    debug!(count = cleaned.len(), k = km.k, iterations = km.iterations, "text clusters");

    let clusters = summaries
        .into_iter()
        .map(|s| ClusterEntry {
            cluster_id: s.cluster_id,
            size: s.size,
            label: s.label,
            representative_index: s.representative_index,
            representative_text: s.representative_index.map(|i| cleaned[i].to_string()),
            top_keywords: s.top_keywords,
            avg_similarity: round_opt(s.avg_similarity, 4),
        })
        .collect();
    let items = km
        .assignments
        .iter()
        .enumerate()
        .map(|(index, &cluster_id)| ClusterItem { index, cluster_id })
        .collect();

    Ok(Outcome::Ready(ClustersReport {
        embedding_model: embedder.model_name().to_string(),
        count: cleaned.len(),
        k: km.k,
        seed: cfg.seed,
        iterations: km.iterations,
        converged: km.converged,
        items,
        clusters,
    }))
}
