use personalens_drift::similarity_set;
use personalens_embed::Embedder;
use serde::Serialize;
use tracing::debug;

use crate::embedding::embed_texts;
use crate::error::AnalyzeError;
use crate::outcome::Outcome;
use crate::round::{round, round_all};
use crate::EPS;

/// Semantic consistency of a set of texts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDriftReport {
    pub embedding_model: String,
    pub count: usize,
    pub embedding_dim: usize,
    pub similarity_to_centroid: Vec<f64>,
    pub mean_similarity: f64,
    pub min_similarity: f64,
    pub max_similarity: f64,
    pub std_similarity: f64,
    /// `(1 - mean similarity) * 100`, clamped to `[0, 100]`.
    pub drift_score: f64,
    /// Positions in the cleaned (trimmed, non-empty) input.
    pub outlier_indices: Vec<usize>,
}

/// Compares every non-empty text with the centroid of all of them.
pub fn analyze_text_drift<S: AsRef<str>>(
    embedder: &dyn Embedder,
    texts: &[S],
) -> Result<Outcome<TextDriftReport>, AnalyzeError> {
    let cleaned: Vec<&str> = texts
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect();
    if cleaned.len() < 2 {
        return Ok(Outcome::insufficient(
            "Need at least 2 non-empty texts to compute drift.",
        ));
    }

    let vectors = embed_texts(embedder, &cleaned)?;
    let dim = vectors.first().map(Vec::len).unwrap_or(0);
    let Some(set) = similarity_set(&vectors, EPS)? else {
        return Ok(Outcome::insufficient("No embeddings returned."));
    };
    debug!(count = cleaned.len(), outliers = set.outliers.len(), "text drift");

    Ok(Outcome::Ready(TextDriftReport {
        embedding_model: embedder.model_name().to_string(),
        count: cleaned.len(),
        embedding_dim: dim,
        similarity_to_centroid: round_all(&set.similarities, 4),
        mean_similarity: round(set.mean, 4),
        min_similarity: round(set.min, 4),
        max_similarity: round(set.max, 4),
        std_similarity: round(set.std, 4),
        drift_score: round(set.drift_score, 2),
        outlier_indices: set.outliers,
    }))
}
