use personalens_cluster::ClusterError;
use personalens_drift::DriftError;
use personalens_embed::EmbedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("analyze: {0}")]
    Embed(#[from] EmbedError),

    #[error("analyze: {0}")]
    Drift(#[from] DriftError),

    #[error("analyze: {0}")]
    Cluster(#[from] ClusterError),

    #[error("analyze: provider returned {got} embeddings for {expected} inputs")]
    EmbeddingCount { expected: usize, got: usize },
}
