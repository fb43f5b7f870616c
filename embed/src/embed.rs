use crate::error::EmbedError;
use crate::payload::Payload;

/// Embedder converts raw payloads into dense, L2-normalized f32 vectors.
///
/// The returned batch has the same length and order as `items`, and every
/// vector has [`Embedder::dimension`] entries. Identical input under the
/// same provider configuration yields identical output.
///
/// Implementations must be safe for concurrent use (Send + Sync).
pub trait Embedder: Send + Sync {
    /// Return one embedding per payload.
    fn embed(&self, items: &[Payload]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Return the dimensionality of the output vectors.
    fn dimension(&self) -> usize;

    /// Return a human-readable model identifier for reports.
    fn model_name(&self) -> &str;
}
