use personalens_embed::vector::l2_normalize;
use personalens_embed::{Embedder, Payload};
use tracing::debug;

use crate::error::AnalyzeError;

/// Embeds `payloads` and returns one unit-length vector per payload.
pub(crate) fn embed_payloads(
    embedder: &dyn Embedder,
    payloads: &[Payload],
) -> Result<Vec<Vec<f32>>, AnalyzeError> {
    let mut vectors = embedder.embed(payloads)?;
    if vectors.len() != payloads.len() {
        return Err(AnalyzeError::EmbeddingCount {
            expected: payloads.len(),
            got: vectors.len(),
        });
    }
    for v in vectors.iter_mut() {
        l2_normalize(v);
    }
    debug!(
        model = embedder.model_name(),
        count = vectors.len(),
        dim = vectors.first().map(Vec::len).unwrap_or(0),
        "embedded payloads"
    );
    Ok(vectors)
}

pub(crate) fn embed_texts<S: AsRef<str>>(
    embedder: &dyn Embedder,
    texts: &[S],
) -> Result<Vec<Vec<f32>>, AnalyzeError> {
    let payloads: Vec<Payload> = texts.iter().map(|t| Payload::text(t.as_ref())).collect();
    embed_payloads(embedder, &payloads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use personalens_embed::{EmbedError, HashEmbedder};

    struct Short;

    impl Embedder for Short {
        fn embed(&self, _items: &[Payload]) -> Result<Vec<Vec<f32>>, EmbedError> {
            Ok(vec![vec![3.0, 4.0]])
        }
        fn dimension(&self) -> usize {
            2
        }
        fn model_name(&self) -> &str {
            "short"
        }
    }

    #[test]
    fn count_mismatch_is_an_error() {
        let err = embed_texts(&Short, &["a", "b"]).unwrap_err();
        assert!(matches!(err, AnalyzeError::EmbeddingCount { expected: 2, got: 1 }));
    }

    #[test]
    fn vectors_are_normalized() {
        let v = embed_texts(&Short, &["a"]).unwrap();
        assert!((v[0][0] - 0.6).abs() < 1e-6 && (v[0][1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn provider_errors_propagate() {
        let err = embed_payloads(&HashEmbedder::new(), &[]).unwrap_err();
        assert!(matches!(err, AnalyzeError::Embed(EmbedError::EmptyInput)));
    }
}
