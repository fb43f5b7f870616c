use crate::config::EmbedConfig;
use crate::embed::Embedder;
use crate::error::EmbedError;
use crate::payload::Payload;
use crate::vector::l2_normalize;

pub const HASH_MODEL: &str = "feature-hash-v1";
const HASH_DEFAULT_DIM: usize = 256;
const TOKEN_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Deterministic text embedder using signed feature hashing.
///
/// Each lowercase alphanumeric token and each character trigram of the
/// token (with `#` boundary markers) is hashed with FNV-1a into one of
/// `dimension` buckets; the top hash bit selects the sign. The resulting
/// bag is L2-normalized.
pub struct HashEmbedder {
    model: String,
    dim: usize,
}

impl HashEmbedder {
    pub fn new() -> Self {
        Self::with_config(EmbedConfig::default())
    }

    pub fn with_config(cfg: EmbedConfig) -> Self {
        Self {
            model: if cfg.model.is_empty() {
                HASH_MODEL.to_string()
            } else {
                cfg.model
            },
            dim: if cfg.dimension == 0 {
                HASH_DEFAULT_DIM
            } else {
                cfg.dimension
            },
        }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];
        let lower = text.to_lowercase();
        for tok in lower.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            self.add_feature(&mut v, tok, TOKEN_WEIGHT);
            let marked: Vec<char> = format!("#{tok}#").chars().collect();
            for w in marked.windows(3) {
                let gram: String = w.iter().collect();
                self.add_feature(&mut v, &gram, TRIGRAM_WEIGHT);
            }
        }
        l2_normalize(&mut v);
        v
    }

    fn add_feature(&self, v: &mut [f32], feature: &str, weight: f32) {
        let h = fnv1a(feature.as_bytes());
        let idx = (h % self.dim as u64) as usize;
        let sign = if h >> 63 == 1 { -1.0 } else { 1.0 };
        v[idx] += sign * weight;
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, items: &[Payload]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if items.is_empty() {
            return Err(EmbedError::EmptyInput);
        }
        items
            .iter()
            .map(|item| match item {
                Payload::Text(text) => Ok(self.embed_text(text)),
                other => Err(EmbedError::Unsupported {
                    model: self.model.clone(),
                    kind: other.kind(),
                }),
            })
            .collect()
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn fnv1a(data: &[u8]) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in data {
        h ^= b as u64;
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    h
}
