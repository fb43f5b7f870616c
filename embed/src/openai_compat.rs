use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EmbedConfig;
use crate::embed::Embedder;
use crate::error::EmbedError;
use crate::payload::Payload;
use crate::vector::l2_normalize;

pub const MODEL_OPENAI_3_SMALL: &str = "text-embedding-3-small";

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENAI_MAX_BATCH: usize = 2048;
const OPENAI_DEFAULT_DIM: usize = 1536;

/// Text embedder backed by an OpenAI-compatible `/embeddings` endpoint.
///
/// Works with any provider that speaks the same request/response format
/// via [`EmbedConfig::with_base_url`]. Calls are blocking.
pub struct OpenAiCompat {
    api_key: String,
    model: String,
    dim: usize,
    base_url: String,
    max_batch: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    dimensions: usize,
    encoding_format: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f64>,
}

impl OpenAiCompat {
    pub fn new(api_key: &str) -> Self {
        Self::with_config(api_key, EmbedConfig::default())
    }

    pub fn with_config(api_key: &str, cfg: EmbedConfig) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: if cfg.model.is_empty() {
                MODEL_OPENAI_3_SMALL.to_string()
            } else {
                cfg.model
            },
            dim: if cfg.dimension == 0 {
                OPENAI_DEFAULT_DIM
            } else {
                cfg.dimension
            },
            base_url: if cfg.base_url.is_empty() {
                OPENAI_BASE_URL.to_string()
            } else {
                cfg.base_url.trim_end_matches('/').to_string()
            },
            max_batch: if cfg.max_batch == 0 {
                OPENAI_MAX_BATCH
            } else {
                cfg.max_batch
            },
        }
    }

    fn call_api(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let url = format!("{}/embeddings", self.base_url);
        debug!(url = %url, batch = texts.len(), model = %self.model, "requesting embeddings");

        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions: self.dim,
            encoding_format: "float",
        };
        let mut resp = ureq::post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send_json(&body)
            .map_err(|e| EmbedError::Api(e.to_string()))?;
        let data: EmbeddingResponse = resp
            .body_mut()
            .read_json()
            .map_err(|e| EmbedError::Api(e.to_string()))?;

        collect_by_index(texts.len(), data.data)
    }
}

/// Places response rows by their `index` field; the API may reorder them.
fn collect_by_index(batch_size: usize, rows: Vec<EmbeddingData>) -> Result<Vec<Vec<f32>>, EmbedError> {
    let mut vecs: Vec<Option<Vec<f32>>> = vec![None; batch_size];
    for item in rows {
        if item.index >= batch_size {
            return Err(EmbedError::UnexpectedIndex {
                index: item.index,
                batch_size,
            });
        }
        let mut v: Vec<f32> = item.embedding.iter().map(|&x| x as f32).collect();
        l2_normalize(&mut v);
        vecs[item.index] = Some(v);
    }
    vecs.into_iter()
        .enumerate()
        .map(|(i, v)| v.ok_or(EmbedError::MissingIndex(i)))
        .collect()
}

impl Embedder for OpenAiCompat {
    fn embed(&self, items: &[Payload]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if items.is_empty() {
            return Err(EmbedError::EmptyInput);
        }
        let texts = items
            .iter()
            .map(|item| match item {
                Payload::Text(t) => Ok(t.as_str()),
                other => Err(EmbedError::Unsupported {
                    model: self.model.clone(),
                    kind: other.kind(),
                }),
            })
            .collect::<Result<Vec<&str>, EmbedError>>()?;

        let mut result = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.max_batch) {
            result.extend(self.call_api(chunk)?);
        }
        Ok(result)
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
