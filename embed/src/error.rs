use thiserror::Error;

use crate::payload::PayloadKind;

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("embed: empty input")]
    EmptyInput,

    #[error("embed: payload {0} has no content")]
    EmptyPayload(usize),

    #[error("embed: {model} does not accept {kind} payloads")]
    Unsupported { model: String, kind: PayloadKind },

    #[error("embed: API error: {0}")]
    Api(String),

    #[error("embed: missing embedding for index {0}")]
    MissingIndex(usize),

    #[error("embed: unexpected embedding index {index} for batch size {batch_size}")]
    UnexpectedIndex { index: usize, batch_size: usize },

    #[error("embed: provider initialization failed: {0}")]
    Init(String),
}
