//! Embedding providers for PersonaLens.
//!
//! Every provider maps a batch of [`Payload`]s to L2-normalized vectors of a
//! fixed dimensionality, one vector per payload, in input order. The core
//! treats the provider as an opaque synchronous capability: a failure
//! propagates to the caller and is never retried here.
//!
//! # Providers
//!
//! | Provider | Payloads | Notes |
//! |----------|----------|-------|
//! | [`HashEmbedder`] | text | Signed feature hashing of tokens and trigrams |
//! | [`FbankEmbedder`] | audio | Mean/std pooled log mel filterbank |
//! | [`FrameEmbedder`] | video | Pooled RGB histogram and brightness |
//! | [`OpenAiCompat`] | text | OpenAI-compatible `/embeddings` endpoint |
//!
//! The local providers are deterministic: identical input always yields an
//! identical vector, which makes them usable as test doubles.
//!
//! # Sharing
//!
//! [`SharedEmbedder`] wraps a fallible factory behind a one-time
//! initialization guard. Construct it once at process start and pass
//! `&dyn Embedder` (from [`SharedEmbedder::get`]) into each request.

pub mod config;
pub mod embed;
pub mod error;
pub mod fbank;
pub mod frame;
pub mod hash;
pub mod openai_compat;
pub mod payload;
pub mod shared;
pub mod vector;

pub use config::EmbedConfig;
pub use embed::Embedder;
pub use error::EmbedError;
pub use fbank::{FbankConfig, FbankEmbedder};
pub use frame::FrameEmbedder;
pub use hash::HashEmbedder;
pub use openai_compat::OpenAiCompat;
pub use payload::{uniform_pick, Frame, Payload, PayloadKind};
pub use shared::SharedEmbedder;
