//! CLI utilities for personalens.
//!
//! Request loading, output formatting and the defaults file shared by the
//! `personalens` binary.

pub mod config;
pub mod output;
pub mod request;

pub use config::{load_config, AnalysisDefaults, EmbedderKind, EmbedderSettings};
pub use output::{Output, OutputFormat};
pub use request::{
    decode_pcm16le, load_request, load_request_from_stdin, parse_request, read_request,
    FrameEntry, ReasonsRequest, RequestError, TextsRequest, TimelineRequest, VideoRequest,
};
