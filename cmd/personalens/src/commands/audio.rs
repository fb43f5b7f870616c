//! Audio delivery shift command.

use clap::Args;

use personalens_analyze::{analyze_audio_shift, EmbeddingChannel};
use personalens_cli::decode_pcm16le;
use personalens_embed::{FbankEmbedder, SharedEmbedder};
use tracing::info;

use super::{get_defaults, output_result};
use crate::Cli;

/// Delivery shift of a raw PCM16LE mono recording.
///
/// Decode other formats first, e.g.
/// `ffmpeg -i talk.mp3 -ac 1 -ar 16000 -f s16le talk.pcm`.
#[derive(Args)]
pub struct AudioCommand {
    /// Raw little-endian 16-bit mono PCM file
    pcm: String,

    /// Sample rate of the PCM data
    #[arg(long, default_value_t = 16000)]
    sample_rate: u32,

    /// Window length in seconds
    #[arg(long)]
    window_sec: Option<f64>,

    /// Baseline span in seconds
    #[arg(long)]
    baseline_sec: Option<f64>,

    /// Audio beyond this many seconds is ignored
    #[arg(long)]
    max_audio_sec: Option<f64>,

    /// Score prosody only
    #[arg(long)]
    no_embeddings: bool,
}

impl AudioCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let defaults = get_defaults(cli)?;
        let mut cfg = defaults.audio;
        if let Some(w) = self.window_sec {
            cfg.drift.window_sec = w;
        }
        if let Some(b) = self.baseline_sec {
            cfg.drift.baseline_sec = b;
        }
        if let Some(m) = self.max_audio_sec {
            cfg.max_audio_sec = m;
        }
        if self.no_embeddings {
            cfg.use_embeddings = false;
        }

        let data = std::fs::read(&self.pcm)
            .map_err(|e| anyhow::anyhow!("read {}: {}", self.pcm, e))?;
        let samples = decode_pcm16le(&data);
        info!(
            samples = samples.len(),
            sample_rate = self.sample_rate,
            "analyzing audio shift"
        );

        let shared = SharedEmbedder::new(|| Ok(Box::new(FbankEmbedder::new())));
        let failure;
        let channel = match shared.get() {
            Ok(embedder) => EmbeddingChannel::Ready(embedder),
            Err(e) => {
                failure = e.to_string();
                EmbeddingChannel::Unavailable(&failure)
            }
        };

        let report = analyze_audio_shift(&samples, self.sample_rate, channel, &cfg)?;
        output_result(cli, &report)
    }
}
