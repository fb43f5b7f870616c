//! Video visual shift command.

use clap::Args;

use personalens_analyze::analyze_video_shift;
use personalens_cli::VideoRequest;
use personalens_embed::FrameEmbedder;
use tracing::info;

use super::{get_defaults, load_input, output_result};
use crate::Cli;

/// Visual shift of timestamped frames.
///
/// The request lists frames as `{time, width, height, rgb}` where `rgb` is
/// base64 of raw RGB24 pixels.
#[derive(Args)]
pub struct VideoCommand {
    /// Frames embedded per segment
    #[arg(long)]
    frames_per_segment: Option<usize>,

    /// Frames after this many seconds are ignored
    #[arg(long)]
    max_seconds: Option<f64>,
}

impl VideoCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let defaults = get_defaults(cli)?;
        let mut cfg = defaults.video;
        if let Some(n) = self.frames_per_segment {
            cfg.frames_per_segment = n;
        }
        if let Some(m) = self.max_seconds {
            cfg.max_seconds = m;
        }

        let req: VideoRequest = load_input(cli)?;
        let frames = req.decode()?;
        info!(frames = frames.len(), "analyzing video shift");

        let report = analyze_video_shift(&FrameEmbedder::new(), &frames, &cfg)?;
        output_result(cli, &report)
    }
}
