//! PersonaLens CLI - baseline-relative drift and anomaly reports.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    AudioCommand, ClustersCommand, DriftCommand, ReasonsCommand, SignalsCommand, TimelineCommand,
    VideoCommand,
};

/// PersonaLens CLI - baseline-relative drift and anomaly reports.
///
/// Every report compares an input against its own baseline:
///   - text sets: semantic drift, lexical signals, reasons and clusters
///   - dated texts: timeline drift
///   - audio: prosody + embedding delivery shift
///   - video frames: visual shift
///
/// Defaults are read from ~/.personalens/config.yaml when present.
#[derive(Parser)]
#[command(name = "personalens")]
#[command(about = "Baseline-relative drift and anomaly reports")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.personalens/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Input request file (YAML or JSON, default: stdin)
    #[arg(short = 'f', long = "file", global = true)]
    pub input: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lexical signals and keywords per text
    Signals(SignalsCommand),
    /// Semantic drift of a text set around its centroid
    Drift(DriftCommand),
    /// Drift over dated texts
    Timeline(TimelineCommand),
    /// Lexical and semantic reasons per text, with fused anomaly
    Reasons(ReasonsCommand),
    /// Seeded k-means clusters of a text set
    Clusters(ClustersCommand),
    /// Delivery shift of a raw PCM16LE mono recording
    Audio(AudioCommand),
    /// Visual shift of timestamped frames
    Video(VideoCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Signals(cmd) => cmd.run(&cli),
        Commands::Drift(cmd) => cmd.run(&cli),
        Commands::Timeline(cmd) => cmd.run(&cli),
        Commands::Reasons(cmd) => cmd.run(&cli),
        Commands::Clusters(cmd) => cmd.run(&cli),
        Commands::Audio(cmd) => cmd.run(&cli),
        Commands::Video(cmd) => cmd.run(&cli),
    }
}
