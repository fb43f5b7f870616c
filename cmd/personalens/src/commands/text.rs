//! Text commands: signals, drift, timeline, reasons and clusters.

use clap::Args;
use serde::Serialize;

use personalens_analyze::{
    analyze_text_clusters, analyze_text_drift, analyze_text_reasons, analyze_text_timeline,
};
use personalens_cli::{ReasonsRequest, TextsRequest, TimelineRequest};
use personalens_signals::{extract_keywords, lexical_signals, LexicalSignals};
use tracing::info;

use super::{get_defaults, load_input, output_result, text_embedder};
use crate::Cli;

/// Lexical signals per text. No embeddings are computed.
#[derive(Args)]
pub struct SignalsCommand {
    /// Keywords kept per text
    #[arg(long, default_value_t = 6)]
    keywords: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignalsItem {
    index: usize,
    signals: LexicalSignals,
    keywords: Vec<String>,
}

impl SignalsCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let req: TextsRequest = load_input(cli)?;
        let items: Vec<SignalsItem> = req
            .texts
            .iter()
            .enumerate()
            .map(|(index, text)| SignalsItem {
                index,
                signals: lexical_signals(text),
                keywords: extract_keywords(text, self.keywords),
            })
            .collect();
        output_result(cli, &items)
    }
}

/// Semantic drift of a text set.
#[derive(Args)]
pub struct DriftCommand {}

impl DriftCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let defaults = get_defaults(cli)?;
        let req: TextsRequest = load_input(cli)?;
        info!(texts = req.texts.len(), "analyzing text drift");

        let embedder = text_embedder(&defaults.embedder);
        let report = analyze_text_drift(embedder.get()?, &req.texts)?;
        output_result(cli, &report)
    }
}

/// Drift over dated texts.
#[derive(Args)]
pub struct TimelineCommand {
    /// Items per rolling window
    #[arg(long)]
    window: Option<usize>,

    /// Items between window starts
    #[arg(long)]
    stride: Option<usize>,

    /// Score every item against the first N items
    #[arg(long)]
    baseline_items: Option<usize>,
}

impl TimelineCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let defaults = get_defaults(cli)?;
        let req: TimelineRequest = load_input(cli)?;

        let mut cfg = defaults.timeline;
        if let Some(w) = self.window {
            cfg.window = w;
        }
        if let Some(s) = self.stride {
            cfg.stride = s;
        }
        if let Some(b) = self.baseline_items.or(req.baseline_items) {
            cfg.baseline_items = Some(b);
        }
        info!(items = req.items.len(), window = cfg.window, "analyzing timeline");

        let embedder = text_embedder(&defaults.embedder);
        let report = analyze_text_timeline(embedder.get()?, &req.items, &cfg)?;
        output_result(cli, &report)
    }
}

/// Reasons and fused anomaly per text.
#[derive(Args)]
pub struct ReasonsCommand {
    /// Weight of the lexical channel in the fused anomaly
    #[arg(long)]
    alpha: Option<f64>,
}

impl ReasonsCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let defaults = get_defaults(cli)?;
        let req: ReasonsRequest = load_input(cli)?;

        let mut cfg = defaults.drift;
        if let Some(a) = self.alpha {
            cfg.alpha = a;
        }
        info!(texts = req.texts.len(), "analyzing reasons");

        let embedder = text_embedder(&defaults.embedder);
        let report =
            analyze_text_reasons(embedder.get()?, &req.texts, req.indices.as_deref(), &cfg)?;
        output_result(cli, &report)
    }
}

/// Seeded k-means clusters of a text set.
#[derive(Args)]
pub struct ClustersCommand {
    /// Number of clusters
    #[arg(short = 'k', long)]
    k: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

impl ClustersCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let defaults = get_defaults(cli)?;
        let req: TextsRequest = load_input(cli)?;

        let mut cfg = defaults.clusters;
        if let Some(k) = self.k {
            cfg.k = k;
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        info!(texts = req.texts.len(), k = cfg.k, seed = cfg.seed, "clustering texts");

        let embedder = text_embedder(&defaults.embedder);
        let report = analyze_text_clusters(embedder.get()?, &req.texts, &cfg)?;
        output_result(cli, &report)
    }
}
