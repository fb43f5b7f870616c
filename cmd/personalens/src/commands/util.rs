//! Utility functions for CLI commands.

use personalens_cli::{
    load_config, read_request, AnalysisDefaults, EmbedderKind, EmbedderSettings, Output,
    OutputFormat,
};
use personalens_embed::{EmbedConfig, EmbedError, HashEmbedder, OpenAiCompat, SharedEmbedder};
use tracing::debug;

use crate::Cli;

/// Loads the defaults file named by `--config`, or the default one.
pub fn get_defaults(cli: &Cli) -> anyhow::Result<AnalysisDefaults> {
    load_config(cli.config.as_deref())
}

/// Loads the request from `-f` or stdin.
pub fn load_input<T: serde::de::DeserializeOwned>(cli: &Cli) -> anyhow::Result<T> {
    if cli.input.is_none() {
        debug!("reading request from stdin");
    }
    Ok(read_request(cli.input.as_deref())?)
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: serde::Serialize>(cli: &Cli, result: &T) -> anyhow::Result<()> {
    Output::new(OutputFormat::from_json_flag(cli.json), cli.output.clone()).write(result)
}

/// Builds the lazily initialized text provider described by `settings`.
pub fn text_embedder(settings: &EmbedderSettings) -> SharedEmbedder {
    let settings = settings.clone();
    SharedEmbedder::new(move || {
        let mut cfg = EmbedConfig::default().with_dimension(settings.dimension);
        if !settings.model.is_empty() {
            cfg = cfg.with_model(&settings.model);
        }
        if !settings.base_url.is_empty() {
            cfg = cfg.with_base_url(&settings.base_url);
        }
        match settings.provider {
            EmbedderKind::Hash => Ok(Box::new(HashEmbedder::with_config(cfg))),
            EmbedderKind::OpenAi => {
                let key = std::env::var(&settings.api_key_env).map_err(|_| {
                    EmbedError::Init(format!("{} is not set", settings.api_key_env))
                })?;
                Ok(Box::new(OpenAiCompat::with_config(&key, cfg)))
            }
        }
    })
}
