//! Defaults file for the CLI.
//!
//! Stored in ~/.personalens/config.yaml. Every section is optional; missing
//! fields keep the library defaults.

use std::path::PathBuf;

use personalens_analyze::{AudioShiftConfig, TimelineConfig, VideoShiftConfig};
use personalens_cluster::ClusterConfig;
use personalens_drift::DriftConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default base configuration directory name.
pub const DEFAULT_BASE_DIR: &str = ".personalens";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Environment variable holding the API key when none is configured.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Which provider embeds text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// Local feature hashing, no network.
    #[default]
    Hash,
    /// An OpenAI-compatible `/embeddings` endpoint.
    OpenAi,
}

/// Text embedder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedderSettings {
    pub provider: EmbedderKind,

    /// Model name (optional, uses the provider default if empty).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model: String,

    /// API base URL (optional, uses the provider default if empty).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_url: String,

    /// Output dimension (optional, 0 keeps the provider default).
    pub dimension: usize,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for EmbedderSettings {
    fn default() -> Self {
        Self {
            provider: EmbedderKind::Hash,
            model: String::new(),
            base_url: String::new(),
            dimension: 0,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

/// All analyzer defaults in one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDefaults {
    pub embedder: EmbedderSettings,
    /// Used by `reasons`.
    pub drift: DriftConfig,
    pub audio: AudioShiftConfig,
    pub video: VideoShiftConfig,
    pub timeline: TimelineConfig,
    pub clusters: ClusterConfig,
}

impl AnalysisDefaults {
    /// Gets the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_BASE_DIR).join(DEFAULT_CONFIG_FILE))
    }
}

/// Loads the defaults file.
///
/// An explicit `custom_path` must exist. The default path is optional and
/// falls back to built-in defaults when absent.
pub fn load_config(custom_path: Option<&str>) -> anyhow::Result<AnalysisDefaults> {
    let config_path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => match AnalysisDefaults::default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(AnalysisDefaults::default()),
        },
    };

    debug!(path = %config_path.display(), "loading config");
    let content = std::fs::read_to_string(&config_path)
        .map_err(|e| anyhow::anyhow!("read config {}: {}", config_path.display(), e))?;
    if content.trim().is_empty() {
        return Ok(AnalysisDefaults::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}
