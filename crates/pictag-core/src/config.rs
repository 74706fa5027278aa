use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PictagError, Result};

/// Top-level configuration for the Pictag application.
///
/// Loaded from `pictag.toml` by default. Each section corresponds to a
/// bounded context: server/data locations, upload limits, and the Gemini
/// backend credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PictagConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

impl PictagConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PictagConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| PictagError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for the SQLite database.
    pub data_dir: String,
    /// Port the HTTP server binds on (localhost only).
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            port: 3030,
            log_level: "info".to_string(),
        }
    }
}

/// Upload handling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory uploaded image blobs are written to.
    pub dir: String,
    /// Maximum accepted upload size in megabytes.
    pub max_size_mb: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: "data/uploads".to_string(),
            max_size_mb: 10,
        }
    }
}

/// Gemini backend settings.
///
/// The API key is external configuration; `resolved_api_key` prefers the
/// `GEMINI_API_KEY` environment variable over the file value so keys stay
/// out of checked-in config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key for the generative language endpoint.
    pub api_key: String,
    /// Model identifier, e.g. "gemini-1.5-flash-latest".
    pub model: String,
    /// Base URL of the v1beta models API.
    pub api_base: String,
    /// Per-request timeout in seconds. Expiry surfaces as a backend error.
    pub request_timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-1.5-flash-latest".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl GeminiConfig {
    /// The API key to use: `GEMINI_API_KEY` from the environment if set and
    /// non-empty, otherwise the configured value.
    pub fn resolved_api_key(&self) -> String {
        match std::env::var("GEMINI_API_KEY") {
            Ok(v) if !v.trim().is_empty() => v,
            _ => self.api_key.clone(),
        }
    }
}
