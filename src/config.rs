//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::dispatch::{DispatchSettings, Endpoints};
use crate::provider::Provider;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Default parameter values, used when the matching CLI flag is absent.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Provider base URLs.
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Placeholder renderer settings.
    #[serde(default)]
    pub placeholder: PlaceholderConfig,

    /// Demo provider settings.
    #[serde(default)]
    pub demo: DemoConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Hugging Face API token.
    pub huggingface: Option<String>,
    /// `OpenAI` API key.
    pub openai: Option<String>,
    /// Stability AI API key.
    pub stability: Option<String>,
}

/// Default parameter values from config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default provider identifier.
    pub provider: String,
    /// Default width in pixels.
    pub width: u32,
    /// Default height in pixels.
    pub height: u32,
    /// Default art style.
    pub style: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            width: 512,
            height: 512,
            style: "photorealistic".to_string(),
        }
    }
}

/// Placeholder renderer settings.
#[derive(Debug, Default, Deserialize)]
pub struct PlaceholderConfig {
    /// TrueType font used for captions.
    pub font: Option<PathBuf>,
}

/// Demo provider settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulated latency in milliseconds.
    pub delay_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { delay_ms: 1000 }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// API key for `provider`, preferring its environment variable.
    #[must_use]
    pub fn api_key(&self, provider: Provider) -> Option<String> {
        let from_file = match provider {
            Provider::HuggingFace => self.keys.huggingface.as_ref(),
            Provider::OpenAi => self.keys.openai.as_ref(),
            Provider::Stability => self.keys.stability.as_ref(),
            Provider::Demo | Provider::Placeholder => return None,
        };
        provider
            .env_var()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.trim().is_empty())
            .or_else(|| from_file.cloned())
    }

    /// Settings handed to the dispatcher.
    #[must_use]
    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            endpoints: self.endpoints.clone(),
            demo_delay: Duration::from_millis(self.demo.delay_ms),
            font_path: self.placeholder.font.clone(),
        }
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `IMAGEGEN_CONFIG` environment variable
/// 3. `~/.config/imagegen/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("IMAGEGEN_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

/// Default config path: `~/.config/imagegen/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/imagegen/config.toml")
    } else {
        PathBuf::from("imagegen.toml")
    }
}
