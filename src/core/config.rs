use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Environment variable that takes precedence over the configured API key.
pub const API_KEY_ENV: &str = "XCALC_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.freecurrencyapi.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FreeCurrencyApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub freecurrencyapi: Option<FreeCurrencyApiConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            freecurrencyapi: Some(FreeCurrencyApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                api_key: None,
                timeout_secs: None,
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "xcalc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Provider settings, falling back to the public endpoint.
    pub fn freecurrencyapi(&self) -> FreeCurrencyApiConfig {
        self.providers
            .freecurrencyapi
            .clone()
            .unwrap_or_else(|| FreeCurrencyApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                api_key: None,
                timeout_secs: None,
            })
    }
}

impl FreeCurrencyApiConfig {
    /// Picks the API key from `env_value` when set and non-blank, else the file.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn api_key_from_env(&self) -> Option<String> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }
}
