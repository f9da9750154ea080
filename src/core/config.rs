use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

pub const DEFAULT_CURRENCYLAYER_URL: &str = "http://api.currencylayer.com";

/// Value written by `xconv setup`; treated the same as a missing key.
const PLACEHOLDER_ACCESS_KEY: &str = "YOUR_ACCESS_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CurrencyLayerConfig {
    pub base_url: String,
    /// Per-request timeout. The HTTP client default applies when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Extra attempts after a failed request.
    #[serde(default)]
    pub retries: usize,
}

impl Default for CurrencyLayerConfig {
    fn default() -> Self {
        CurrencyLayerConfig {
            base_url: DEFAULT_CURRENCYLAYER_URL.to_string(),
            timeout_secs: None,
            retries: 0,
        }
    }
}

impl CurrencyLayerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub currencylayer: CurrencyLayerConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub access_key: String,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "xconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let key = self.access_key.trim();
        if key.is_empty() || key == PLACEHOLDER_ACCESS_KEY {
            bail!("No access key configured; set `access_key` to your currencylayer key");
        }
        if self.providers.currencylayer.base_url.trim().is_empty() {
            bail!("`providers.currencylayer.base_url` must not be empty");
        }
        Ok(())
    }
}
