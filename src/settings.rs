use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::wizard::{ContractConfig, PrimaryColor};

pub const API_URL_ENV: &str = "CONTRACT_DESIGNER_API_URL";

const DEFAULT_BASE_URL: &str = "https://app-py-designercontratos.onrender.com";
const CONFIG_FILE: &str = "contract-designer/config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DesignerConfig {
    pub general: GeneralConfig,
    pub api: ApiConfig,
    pub branding: BrandingConfig,
    pub output: OutputConfig,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            api: ApiConfig::default(),
            branding: BrandingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl DesignerConfig {
    /// `$XDG_CONFIG_HOME/contract-designer/config.toml` (or the platform equivalent)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(path),
            None => {
                info!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: DesignerConfig = toml::from_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Apply `CONTRACT_DESIGNER_API_URL` from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            info!("Using API base URL from {}", API_URL_ENV);
            self.api.base_url = url.trim().to_string();
        }
    }

    /// The configuration a fresh wizard run starts from
    pub fn initial_contract(&self) -> ContractConfig {
        ContractConfig {
            primary_color: self.branding.default_color.clone(),
            ..ContractConfig::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub title: String,
    /// Simulate the backend instead of calling it
    pub dryrun: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "Contract Designer".to_string(),
            dryrun: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Endpoint paths tried in order until one answers with success
    pub candidates: Vec<String>,
    /// Upper bound for a single candidate attempt
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            candidates: ["/api/process", "/process", "/api/process_text", "/process_text"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timeout_secs: 60,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrandingConfig {
    pub default_color: PrimaryColor,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub download_dir: PathBuf,
    /// Pause between the last stage finishing and the Result step
    pub reveal_delay_ms: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("."),
            reveal_delay_ms: 1000,
        }
    }
}

impl OutputConfig {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}
