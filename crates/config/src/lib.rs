//! Configuration management for stocksense
//!
//! Loads and saves agent settings from a JSON file under the user's home
//! directory, with serde defaults so a missing or partial file still yields
//! a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod paths;

pub use paths::{config_path, data_dir, datasets_dir, docs_dir};

/// Errors in configuration handling
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config not found: {0}")]
    NotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Credentials and endpoint for one model provider
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

/// All supported model providers
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub openrouter: ProviderConfig,
}

/// Agent behavior defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDefaults {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_iterations")]
    pub max_tool_iterations: u32,
    #[serde(default = "default_answer_timeout_secs")]
    pub answer_timeout_secs: u64,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_tool_iterations: default_max_iterations(),
            answer_timeout_secs: default_answer_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.0
}

fn default_max_iterations() -> u32 {
    25
}

fn default_answer_timeout_secs() -> u64 {
    25
}

/// Agent configuration section
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AgentConfig {
    #[serde(default)]
    pub defaults: AgentDefaults,
}

/// Locations of the tabular datasets and the document corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_datasets_dir")]
    pub datasets_dir: String,
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            datasets_dir: default_datasets_dir(),
            docs_dir: default_docs_dir(),
        }
    }
}

fn default_datasets_dir() -> String {
    "~/.stocksense/data".to_string()
}

fn default_docs_dir() -> String {
    "~/.stocksense/docs".to_string()
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub data: DataConfig,
}

impl Config {
    /// Load configuration from the default location
    pub async fn load() -> Result<Self> {
        let path = config_path();
        Self::load_from(&path).await
    }

    /// Load from a specific location
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("no config found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        debug!("loading config from {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub async fn save(&self) -> Result<()> {
        let path = config_path();
        self.save_to(&path).await
    }

    /// Save to a specific location
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        debug!("saving config to {:?}", path);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// API key, preferring config values over environment variables
    pub fn api_key(&self) -> Option<String> {
        let key = self.providers.openai.api_key.clone();
        if !key.is_empty() {
            return Some(key);
        }

        let key = self.providers.openrouter.api_key.clone();
        if !key.is_empty() {
            return Some(key);
        }

        for var in ["OPENAI_API_KEY", "OPENROUTER_API_KEY"] {
            if let Ok(key) = std::env::var(var) {
                if !key.is_empty() {
                    return Some(key);
                }
            }
        }

        None
    }

    /// Base URL matching whichever provider supplied the key
    pub fn api_base(&self) -> Option<String> {
        if !self.providers.openai.api_key.is_empty() {
            return self.providers.openai.api_base.clone();
        }

        if !self.providers.openrouter.api_key.is_empty() {
            return self
                .providers
                .openrouter
                .api_base
                .clone()
                .or_else(|| Some("https://openrouter.ai/api/v1".to_string()));
        }

        None
    }

    /// Whether any API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    /// Default model for the agent
    pub fn default_model(&self) -> String {
        self.agent.defaults.model.clone()
    }

    /// Iteration cap for one orchestration run
    pub fn max_tool_iterations(&self) -> u32 {
        self.agent.defaults.max_tool_iterations
    }

    /// Wall-clock deadline for one orchestration run
    pub fn answer_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.agent.defaults.answer_timeout_secs)
    }

    /// Expanded path to the tabular datasets
    pub fn datasets_path(&self) -> PathBuf {
        expand_home(&self.data.datasets_dir)
    }

    /// Expanded path to the document corpus
    pub fn docs_path(&self) -> PathBuf {
        expand_home(&self.data.docs_dir)
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Initialize the config file and state directories
pub async fn init() -> Result<Config> {
    let config_path = config_path();

    if config_path.exists() {
        warn!("config already exists at {:?}", config_path);
    } else {
        let config = Config::default();
        config.save().await?;
        info!("config created at {:?}", config_path);
    }

    let config = Config::load().await?;
    tokio::fs::create_dir_all(config.datasets_path()).await?;
    tokio::fs::create_dir_all(config.docs_path()).await?;

    Ok(config)
}
