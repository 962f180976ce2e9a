use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::search::OutputFormat;
use crate::error::ConfigError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_CHAT_PATH: &str = "/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "meridian-assistant-v2.1";
pub const DEFAULT_MODEL_VERSION: &str = "2.1.0";
pub const DEFAULT_INDEX: &str = "./_site/search.json";

const APP_DIR: &str = "sitelab";
const PROJECT_DIR: &str = ".sitelab";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub chat: ChatSettings,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Configuration together with the file it was read from.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub config: Config,
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join(CONFIG_FILE))
    }

    pub fn project_path() -> Option<PathBuf> {
        std::env::current_dir()
            .ok()
            .map(|p| p.join(PROJECT_DIR).join(CONFIG_FILE))
    }

    /// Load the project config if present, else the global one, else defaults,
    /// then apply `.env` and `SITELAB_*` overrides.
    pub fn load() -> Result<ResolvedConfig, ConfigError> {
        let _ = dotenvy::dotenv();

        let path = [Self::project_path(), Self::global_path()]
            .into_iter()
            .flatten()
            .find(|p| p.exists());

        let mut config = match &path {
            Some(p) => Self::from_toml(&std::fs::read_to_string(p)?)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(ResolvedConfig { config, path })
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SITELAB_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SITELAB_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| ConfigError::ValidationError(format!("invalid SITELAB_PORT: {e}")))?;
        }
        if let Some(index) = lookup("SITELAB_INDEX") {
            self.search.index = index;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chat.min_latency_ms > self.chat.max_latency_ms {
            return Err(ConfigError::ValidationError(format!(
                "chat.min_latency_ms ({}) exceeds chat.max_latency_ms ({})",
                self.chat.min_latency_ms, self.chat.max_latency_ms
            )));
        }
        if self.search.max_results == 0 {
            return Err(ConfigError::ValidationError(
                "search.max_results must be at least 1".to_string(),
            ));
        }
        if !self.server.chat_path.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "server.chat_path must start with '/': {}",
                self.server.chat_path
            )));
        }
        Ok(())
    }

    /// Write the default configuration to the global path.
    pub fn init_global(force: bool) -> Result<PathBuf, ConfigError> {
        let path = Self::global_path().ok_or_else(|| {
            ConfigError::PathError("could not determine config directory".to_string())
        })?;

        if path.exists() && !force {
            return Err(ConfigError::PathError(format!(
                "config already exists at {}",
                path.display()
            )));
        }

        Self::default().save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_chat_path")]
    pub chat_path: String,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_chat_path() -> String {
    DEFAULT_CHAT_PATH.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            chat_path: default_chat_path(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "default_model_version")]
    pub model_version: String,

    #[serde(default = "default_min_latency")]
    pub min_latency_ms: u64,

    #[serde(default = "default_max_latency")]
    pub max_latency_ms: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_model_version() -> String {
    DEFAULT_MODEL_VERSION.to_string()
}

fn default_min_latency() -> u64 {
    300
}

fn default_max_latency() -> u64 {
    1000
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            model_version: default_model_version(),
            min_latency_ms: default_min_latency(),
            max_latency_ms: default_max_latency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// File path or http(s) URL of the JSON index
    #[serde(default = "default_index")]
    pub index: String,

    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default)]
    pub default_format: OutputFormat,
}

fn default_index() -> String {
    DEFAULT_INDEX.to_string()
}

fn default_min_query_len() -> usize {
    2
}

fn default_max_results() -> usize {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index: default_index(),
            min_query_len: default_min_query_len(),
            max_results: default_max_results(),
            default_format: OutputFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
