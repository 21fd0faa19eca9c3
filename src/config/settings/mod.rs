#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Overrides the configuration directory when set
pub const CONFIG_DIR_ENV: &str = "RAG_DEMO_CONFIG_DIR";
/// API key for the language-model provider, never written to disk
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_EMBEDDING_DIMENSION: u32 = 1536;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub qdrant: QdrantConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub materials: MaterialsConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpenAiConfig {
    pub base_url: String,
    #[serde(skip)]
    pub api_key: Option<String>,
    pub embedding_model: String,
    pub chat_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_seconds: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            embedding_model: "text-embedding-ada-002".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            max_tokens: 150,
            temperature: 0.7,
            request_timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QdrantConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub collection: String,
    pub vector_size: u32,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 6333,
            collection: "txt_vector_collection".to_string(),
            vector_size: DEFAULT_EMBEDDING_DIMENSION,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MaterialsConfig {
    pub dir: PathBuf,
}

impl Default for MaterialsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("materials"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid port: {0} (must be between 1 and 65535)")]
    InvalidPort(u16),
    #[error("Invalid host: {0:?} (cannot be empty)")]
    InvalidHost(String),
    #[error("Invalid protocol: {0} (must be 'http' or 'https')")]
    InvalidProtocol(String),
    #[error("Invalid model name: {0:?} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid max tokens: {0} (must be between 1 and 16384)")]
    InvalidMaxTokens(u32),
    #[error("Invalid temperature: {0} (must be between 0.0 and 2.0)")]
    InvalidTemperature(f32),
    #[error("Invalid request timeout: {0} (must be between 1 and 600 seconds)")]
    InvalidTimeout(u64),
    #[error("Invalid collection name: {0:?} (cannot be empty)")]
    InvalidCollection(String),
    #[error("Invalid vector size: {0} (must be between 1 and 65536)")]
    InvalidVectorSize(u32),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    /// Resolve the configuration directory: `RAG_DEMO_CONFIG_DIR`, else `~/.rag-demo`
    #[inline]
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        dirs::home_dir()
            .map(|home| home.join(".rag-demo"))
            .or_else(|| dirs::config_dir().map(|config| config.join("rag-demo")))
            .ok_or(ConfigError::DirectoryError)
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join("config.toml");

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;

            toml::from_str::<Config>(&content).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?
        } else {
            Self::default()
        };
        config.base_dir = config_dir.as_ref().to_path_buf();
        config.openai.api_key = env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty());

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        let config_dir = self.get_base_dir();

        fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = self.config_file_path();
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    #[inline]
    pub fn get_base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[inline]
    pub fn config_file_path(&self) -> PathBuf {
        self.get_base_dir().join("config.toml")
    }

    #[inline]
    pub fn materials_dir(&self) -> &Path {
        &self.materials.dir
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.openai.validate()?;
        self.qdrant.validate()?;
        self.server.validate()?;
        Ok(())
    }

    #[inline]
    pub fn qdrant_url(&self) -> Result<Url, ConfigError> {
        self.qdrant.qdrant_url()
    }

    #[inline]
    pub fn openai_url(&self) -> Result<Url, ConfigError> {
        self.openai.openai_url()
    }
}

impl OpenAiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.openai_url()?;

        if self.embedding_model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.embedding_model.clone()));
        }

        if self.chat_model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.chat_model.clone()));
        }

        if self.max_tokens == 0 || self.max_tokens > 16384 {
            return Err(ConfigError::InvalidMaxTokens(self.max_tokens));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }

        if !(1..=600).contains(&self.request_timeout_seconds) {
            return Err(ConfigError::InvalidTimeout(self.request_timeout_seconds));
        }

        Ok(())
    }

    pub fn openai_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|_| ConfigError::InvalidUrl(self.base_url.clone()))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidProtocol(other.to_string())),
        }
    }

    pub fn set_base_url(&mut self, base_url: String) -> Result<(), ConfigError> {
        let temp_config = OpenAiConfig {
            base_url: base_url.clone(),
            ..self.clone()
        };
        temp_config.openai_url()?;
        self.base_url = base_url;
        Ok(())
    }

    pub fn set_embedding_model(&mut self, model: String) -> Result<(), ConfigError> {
        if model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(model));
        }
        self.embedding_model = model;
        Ok(())
    }

    pub fn set_chat_model(&mut self, model: String) -> Result<(), ConfigError> {
        if model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(model));
        }
        self.chat_model = model;
        Ok(())
    }

    pub fn set_max_tokens(&mut self, max_tokens: u32) -> Result<(), ConfigError> {
        if max_tokens == 0 || max_tokens > 16384 {
            return Err(ConfigError::InvalidMaxTokens(max_tokens));
        }
        self.max_tokens = max_tokens;
        Ok(())
    }

    pub fn set_temperature(&mut self, temperature: f32) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidTemperature(temperature));
        }
        self.temperature = temperature;
        Ok(())
    }
}

impl QdrantConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protocol != "http" && self.protocol != "https" {
            return Err(ConfigError::InvalidProtocol(self.protocol.clone()));
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidHost(self.host.clone()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }

        self.qdrant_url()?;

        if self.collection.trim().is_empty() {
            return Err(ConfigError::InvalidCollection(self.collection.clone()));
        }

        if self.vector_size == 0 || self.vector_size > 65536 {
            return Err(ConfigError::InvalidVectorSize(self.vector_size));
        }

        Ok(())
    }

    pub fn qdrant_url(&self) -> Result<Url, ConfigError> {
        let url_str = format!("{}://{}:{}", self.protocol, self.host, self.port);
        Url::parse(&url_str).map_err(|_| ConfigError::InvalidUrl(url_str))
    }

    pub fn set_protocol(&mut self, protocol: String) -> Result<(), ConfigError> {
        if protocol != "http" && protocol != "https" {
            return Err(ConfigError::InvalidProtocol(protocol));
        }
        self.protocol = protocol;
        Ok(())
    }

    pub fn set_host(&mut self, host: String) -> Result<(), ConfigError> {
        let temp_config = QdrantConfig {
            host: host.clone(),
            ..self.clone()
        };
        temp_config.validate()?;
        self.host = host;
        Ok(())
    }

    pub fn set_port(&mut self, port: u16) -> Result<(), ConfigError> {
        if port == 0 {
            return Err(ConfigError::InvalidPort(port));
        }
        self.port = port;
        Ok(())
    }

    pub fn set_collection(&mut self, collection: String) -> Result<(), ConfigError> {
        if collection.trim().is_empty() {
            return Err(ConfigError::InvalidCollection(collection));
        }
        self.collection = collection;
        Ok(())
    }
}

impl ServerConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidHost(self.host.clone()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }

        Ok(())
    }
}
