// Configuration management module
// TOML settings file plus the environment-provided API key

pub mod interactive;
pub mod settings;


pub use interactive::{run_interactive_config, show_config};
pub use settings::{
    API_KEY_ENV, CONFIG_DIR_ENV, Config, ConfigError, MaterialsConfig, OpenAiConfig, QdrantConfig,
    ServerConfig,
};

/// Get the configuration directory path
#[inline]
pub fn get_config_dir() -> Result<std::path::PathBuf, ConfigError> {
    Config::config_dir()
}
