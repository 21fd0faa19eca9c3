
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};

use super::{API_KEY_ENV, Config, ConfigError, OpenAiConfig, QdrantConfig};

#[inline]
pub fn run_interactive_config(config_dir: &Path) -> Result<()> {
    eprintln!("{}", style("🔧 RAG Demo Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config(config_dir);

    eprintln!("{}", style("Qdrant Configuration").bold().yellow());
    eprintln!("Configure the vector database that stores material embeddings.");
    eprintln!();

    configure_qdrant(&mut config.qdrant)?;

    eprintln!();
    eprintln!("{}", style("Language Model Configuration").bold().yellow());
    eprintln!(
        "The API key is read from {} and is never saved.",
        style(API_KEY_ENV).cyan()
    );
    eprintln!();

    configure_openai(&mut config.openai)?;

    eprintln!();
    eprintln!("{}", style("Testing configuration...").yellow());

    if test_qdrant_connection(&config.qdrant) {
        eprintln!("{}", style("✓ Qdrant connection successful!").green());
    } else {
        eprintln!(
            "{}",
            style("⚠ Warning: Could not connect to Qdrant").yellow()
        );
        eprintln!("You can continue, but make sure Qdrant is running before serving.");
    }

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());
        eprintln!(
            "Configuration saved to: {}",
            style(config.config_file_path().display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config(config: &Config) {
    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Qdrant Settings:").bold().yellow());
    match config.qdrant_url() {
        Ok(url) => eprintln!("  URL: {}", style(url).cyan()),
        Err(e) => eprintln!("  URL: {} ({})", style("Invalid").red(), e),
    }
    eprintln!("  Collection: {}", style(&config.qdrant.collection).cyan());
    eprintln!("  Vector Size: {}", style(config.qdrant.vector_size).cyan());

    eprintln!();
    eprintln!("{}", style("Language Model Settings:").bold().yellow());
    eprintln!("  Base URL: {}", style(&config.openai.base_url).cyan());
    eprintln!(
        "  Embedding Model: {}",
        style(&config.openai.embedding_model).cyan()
    );
    eprintln!("  Chat Model: {}", style(&config.openai.chat_model).cyan());
    eprintln!("  Max Tokens: {}", style(config.openai.max_tokens).cyan());
    eprintln!("  Temperature: {}", style(config.openai.temperature).cyan());
    let key_status = if config.openai.api_key.is_some() {
        style("set").green()
    } else {
        style("missing").red()
    };
    eprintln!("  {}: {}", API_KEY_ENV, key_status);

    eprintln!();
    eprintln!("{}", style("Server Settings:").bold().yellow());
    eprintln!(
        "  Listen: {}",
        style(format!("{}:{}", config.server.host, config.server.port)).cyan()
    );
    eprintln!(
        "  Materials: {}",
        style(config.materials_dir().display()).cyan()
    );

    eprintln!();
    eprintln!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );
}

fn load_existing_config(config_dir: &Path) -> Config {
    Config::load(config_dir).map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("No existing configuration found. Using defaults.").yellow()
            );
            Config {
                base_dir: config_dir.to_path_buf(),
                ..Config::default()
            }
        },
        |config| {
            eprintln!("{}", style("Found existing configuration.").green());
            config
        },
    )
}

fn configure_qdrant(qdrant: &mut QdrantConfig) -> Result<()> {
    let protocols = &["http", "https"];
    let default_index = protocols
        .iter()
        .position(|&p| p == qdrant.protocol)
        .unwrap_or(0);

    let protocol_index = Select::new()
        .with_prompt("Qdrant protocol")
        .default(default_index)
        .items(protocols)
        .interact()?;

    let protocol = protocols[protocol_index].to_string();

    let host: String = Input::new()
        .with_prompt("Qdrant host")
        .default(qdrant.host.clone())
        .validate_with(|input: &String| -> Result<(), ConfigError> {
            let temp_config = QdrantConfig {
                protocol: protocol.clone(),
                host: input.clone(),
                ..QdrantConfig::default()
            };
            temp_config.validate()
        })
        .interact_text()?;

    let port: u16 = Input::new()
        .with_prompt("Qdrant port")
        .default(qdrant.port)
        .validate_with(|input: &u16| -> Result<(), &str> {
            if *input == 0 {
                Err("Port must be greater than 0")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let collection: String = Input::new()
        .with_prompt("Collection name")
        .default(qdrant.collection.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Collection name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    qdrant.set_protocol(protocol)?;
    qdrant.set_host(host)?;
    qdrant.set_port(port)?;
    qdrant.set_collection(collection)?;

    Ok(())
}

fn configure_openai(openai: &mut OpenAiConfig) -> Result<()> {
    let base_url: String = Input::new()
        .with_prompt("API base URL")
        .default(openai.base_url.clone())
        .validate_with(|input: &String| -> Result<(), ConfigError> {
            let temp_config = OpenAiConfig {
                base_url: input.clone(),
                ..OpenAiConfig::default()
            };
            temp_config.openai_url().map(|_| ())
        })
        .interact_text()?;

    let embedding_model: String = Input::new()
        .with_prompt("Embedding model")
        .default(openai.embedding_model.clone())
        .interact_text()?;

    let chat_model: String = Input::new()
        .with_prompt("Chat model")
        .default(openai.chat_model.clone())
        .interact_text()?;

    let max_tokens: u32 = Input::new()
        .with_prompt("Max completion tokens")
        .default(openai.max_tokens)
        .validate_with(|input: &u32| -> Result<(), &str> {
            if *input == 0 {
                Err("Max tokens must be greater than 0")
            } else if *input > 16384 {
                Err("Max tokens must be 16384 or less")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let temperature: f32 = Input::new()
        .with_prompt("Sampling temperature")
        .default(openai.temperature)
        .validate_with(|input: &f32| -> Result<(), &str> {
            if (0.0..=2.0).contains(input) {
                Ok(())
            } else {
                Err("Temperature must be between 0.0 and 2.0")
            }
        })
        .interact_text()?;

    openai.set_base_url(base_url)?;
    openai.set_embedding_model(embedding_model)?;
    openai.set_chat_model(chat_model)?;
    openai.set_max_tokens(max_tokens)?;
    openai.set_temperature(temperature)?;

    Ok(())
}

fn test_qdrant_connection(qdrant: &QdrantConfig) -> bool {
    let Ok(url) = qdrant.qdrant_url() else {
        return false;
    };

    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(std::time::Duration::from_secs(5)))
        .build()
        .into();

    match agent.get(url.as_str()).call() {
        Ok(_) => true,
        Err(ureq::Error::StatusCode(code)) if (400..500).contains(&code) => true,
        Err(_) => false,
    }
}
