use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rag_demo::commands::{
    ask, ingest_materials, list_materials, load_config, resolve_config_dir, serve,
};
use rag_demo::config::{run_interactive_config, show_config};
use rag_demo::{RagError, Result};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rag-demo")]
#[command(about = "Answer prompts over local materials with embeddings, Qdrant and a chat model")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest the materials directory, then serve the HTTP API
    Serve {
        /// Address to bind, overriding the configured host
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overriding the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Embed every material and load it into Qdrant
    Ingest,
    /// List the material files
    List,
    /// Answer a single prompt from the command line
    Ask {
        /// The question to answer
        prompt: String,
    },
    /// Configure Qdrant and language model settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config_dir = resolve_config_dir(cli.config_dir.as_deref())?;

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config(&load_config(&config_dir)?);
            } else {
                run_interactive_config(&config_dir).map_err(RagError::Other)?;
            }
        }
        Commands::Serve { host, port } => {
            serve(load_config(&config_dir)?, host, port).await?;
        }
        Commands::Ingest => {
            ingest_materials(&load_config(&config_dir)?)?;
        }
        Commands::List => {
            list_materials(&load_config(&config_dir)?)?;
        }
        Commands::Ask { prompt } => {
            ask(&load_config(&config_dir)?, &prompt)?;
        }
    }

    Ok(())
}
