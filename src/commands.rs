use std::path::Path;

use tracing::{error, info, warn};

use crate::config::{Config, ConfigError, get_config_dir};
use crate::database::qdrant::VectorStore;
use crate::indexer::{IngestReport, ingest};
use crate::materials::MaterialStore;
use crate::query::QueryHandler;
use crate::server::run_server;
use crate::{RagError, Result};

/// Resolve the configuration directory, preferring an explicit override
#[inline]
pub fn resolve_config_dir(override_dir: Option<&Path>) -> Result<std::path::PathBuf> {
    match override_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => get_config_dir().map_err(config_error),
    }
}

#[inline]
pub fn load_config(config_dir: &Path) -> Result<Config> {
    Config::load(config_dir).map_err(|e| RagError::Config(format!("{:#}", e)))
}

fn config_error(error: ConfigError) -> RagError {
    RagError::Config(error.to_string())
}

/// Ingest the materials, then serve HTTP until shutdown.
///
/// An ingestion failure stops startup; the server never binds.
#[inline]
pub async fn serve(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.server.validate().map_err(config_error)?;

    let report = run_startup_ingest(config.clone()).await?;
    info!(
        "Indexed {} materials into collection {}",
        report.document_count(),
        config.qdrant.collection
    );

    run_server(config).await
}

async fn run_startup_ingest(config: Config) -> Result<IngestReport> {
    tokio::task::spawn_blocking(move || ingest(&config))
        .await
        .map_err(|e| RagError::Startup(format!("Ingestion task failed: {}", e)))?
        .map_err(|e| {
            error!("Ingestion failed: {}", e);
            RagError::Startup(e.to_string())
        })
}

/// Run ingestion once and print a summary
#[inline]
pub fn ingest_materials(config: &Config) -> Result<()> {
    let report = ingest(config)?;

    if report.collection_created {
        println!("Created collection: {}", config.qdrant.collection);
    }

    if report.documents.is_empty() {
        println!(
            "No materials found in {}",
            config.materials_dir().display()
        );
        return Ok(());
    }

    println!(
        "Indexed {} materials into {}:",
        report.document_count(),
        config.qdrant.collection
    );
    for (id, filename) in report.documents.iter().enumerate() {
        println!("  {:>3}  {}", id, filename);
    }

    // Positional ids leave earlier points behind when the material set shrinks
    match VectorStore::new(config).and_then(|store| store.count_documents()) {
        Ok(stored) if stored > report.document_count() as u64 => {
            println!(
                "Collection holds {} points; {} are from earlier runs",
                stored,
                stored - report.document_count() as u64
            );
        }
        Ok(_) => {}
        Err(e) => warn!("Could not count points in {}: {:#}", config.qdrant.collection, e),
    }

    Ok(())
}

/// Print the material filenames in listing order
#[inline]
pub fn list_materials(config: &Config) -> Result<()> {
    let store = MaterialStore::new(config.materials_dir());
    let files = store.list()?;

    if files.is_empty() {
        println!("No materials found in {}", store.dir().display());
        println!("Add .txt or .pdf files there and run 'rag-demo ingest'.");
        return Ok(());
    }

    println!("Materials ({} total):", files.len());
    for filename in &files {
        println!("  {}", filename);
    }

    Ok(())
}

/// Answer one prompt against the existing collection and print the reply
#[inline]
pub fn ask(config: &Config, prompt: &str) -> Result<()> {
    let message = QueryHandler::new(config)?.answer(prompt)?;

    match message.content {
        Some(content) => println!("{}", content),
        None => println!("(no content returned)"),
    }

    Ok(())
}
