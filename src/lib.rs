use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RagError>;

/// The remote call a [`RagError::Service`] originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStage {
    Embedding,
    Collection,
    Upsert,
    Search,
    Completion,
}

impl fmt::Display for ServiceStage {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Embedding => "Embedding",
            Self::Collection => "Qdrant collection",
            Self::Upsert => "Qdrant upsert",
            Self::Search => "Qdrant search",
            Self::Completion => "Chat completion",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("{stage} error: {message}")]
    Service {
        stage: ServiceStage,
        message: String,
    },

    #[error("Failed to read material {filename}: {message}")]
    Material { filename: String, message: String },

    #[error("Startup failed: {0}")]
    Startup(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl RagError {
    /// Wrap a downstream failure, keeping the full context chain in the message
    #[inline]
    pub fn service(stage: ServiceStage, error: &anyhow::Error) -> Self {
        Self::Service {
            stage,
            message: format!("{:#}", error),
        }
    }

    #[inline]
    pub fn material(filename: &str, error: &anyhow::Error) -> Self {
        Self::Material {
            filename: filename.to_string(),
            message: format!("{:#}", error),
        }
    }
}

pub mod commands;
pub mod config;
pub mod database;
pub mod http;
pub mod indexer;
pub mod materials;
pub mod openai;
pub mod query;
pub mod server;
