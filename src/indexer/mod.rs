// Indexer module
// Embeds every material and loads it into the vector store at startup


use tracing::{debug, info};

use crate::config::Config;
use crate::database::qdrant::{DocumentPayload, IndexedDocument, VectorStore};
use crate::materials::MaterialStore;
use crate::openai::OpenAiClient;
use crate::{RagError, Result, ServiceStage};

/// Outcome of one ingestion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Filenames in the order they were assigned ids
    pub documents: Vec<String>,
    pub collection_created: bool,
}

impl IngestReport {
    #[inline]
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}

/// Open fresh clients from `config` and ingest the configured materials directory
#[inline]
pub fn ingest(config: &Config) -> Result<IngestReport> {
    let store = MaterialStore::new(config.materials_dir());
    let embedder = OpenAiClient::new(&config.openai)?;
    let vector_store = VectorStore::new(config)?;

    ingest_materials(&store, &embedder, &vector_store)
}

/// Ensure the collection, then embed and upsert every material in listing order.
///
/// Ids are positions in the listing, so a changed material set can leave
/// stale points behind. Any failure aborts the whole run before the upsert.
#[inline]
pub fn ingest_materials(
    store: &MaterialStore,
    embedder: &OpenAiClient,
    vector_store: &VectorStore,
) -> Result<IngestReport> {
    let collection_created = vector_store
        .ensure_collection()
        .map_err(|e| RagError::service(ServiceStage::Collection, &e))?;

    let files = store.list()?;
    if files.is_empty() {
        info!("No material files found in {}", store.dir().display());
        return Ok(IngestReport {
            documents: Vec::new(),
            collection_created,
        });
    }

    let mut documents = Vec::with_capacity(files.len());
    for (position, filename) in files.iter().enumerate() {
        let content = store
            .read(filename)
            .map_err(|e| RagError::material(filename, &e))?;

        let vector = embedder
            .embed(&content)
            .map_err(|e| RagError::service(ServiceStage::Embedding, &e))?;

        debug!("Embedded {} as document {}", filename, position);
        documents.push(IndexedDocument {
            id: position as u64,
            vector,
            payload: DocumentPayload {
                filename: filename.clone(),
                page_content: content,
            },
        });
    }

    vector_store
        .upsert(&documents)
        .map_err(|e| RagError::service(ServiceStage::Upsert, &e))?;

    info!(
        "Loaded {} material docs into collection '{}'",
        documents.len(),
        vector_store.collection()
    );

    Ok(IngestReport {
        documents: files,
        collection_created,
    })
}
