//! HTTP Surface
//!
//! Serves the material listing, raw material content and prompt submission.
//! Every blocking call (file IO and the remote APIs) runs on the blocking
//! thread pool; requests share nothing but the read-only configuration.

pub mod errors;
pub mod pages;


use std::sync::Arc;

use actix_web::{App, HttpResponse, HttpServer, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::materials::{MaterialStore, is_pdf};
use crate::openai::ChatMessage;
use crate::query::QueryHandler;
use crate::{RagError, Result};

pub use errors::ErrorBody;

/// Shared, read-only state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<Config>,
}

impl AppState {
    #[inline]
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn materials(&self) -> MaterialStore {
        MaterialStore::new(self.config.materials_dir())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialsResponse {
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptResponse {
    pub response: ChatMessage,
}

enum MaterialBody {
    Pdf(Vec<u8>),
    Text(String),
}

/// Register every route on an actix app
#[inline]
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/materials", web::get().to(list_materials))
        .route("/materials/{filename}", web::get().to(material_content))
        .route("/llm", web::post().to(submit_prompt));
}

/// Bind the configured address and serve until shutdown
#[inline]
pub async fn run_server(config: Config) -> Result<()> {
    let address = (config.server.host.clone(), config.server.port);
    let state = web::Data::new(AppState::new(config));

    let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(address.clone())?;

    info!("Listening on http://{}:{}", address.0, address.1);
    server.run().await?;

    info!("Server stopped");
    Ok(())
}

async fn run_blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| RagError::Other(anyhow::anyhow!("Blocking task failed: {}", e)))?
}

async fn index(state: web::Data<AppState>) -> Result<HttpResponse> {
    let store = state.materials();
    let files = run_blocking(move || Ok(store.list()?)).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(pages::render_index(&files)))
}

async fn list_materials(state: web::Data<AppState>) -> Result<web::Json<MaterialsResponse>> {
    let store = state.materials();
    let files = run_blocking(move || Ok(store.list()?)).await?;

    Ok(web::Json(MaterialsResponse { files }))
}

async fn material_content(
    state: web::Data<AppState>,
    filename: web::Path<String>,
) -> Result<HttpResponse> {
    let filename = filename.into_inner();
    let store = state.materials();

    let body = run_blocking(move || {
        // Only names in the current listing are served, whatever else exists on disk
        if !store.contains(&filename)? {
            return Err(RagError::NotFound(filename));
        }

        debug!("Serving material {}", filename);
        if is_pdf(&filename) {
            Ok(MaterialBody::Pdf(store.read_bytes(&filename)?))
        } else {
            store
                .read(&filename)
                .map(MaterialBody::Text)
                .map_err(|e| RagError::material(&filename, &e))
        }
    })
    .await?;

    Ok(match body {
        MaterialBody::Pdf(bytes) => HttpResponse::Ok()
            .content_type("application/pdf")
            .body(bytes),
        MaterialBody::Text(text) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(text),
    })
}

async fn submit_prompt(
    state: web::Data<AppState>,
    request: web::Json<PromptRequest>,
) -> Result<web::Json<PromptResponse>> {
    let config = Arc::clone(&state.config);
    let prompt = request.into_inner().prompt;

    let response = run_blocking(move || QueryHandler::new(&config)?.answer(&prompt)).await?;

    Ok(web::Json(PromptResponse { response }))
}
