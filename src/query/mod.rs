// Query handler
// Embeds a prompt, retrieves the closest materials and asks the chat model


use tracing::{debug, info};

use crate::config::Config;
use crate::database::qdrant::{ScoredDocument, VectorStore};
use crate::openai::{ChatMessage, OpenAiClient, PromptMessage};
use crate::{RagError, Result, ServiceStage};

/// Number of documents retrieved as context for each prompt
pub const SEARCH_LIMIT: usize = 3;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Answers prompts against the vector store; built per request
#[derive(Debug, Clone)]
pub struct QueryHandler {
    client: OpenAiClient,
    vector_store: VectorStore,
}

impl QueryHandler {
    #[inline]
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: OpenAiClient::new(&config.openai)?,
            vector_store: VectorStore::new(config)?,
        })
    }

    /// Embed, search, then complete; each stage runs only if the previous one succeeded
    #[inline]
    pub fn answer(&self, prompt: &str) -> Result<ChatMessage> {
        let embedding = self
            .client
            .embed(prompt)
            .map_err(|e| RagError::service(ServiceStage::Embedding, &e))?;

        let hits = self
            .vector_store
            .search(&embedding, SEARCH_LIMIT)
            .map_err(|e| RagError::service(ServiceStage::Search, &e))?;
        debug!("Retrieved {} context documents", hits.len());

        let messages = build_messages(&build_context(&hits), prompt);

        let message = self
            .client
            .chat_completion(&messages)
            .map_err(|e| RagError::service(ServiceStage::Completion, &e))?;

        info!(
            "Answered prompt ({} chars) using {} documents",
            prompt.len(),
            hits.len()
        );
        Ok(message)
    }
}

/// Label each hit's text as `... doc N ...` and separate them with blank lines
#[inline]
pub fn build_context(hits: &[ScoredDocument]) -> String {
    hits.iter()
        .enumerate()
        .map(|(index, hit)| format!("... doc {} ...\n{}", index + 1, hit.page_content()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[inline]
pub fn build_messages(context: &str, prompt: &str) -> Vec<PromptMessage> {
    let user_message = format!(
        "Please answer the question using the provided context.\n\
         <Context>\n\
         {context}\n\
         <Context/>\n\
         \n\
         Now answer the user question:\n\
         <user question>\n\
         {prompt}\n\
         <user question/>"
    );

    vec![
        PromptMessage::system(SYSTEM_PROMPT),
        PromptMessage::user(user_message),
    ]
}
