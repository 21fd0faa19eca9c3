
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::config::OpenAiConfig;
use crate::http::{JsonAgent, endpoint};

/// Client for the embedding and chat-completion endpoints of an OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: Url,
    embedding_model: String,
    chat_model: String,
    max_tokens: u32,
    temperature: f32,
    agent: JsonAgent,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: [&'a str; 1],
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// Message sent to the chat-completion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    #[inline]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    #[inline]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Message returned by the chat-completion endpoint, kept whole so callers see every field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenAiClient {
    #[inline]
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let base_url = config
            .openai_url()
            .context("Failed to build API URL from config")?;

        let agent = JsonAgent::new(Duration::from_secs(config.request_timeout_seconds))
            .with_bearer_token(config.api_key.clone());

        Ok(Self {
            base_url,
            embedding_model: config.embedding_model.clone(),
            chat_model: config.chat_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            agent,
        })
    }

    /// Embed one text; newlines are collapsed to spaces first
    #[inline]
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let normalized = normalize_input(text);
        debug!(
            "Requesting embedding for text (length: {}) with {}",
            normalized.len(),
            self.embedding_model
        );

        let url = endpoint(&self.base_url, "embeddings")?;
        let request = EmbeddingRequest {
            input: [normalized.as_str()],
            model: &self.embedding_model,
        };

        let response: EmbeddingResponse = self
            .agent
            .post_json(&url, &request)?
            .json()
            .context("Embedding request failed")?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or_else(|| anyhow!("Embedding response contained no data"))?;

        debug!("Received embedding with {} dimensions", embedding.len());
        Ok(embedding)
    }

    /// Run one chat completion and return the first choice's message
    #[inline]
    pub fn chat_completion(&self, messages: &[PromptMessage]) -> Result<ChatMessage> {
        debug!(
            "Requesting chat completion from {} with {} messages",
            self.chat_model,
            messages.len()
        );

        let url = endpoint(&self.base_url, "chat/completions")?;
        let request = ChatRequest {
            model: &self.chat_model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response: ChatResponse = self
            .agent
            .post_json(&url, &request)?
            .json()
            .context("Chat completion request failed")?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| anyhow!("Chat completion response contained no choices"))
    }
}

#[inline]
pub fn normalize_input(text: &str) -> String {
    text.replace('\n', " ")
}
