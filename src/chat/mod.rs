//! Chat-completions client
//!
//! Sends questions to an OpenAI-compatible chat-completions endpoint: rules
//! questions with a system prompt that keeps answers to D&D 5E, and wiki
//! questions answered from retrieved documents.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ChatConfig;

/// System prompt sent ahead of every question
pub const RULES_PROMPT: &str = "You are a chatbot replying ONLY to questions about Dungeons and \
Dragons 5E rules. You refuse to discuss anything else but DND rules.";

/// System prompt for questions answered from wiki documents
pub const ASK_PROMPT: &str = "Write a comprehensive, well-structured answer (multiple \
paragraphs) summarizing and synthesizing the information. Write ALL that is required, without \
restraint. Assume the reader is familiar with the setting, no need for fluff about that. If any \
retrieved article does not relate to the question, omit it from your answer. Your tone is that \
of a story teller, but your job is to reproduce the source material in a factual way.";

/// Separator placed between numbered documents
pub const DOCUMENT_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat API key not configured")]
    NotConfigured,

    #[error("chat request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chat API error: {0}")]
    Status(reqwest::StatusCode),

    #[error("chat API returned no choices")]
    EmptyResponse,
}

/// Chat message for the completions API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
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

/// Client for rules questions
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl ChatClient {
    pub fn new(config: &ChatConfig) -> Result<Self, ChatError> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Check if API key is configured
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask a rules question and return the first answer
    pub async fn ask(&self, question: &str) -> Result<String, ChatError> {
        self.complete(RULES_PROMPT, question, 1024, 0.2).await
    }

    /// Answer `question` from the given wiki documents
    pub async fn ask_with_documents(
        &self,
        question: &str,
        documents: &[String],
    ) -> Result<String, ChatError> {
        debug!("Asking with {} documents", documents.len());
        self.complete(ASK_PROMPT, &documents_prompt(question, documents), 2048, 0.4)
            .await
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ChatError> {
        let api_key = self.api_key.as_ref().ok_or(ChatError::NotConfigured)?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            max_tokens,
            temperature,
        };

        debug!("Sending chat request with model {}", request.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Chat API error: {} - {}", status, body);
            return Err(ChatError::Status(status));
        }

        let chat_response: ChatResponse = response.json().await?;
        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ChatError::EmptyResponse)
    }
}

/// User message carrying the question and its numbered context documents
pub fn documents_prompt(question: &str, documents: &[String]) -> String {
    let context = documents
        .iter()
        .enumerate()
        .map(|(i, doc)| format!("Document {}:\n{}", i + 1, doc))
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR);
    format!(
        "User Question: {}\n\nContext for answering your query: {}",
        question, context
    )
}
