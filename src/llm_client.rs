//! Client for an OpenAI-compatible chat-completions endpoint.
//!
//! Every request is a single blocking POST. Transport problems never escape
//! [`LlmClient::get_response`]: they come back as text starting with
//! [`ERROR_MARKER`] so the interactive loop can print them and carry on.

use crate::config::{ConfigError, Settings};
use crate::conversation::{ConversationState, Message, Role};
use crate::file_organizer::ClassificationResult;
use crate::pdf_text::{self, DocumentError};
use crate::prompts;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Prefix of every reply produced from a failed request.
pub const ERROR_MARKER: &str = "[ERROR]";

/// Failures of a single request/response cycle.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Connection, TLS, or timeout failure.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    /// The body did not carry `choices[0].message.content`.
    #[error("unexpected response body: {0}")]
    MalformedResponse(String),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Conversation client: owns the message list and talks to the endpoint.
pub struct LlmClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_pdf_chars: usize,
    conversation: ConversationState,
}

impl LlmClient {
    /// Builds a client from `settings` with an empty conversation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingApiKey` when no key is configured; no
    /// HTTP client is built in that case.
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        let api_key = settings.api_key()?.to_string();
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}/chat/completions",
                settings.base_url.trim_end_matches('/')
            ),
            api_key,
            model: settings.model.clone(),
            max_pdf_chars: settings.max_pdf_chars,
            conversation: ConversationState::new(),
        })
    }

    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.conversation.set_system_prompt(prompt);
    }

    pub fn add_message(&mut self, role: Role, content: impl Into<String>) {
        self.conversation.add_message(role, content);
    }

    pub fn reset_to_system(&mut self) {
        self.conversation.reset_to_system();
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    /// Sends the current messages and returns the reply, or the error.
    pub fn try_get_response(&self) -> Result<String, NetworkError> {
        let request = ChatRequest {
            model: &self.model,
            messages: self.conversation.messages(),
            stream: false,
        };
        debug!(
            endpoint = %self.endpoint,
            messages = request.messages.len(),
            "sending chat request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NetworkError::Status { status, body });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| NetworkError::MalformedResponse(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                NetworkError::MalformedResponse("missing choices[0].message.content".to_string())
            })?;

        debug!(chars = content.len(), "received chat reply");
        Ok(content)
    }

    /// Sends the current messages; failures become [`ERROR_MARKER`] text.
    pub fn get_response(&self) -> String {
        match self.try_get_response() {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "chat request failed");
                format!("{} Gagal memanggil endpoint model: {}", ERROR_MARKER, e)
            }
        }
    }

    /// One stateless exchange: system prompt plus `text` as the user turn.
    pub fn ask(&mut self, text: &str) -> String {
        self.reset_to_system();
        self.add_message(Role::User, text);
        self.get_response()
    }

    /// Asks the model to phrase a classification run for the user.
    pub fn explain_classification(&mut self, result: &ClassificationResult) -> String {
        self.ask(&prompts::sort_explanation_prompt(result))
    }

    /// Summarizes already-extracted document text.
    ///
    /// Text beyond the configured character limit is cut and marked before
    /// being embedded in the prompt.
    pub fn summarize_text(&mut self, text: &str) -> String {
        let text = prompts::truncate_for_prompt(text, self.max_pdf_chars);
        self.ask(&prompts::summary_prompt(&text))
    }

    /// Extracts the PDF at `path` and summarizes it.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Unreadable` if the PDF cannot be parsed.
    /// Network failures are reported inside the returned text.
    pub fn summarize_pdf(&mut self, path: &Path) -> Result<String, DocumentError> {
        let text = pdf_text::extract_text(path)?;
        Ok(self.summarize_text(&text))
    }
}
