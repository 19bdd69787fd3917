//! deskhand - a terminal assistant for a single working folder
//!
//! This library sorts files into category sub-folders by extension,
//! extracts PDF text, and exchanges messages with an OpenAI-compatible
//! chat-completions endpoint, all driven by a keyword-dispatched
//! interactive loop.

pub mod cli;
pub mod config;
pub mod conversation;
pub mod file_category;
pub mod file_organizer;
pub mod intent;
pub mod llm_client;
pub mod output;
pub mod pdf_text;
pub mod prompts;

pub use config::{ConfigError, Settings};
pub use conversation::{ConversationState, Message, Phase, Role};
pub use file_category::{Category, ExtensionTable};
pub use file_organizer::{ClassificationResult, OrganizeError, classify, safe_move};
pub use llm_client::{ERROR_MARKER, LlmClient, NetworkError};
pub use pdf_text::DocumentError;

pub use cli::{Session, run_cli};
