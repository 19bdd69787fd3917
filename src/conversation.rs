//! Conversation state sent to the chat endpoint.
//!
//! Exchanges are stateless: before each request the state is reset to the
//! system prompt alone, so only the current user turn travels with it.

use serde::{Deserialize, Serialize};

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat message as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Observable state of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing beyond the (optional) system message.
    SystemOnly,
    /// At least one user or assistant turn is queued.
    HasPendingTurn,
}

/// Ordered message list with at most one system message, always first.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    system_prompt: Option<String>,
    messages: Vec<Message>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a conversation holding only `prompt` as its system message.
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.set_system_prompt(prompt);
        state
    }

    /// Replaces the system prompt and drops every other message.
    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.system_prompt = Some(prompt.into());
        self.reset_to_system();
    }

    /// Appends a turn.
    ///
    /// A `Role::System` message replaces the system prompt in place and
    /// keeps queued turns, so the system message stays unique and first.
    pub fn add_message(&mut self, role: Role, content: impl Into<String>) {
        let content = content.into();
        if role == Role::System {
            let system = Message::new(Role::System, content.clone());
            match self.messages.first_mut() {
                Some(first) if first.role == Role::System => *first = system,
                _ => self.messages.insert(0, system),
            }
            self.system_prompt = Some(content);
            return;
        }
        self.messages.push(Message::new(role, content));
    }

    /// Truncates back to the system message, or to nothing if none is set.
    pub fn reset_to_system(&mut self) {
        self.messages.clear();
        if let Some(prompt) = &self.system_prompt {
            self.messages.push(Message::new(Role::System, prompt.clone()));
        }
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> Phase {
        if self.messages.iter().any(|m| m.role != Role::System) {
            Phase::HasPendingTurn
        } else {
            Phase::SystemOnly
        }
    }
}
