//! Ordered conversation transcript

use crate::state_machine::Effect;
use serde::{Deserialize, Serialize};

/// Monotonic id; also the display order key
pub type MessageId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    Loading,
    Error,
    System,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
            Role::Loading => "loading",
            Role::Error => "error",
            Role::System => "system",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(id: MessageId, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
        }
    }
}

/// Append-only message list; only loading placeholders are ever removed
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn loading_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == Role::Loading)
            .count()
    }

    /// Apply a transcript effect; returns false for effects that are not
    /// transcript updates
    pub fn apply(&mut self, effect: &Effect) -> bool {
        match effect {
            Effect::AppendMessages(messages) => {
                self.messages.extend(messages.iter().cloned());
                true
            }
            Effect::AppendMessage(message) => {
                self.messages.push(message.clone());
                true
            }
            Effect::RemoveMessage { id } => {
                self.messages
                    .retain(|m| !(m.id == *id && m.role == Role::Loading));
                true
            }
            Effect::SendPrompt { .. } => false,
        }
    }
}
