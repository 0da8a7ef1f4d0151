//! Effects produced by state transitions

use crate::conversation::{Message, MessageId};

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append several messages in one transcript update
    AppendMessages(Vec<Message>),

    /// Append a single terminal message
    AppendMessage(Message),

    /// Remove a message by id (the loading placeholder)
    RemoveMessage { id: MessageId },

    /// Issue one relay call
    SendPrompt {
        submission: MessageId,
        prompt: String,
    },
}

impl Effect {
    pub fn append_pending(user: Message, placeholder: Message) -> Self {
        Effect::AppendMessages(vec![user, placeholder])
    }

    pub fn remove_placeholder(id: MessageId) -> Self {
        Effect::RemoveMessage { id }
    }

    pub fn send_prompt(submission: MessageId, prompt: impl Into<String>) -> Self {
        Effect::SendPrompt {
            submission,
            prompt: prompt.into(),
        }
    }
}
