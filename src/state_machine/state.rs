//! Conversation state types

use crate::conversation::MessageId;
use serde::{Deserialize, Serialize};

/// Submission state of a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatState {
    /// Ready for input, nothing in flight
    #[default]
    Idle,

    /// Relay calls in flight, identified by their placeholder ids
    Pending { in_flight: Vec<MessageId> },

    /// The last submission failed; new submissions are accepted
    Error { message: String },
}

impl ChatState {
    /// The loading flag: true while any relay call is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, ChatState::Pending { .. })
    }

    pub fn in_flight(&self) -> &[MessageId] {
        match self {
            ChatState::Pending { in_flight } => in_flight,
            _ => &[],
        }
    }
}

/// Whether a second submission may start while one is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPolicy {
    /// Reject submissions while pending
    #[default]
    Serialized,
    /// Allow overlapping submissions, each resolved by its own id
    Overlapping,
}

/// Immutable configuration for a conversation
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatContext {
    pub policy: SubmissionPolicy,
}

impl ChatContext {
    pub fn new(policy: SubmissionPolicy) -> Self {
        Self { policy }
    }
}
