//! Pure state transition function

use super::{ChatContext, ChatState, Effect, Event, SubmissionPolicy};
use crate::conversation::{Message, MessageId, Role};
use thiserror::Error;

/// Text shown in the loading placeholder
pub const PLACEHOLDER_TEXT: &str = "...";

/// Shown when a failure carries no usable message
pub const FALLBACK_ERROR: &str = "An unexpected error occurred.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A request is already in progress")]
    Busy,
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Cannot submit a message with role {0:?}")]
    InvalidRole(Role),
    #[error("No submission in flight with id {0}")]
    UnknownSubmission(MessageId),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
pub fn transition(
    state: &ChatState,
    context: &ChatContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Submission
        // ============================================================
        (
            _,
            Event::Submit {
                role, content, ..
            },
        ) if !matches!(role, Role::User | Role::System) || content.trim().is_empty() => {
            if content.trim().is_empty() {
                Err(TransitionError::EmptyMessage)
            } else {
                Err(TransitionError::InvalidRole(role))
            }
        }

        // Idle/Error + Submit -> Pending
        (
            ChatState::Idle | ChatState::Error { .. },
            Event::Submit {
                role,
                content,
                message_id,
                placeholder_id,
            },
        ) => Ok(start_submission(
            Vec::new(),
            role,
            content,
            message_id,
            placeholder_id,
        )),

        // Pending + Submit -> depends on the policy
        (
            ChatState::Pending { in_flight },
            Event::Submit {
                role,
                content,
                message_id,
                placeholder_id,
            },
        ) => match context.policy {
            SubmissionPolicy::Serialized => Err(TransitionError::Busy),
            SubmissionPolicy::Overlapping => Ok(start_submission(
                in_flight.clone(),
                role,
                content,
                message_id,
                placeholder_id,
            )),
        },

        // ============================================================
        // Resolution
        // ============================================================
        (
            ChatState::Pending { in_flight },
            Event::RelayReplied {
                submission,
                reply_id,
                text,
            },
        ) if in_flight.contains(&submission) => {
            let remaining = without(in_flight, submission);
            let new_state = if remaining.is_empty() {
                ChatState::Idle
            } else {
                ChatState::Pending {
                    in_flight: remaining,
                }
            };
            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::remove_placeholder(submission))
                .with_effect(Effect::AppendMessage(Message::new(
                    reply_id,
                    Role::Model,
                    text,
                ))))
        }

        (
            ChatState::Pending { in_flight },
            Event::RelayFailed {
                submission,
                reply_id,
                message,
            },
        ) if in_flight.contains(&submission) => {
            let message = if message.trim().is_empty() {
                FALLBACK_ERROR.to_string()
            } else {
                message
            };
            let remaining = without(in_flight, submission);
            let new_state = if remaining.is_empty() {
                ChatState::Error {
                    message: message.clone(),
                }
            } else {
                ChatState::Pending {
                    in_flight: remaining,
                }
            };
            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::remove_placeholder(submission))
                .with_effect(Effect::AppendMessage(Message::new(
                    reply_id,
                    Role::Error,
                    message,
                ))))
        }

        (
            _,
            Event::RelayReplied { submission, .. } | Event::RelayFailed { submission, .. },
        ) => Err(TransitionError::UnknownSubmission(submission)),
    }
}

// Helper functions

fn start_submission(
    mut in_flight: Vec<MessageId>,
    role: Role,
    content: String,
    message_id: MessageId,
    placeholder_id: MessageId,
) -> TransitionResult {
    in_flight.push(placeholder_id);
    let prompt = content.clone();
    TransitionResult::new(ChatState::Pending { in_flight })
        .with_effect(Effect::append_pending(
            Message::new(message_id, role, content),
            Message::new(placeholder_id, Role::Loading, PLACEHOLDER_TEXT),
        ))
        .with_effect(Effect::send_prompt(placeholder_id, prompt))
}

fn without(in_flight: &[MessageId], submission: MessageId) -> Vec<MessageId> {
    in_flight
        .iter()
        .copied()
        .filter(|id| *id != submission)
        .collect()
}
