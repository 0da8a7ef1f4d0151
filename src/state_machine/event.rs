//! Events that can occur during a conversation

use crate::conversation::{MessageId, Role};

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The user (or the decision form) submits a prompt
    Submit {
        role: Role,
        content: String,
        message_id: MessageId,
        /// Id of the loading placeholder; doubles as the submission's correlation id
        placeholder_id: MessageId,
    },

    /// The relay answered with model text
    RelayReplied {
        submission: MessageId,
        reply_id: MessageId,
        text: String,
    },

    /// The relay call failed or reported an error
    RelayFailed {
        submission: MessageId,
        reply_id: MessageId,
        message: String,
    },
}
