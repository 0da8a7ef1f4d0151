//! Conversation controller
//!
//! Owns the transcript and the submission state machine, and drives one
//! relay call per submission. The lock is never held across the relay
//! call, so the transcript stays readable while a request is in flight.

mod client;
mod transcript;

pub use client::{HttpRelayClient, LocalRelayClient, RelayClient, UNREACHABLE_MESSAGE};
pub use transcript::{Message, MessageId, Role, Transcript};

use crate::decision::{DecisionError, DecisionSpec};
use crate::state_machine::{
    transition, ChatContext, ChatState, Effect, Event, SubmissionPolicy, TransitionError,
    TransitionResult,
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Recorded when a submission's future is dropped before the relay answers
pub const ABANDONED_MESSAGE: &str = "The request was interrupted before a reply arrived.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Rejected(#[from] TransitionError),
    #[error(transparent)]
    Decision(#[from] DecisionError),
}

struct Inner {
    state: ChatState,
    transcript: Transcript,
    next_id: MessageId,
}

impl Inner {
    fn peek_ids(&self) -> (MessageId, MessageId) {
        (self.next_id, self.next_id + 1)
    }

    fn take_id(&mut self) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Commit a transition; returns the relay call it asks for, if any
    fn commit(&mut self, result: TransitionResult) -> Option<(MessageId, String)> {
        self.state = result.new_state;
        let mut request = None;
        for effect in result.effects {
            if let Effect::SendPrompt { submission, prompt } = effect {
                request = Some((submission, prompt));
            } else {
                self.transcript.apply(&effect);
            }
        }
        request
    }
}

pub struct ConversationController<R: RelayClient> {
    relay: R,
    context: ChatContext,
    inner: Mutex<Inner>,
}

impl<R: RelayClient> ConversationController<R> {
    pub fn new(relay: R, policy: SubmissionPolicy) -> Self {
        Self {
            relay,
            context: ChatContext::new(policy),
            inner: Mutex::new(Inner {
                state: ChatState::Idle,
                transcript: Transcript::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn policy(&self) -> SubmissionPolicy {
        self.context.policy
    }

    pub fn state(&self) -> ChatState {
        self.lock().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.is_loading()
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.lock().transcript.messages().to_vec()
    }

    /// Submit a message and wait for its terminal transcript entry
    ///
    /// Returns the appended `model` or `error` message. Refused submissions
    /// leave the transcript untouched and issue no relay call.
    pub async fn submit(
        &self,
        content: impl Into<String>,
        role: Role,
    ) -> Result<Message, SubmitError> {
        let (submission, prompt) = self.begin(content.into(), role)?;

        let mut guard = PendingSubmission {
            controller: self,
            submission,
            settled: false,
        };
        let outcome = self.relay.send_prompt(&prompt).await;
        guard.settled = true;

        self.resolve(submission, outcome)
    }

    /// Validate, build and submit a decision prompt; the spec is reset once
    /// the submission settles
    pub async fn submit_decision(&self, spec: &mut DecisionSpec) -> Result<Message, SubmitError> {
        spec.validate()?;
        let prompt = spec.build_prompt();
        let message = self.submit(prompt, Role::System).await?;
        spec.reset();
        Ok(message)
    }

    fn begin(&self, content: String, role: Role) -> Result<(MessageId, String), SubmitError> {
        let mut inner = self.lock();
        let (message_id, placeholder_id) = inner.peek_ids();
        let result = transition(
            &inner.state,
            &self.context,
            Event::Submit {
                role,
                content,
                message_id,
                placeholder_id,
            },
        )?;
        inner.next_id = placeholder_id + 1;

        let request = inner
            .commit(result)
            .ok_or(TransitionError::UnknownSubmission(placeholder_id))?;
        tracing::debug!(
            submission = request.0,
            role = role.as_str(),
            in_flight = inner.state.in_flight().len(),
            "Submission started"
        );
        Ok(request)
    }

    fn resolve(
        &self,
        submission: MessageId,
        outcome: Result<String, String>,
    ) -> Result<Message, SubmitError> {
        let mut inner = self.lock();
        let reply_id = inner.take_id();
        let event = match outcome {
            Ok(text) => Event::RelayReplied {
                submission,
                reply_id,
                text,
            },
            Err(message) => Event::RelayFailed {
                submission,
                reply_id,
                message,
            },
        };

        let result = transition(&inner.state, &self.context, event)?;
        inner.commit(result);

        let terminal = inner
            .transcript
            .last()
            .filter(|m| m.id == reply_id)
            .cloned()
            .ok_or(TransitionError::UnknownSubmission(submission))?;
        tracing::debug!(
            submission,
            role = terminal.role.as_str(),
            loading = inner.state.is_loading(),
            "Submission settled"
        );
        Ok(terminal)
    }
}

/// Settles a submission whose future was dropped mid-flight, so the
/// placeholder and loading flag never outlive it
struct PendingSubmission<'a, R: RelayClient> {
    controller: &'a ConversationController<R>,
    submission: MessageId,
    settled: bool,
}

impl<R: RelayClient> Drop for PendingSubmission<'_, R> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!(submission = self.submission, "Submission dropped before reply");
            if let Err(e) = self
                .controller
                .resolve(self.submission, Err(ABANDONED_MESSAGE.to_string()))
            {
                tracing::warn!(error = %e, "Could not settle dropped submission");
            }
        }
    }
}
