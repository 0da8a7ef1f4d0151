//! Property-based tests for the state machine
//!
//! Drives random submit/resolve sequences through the pure transition
//! function, applying effects to a transcript, and checks the placeholder
//! invariants after every step.

use super::*;
use crate::conversation::{MessageId, Role, Transcript};
use proptest::prelude::*;

// ============================================================================
// Test Harness
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Submit { text: String, system: bool },
    Resolve { pick: usize, ok: bool, text: String },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        ("[a-zA-Z ]{0,12}", any::<bool>()).prop_map(|(text, system)| Op::Submit { text, system }),
        (0usize..4, any::<bool>(), "[a-z ]{0,8}")
            .prop_map(|(pick, ok, text)| Op::Resolve { pick, ok, text }),
    ]
}

fn arb_policy() -> impl Strategy<Value = SubmissionPolicy> {
    prop_oneof![
        Just(SubmissionPolicy::Serialized),
        Just(SubmissionPolicy::Overlapping),
    ]
}

struct Sim {
    context: ChatContext,
    state: ChatState,
    transcript: Transcript,
    next_id: MessageId,
    prompts_sent: usize,
}

impl Sim {
    fn new(policy: SubmissionPolicy) -> Self {
        Self {
            context: ChatContext::new(policy),
            state: ChatState::Idle,
            transcript: Transcript::new(),
            next_id: 1,
            prompts_sent: 0,
        }
    }

    fn step(&mut self, op: Op) {
        let event = match op {
            Op::Submit { text, system } => Event::Submit {
                role: if system { Role::System } else { Role::User },
                content: text,
                message_id: self.next_id,
                placeholder_id: self.next_id + 1,
            },
            Op::Resolve { pick, ok, text } => {
                let in_flight = self.state.in_flight();
                if in_flight.is_empty() {
                    return;
                }
                let submission = in_flight[pick % in_flight.len()];
                let reply_id = self.next_id;
                if ok {
                    Event::RelayReplied {
                        submission,
                        reply_id,
                        text,
                    }
                } else {
                    Event::RelayFailed {
                        submission,
                        reply_id,
                        message: text,
                    }
                }
            }
        };

        let consumed = match &event {
            Event::Submit { .. } => 2,
            _ => 1,
        };

        if let Ok(result) = transition(&self.state, &self.context, event) {
            self.next_id += consumed;
            self.state = result.new_state;
            for effect in &result.effects {
                if !self.transcript.apply(effect) {
                    self.prompts_sent += 1;
                }
            }
        }
    }

    fn drain(&mut self) {
        while !self.state.in_flight().is_empty() {
            self.step(Op::Resolve {
                pick: 0,
                ok: true,
                text: "done".to_string(),
            });
        }
    }

    fn check(&self) -> Result<(), TestCaseError> {
        let in_flight = self.state.in_flight();
        prop_assert_eq!(self.transcript.loading_count(), in_flight.len());
        for id in in_flight {
            prop_assert!(self
                .transcript
                .messages()
                .iter()
                .any(|m| m.id == *id && m.role == Role::Loading));
        }
        if self.context.policy == SubmissionPolicy::Serialized {
            prop_assert!(in_flight.len() <= 1);
        }
        prop_assert_eq!(self.state.is_loading(), !in_flight.is_empty());
        let ids: Vec<_> = self.transcript.messages().iter().map(|m| m.id).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        Ok(())
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn placeholders_track_in_flight_submissions(
        policy in arb_policy(),
        ops in proptest::collection::vec(arb_op(), 0..40),
    ) {
        let mut sim = Sim::new(policy);
        for op in ops {
            sim.step(op);
            sim.check()?;
        }
    }

    #[test]
    fn settling_everything_leaves_no_loading_entries(
        policy in arb_policy(),
        ops in proptest::collection::vec(arb_op(), 0..40),
    ) {
        let mut sim = Sim::new(policy);
        for op in ops {
            sim.step(op);
        }
        sim.drain();
        sim.check()?;
        prop_assert_eq!(sim.transcript.loading_count(), 0);
        prop_assert!(!sim.state.is_loading());
    }

    #[test]
    fn every_accepted_submission_sends_exactly_one_prompt(
        policy in arb_policy(),
        ops in proptest::collection::vec(arb_op(), 0..40),
    ) {
        let mut sim = Sim::new(policy);
        for op in ops {
            sim.step(op);
        }
        let submitted = sim
            .transcript
            .messages()
            .iter()
            .filter(|m| matches!(m.role, Role::User | Role::System))
            .count();
        prop_assert_eq!(sim.prompts_sent, submitted);
    }

    #[test]
    fn resolutions_append_exactly_one_terminal_message(
        text in "[a-z]{0,10}",
        ok in any::<bool>(),
    ) {
        let state = ChatState::Pending { in_flight: vec![2] };
        let event = if ok {
            Event::RelayReplied { submission: 2, reply_id: 3, text }
        } else {
            Event::RelayFailed { submission: 2, reply_id: 3, message: text }
        };
        let result = transition(&state, &ChatContext::default(), event).unwrap();
        let appended: Vec<_> = result
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::AppendMessage(m) => Some(m),
                _ => None,
            })
            .collect();
        prop_assert_eq!(appended.len(), 1);
        prop_assert!(!appended[0].content.is_empty() || ok);
        prop_assert_eq!(appended[0].role, if ok { Role::Model } else { Role::Error });
    }
}
