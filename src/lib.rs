//! Helper chat: a prompt relay in front of a hosted generative model, and
//! the conversation controller that talks to it.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod config;
pub mod conversation;
pub mod decision;
pub mod llm;
pub mod relay;
pub mod state_machine;
