//! "Help me decide" prompt builder
//!
//! Packages a handful of options and optional context into a single prompt
//! that asks the model to commit to exactly one option.

use thiserror::Error;

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 5;

const INSTRUCTIONS: &str = "\
1. You MUST choose exactly one option - no asking for clarifications or more information.
2. Start your response with \"I choose Option X\" where X is the number of your chosen option.
3. Then provide a brief explanation of why you chose that option, working with whatever information is available.
4. If options seem similar or information is limited, make reasonable assumptions to differentiate them.
5. Be confident and decisive in your choice, even if you have to make educated guesses.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecisionError {
    #[error("Option count must be between {} and {}, got {0}", MIN_OPTIONS, MAX_OPTIONS)]
    OptionCount(usize),
    #[error("There is no option {} (only {count})", .index + 1)]
    OptionIndex { index: usize, count: usize },
    #[error("Please fill in option(s) {}", join_numbers(.0))]
    BlankOptions(Vec<usize>),
}

fn join_numbers(numbers: &[usize]) -> String {
    numbers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the decision prompt
///
/// Options are numbered from 1 in input order and trimmed. The context
/// section only appears when the context is not blank.
pub fn build_decision_prompt<S: AsRef<str>>(options: &[S], context: Option<&str>) -> String {
    let option_lines = options
        .iter()
        .enumerate()
        .map(|(i, option)| format!("{}. {}", i + 1, option.as_ref().trim()))
        .collect::<Vec<_>>()
        .join("\n");

    let context_section = match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!("\nAdditional Context:\n{context}\n"),
        None => String::new(),
    };

    format!(
        "\nI need you to make a decisive choice between {count} options. You MUST choose one option, \
         even if the information is limited or the options seem similar.\n\n\
         My Options:\n{option_lines}\n\n{context_section}\n\nInstructions:\n{INSTRUCTIONS}\n",
        count = options.len(),
    )
}

/// Decision form state, from entering decision mode until submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionSpec {
    options: Vec<String>,
    context: String,
}

impl Default for DecisionSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionSpec {
    pub fn new() -> Self {
        Self {
            options: vec![String::new(); MIN_OPTIONS],
            context: String::new(),
        }
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Change the number of options; existing entries are cleared
    pub fn set_option_count(&mut self, count: usize) -> Result<(), DecisionError> {
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&count) {
            return Err(DecisionError::OptionCount(count));
        }
        self.options = vec![String::new(); count];
        Ok(())
    }

    pub fn set_option(&mut self, index: usize, text: impl Into<String>) -> Result<(), DecisionError> {
        let count = self.options.len();
        let slot = self
            .options
            .get_mut(index)
            .ok_or(DecisionError::OptionIndex { index, count })?;
        *slot = text.into();
        Ok(())
    }

    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = context.into();
    }

    /// Every option must be non-blank; reports the 1-based numbers of blank ones
    pub fn validate(&self) -> Result<(), DecisionError> {
        let blank: Vec<usize> = self
            .options
            .iter()
            .enumerate()
            .filter(|(_, option)| option.trim().is_empty())
            .map(|(i, _)| i + 1)
            .collect();
        if blank.is_empty() {
            Ok(())
        } else {
            Err(DecisionError::BlankOptions(blank))
        }
    }

    pub fn build_prompt(&self) -> String {
        build_decision_prompt(self.options.as_slice(), Some(self.context.as_str()))
    }

    /// Back to a blank two-option form
    pub fn reset(&mut self) {
        self.options = vec![String::new(); MIN_OPTIONS];
        self.context.clear();
    }
}
