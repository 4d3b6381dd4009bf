//! Operator prompt abstraction.
//!
//! The workflow never reads stdin directly; it asks a [`Prompter`]. The CLI
//! provides a dialoguer-backed implementation, tests and scripted runs use
//! [`ScriptedPrompter`].

use std::collections::VecDeque;

use crate::error::DeployError;

/// Interactive input capability required by the deploy flow.
pub trait Prompter {
    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, DeployError>;

    /// Ask for a line of free-form text.
    fn input(&mut self, prompt: &str) -> Result<String, DeployError>;
}

/// Prompter that replays a fixed sequence of answers.
///
/// `confirm` consumes the next answer and interprets `y`/`yes`/`` (empty,
/// meaning "take the default") as acceptance. Running out of answers is
/// reported as cancellation, matching an operator walking away mid-prompt.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    fn next_answer(&mut self) -> Result<String, DeployError> {
        self.answers.pop_front().ok_or(DeployError::Cancelled)
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, _prompt: &str, default: bool) -> Result<bool, DeployError> {
        let answer = self.next_answer()?;
        match answer.trim().to_lowercase().as_str() {
            "" => Ok(default),
            "y" | "yes" => Ok(true),
            _ => Ok(false),
        }
    }

    fn input(&mut self, _prompt: &str) -> Result<String, DeployError> {
        self.next_answer()
    }
}
