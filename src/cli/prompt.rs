use std::collections::VecDeque;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};

use super::CliError;

/// Source of answers for the terminal session.
pub trait Prompter {
    fn text(&mut self, label: &str) -> Result<String, CliError>;
    fn confirm(&mut self, label: &str) -> Result<bool, CliError>;
    fn select(&mut self, label: &str, options: &[String]) -> Result<usize, CliError>;
    fn multi_select(&mut self, label: &str, options: &[String]) -> Result<Vec<usize>, CliError>;
}

/// Interactive prompts on the controlling terminal.
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&mut self, label: &str) -> Result<String, CliError> {
        let value = Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }

    fn confirm(&mut self, label: &str) -> Result<bool, CliError> {
        let value = Confirm::with_theme(&self.theme)
            .with_prompt(label)
            .default(false)
            .interact()?;
        Ok(value)
    }

    fn select(&mut self, label: &str, options: &[String]) -> Result<usize, CliError> {
        let index = Select::with_theme(&self.theme)
            .with_prompt(label)
            .items(options)
            .default(0)
            .interact()?;
        Ok(index)
    }

    fn multi_select(&mut self, label: &str, options: &[String]) -> Result<Vec<usize>, CliError> {
        let indices = MultiSelect::with_theme(&self.theme)
            .with_prompt(label)
            .items(options)
            .interact()?;
        Ok(indices)
    }
}

/// A canned answer for [`ScriptedPrompter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Confirm(bool),
    Select(usize),
    MultiSelect(Vec<usize>),
}

impl Answer {
    pub fn text(value: impl Into<String>) -> Self {
        Answer::Text(value.into())
    }
}

/// Replays answers in order. Used for tests and unattended rehearsals.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Labels of every prompt shown so far.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, label: &str) -> Result<Answer, CliError> {
        self.asked.push(label.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| CliError::Script(format!("no scripted answer left for `{label}`")))
    }
}

impl Prompter for ScriptedPrompter {
    fn text(&mut self, label: &str) -> Result<String, CliError> {
        match self.next(label)? {
            Answer::Text(value) => Ok(value),
            other => Err(mismatch(label, "text", &other)),
        }
    }

    fn confirm(&mut self, label: &str) -> Result<bool, CliError> {
        match self.next(label)? {
            Answer::Confirm(value) => Ok(value),
            other => Err(mismatch(label, "confirmation", &other)),
        }
    }

    fn select(&mut self, label: &str, _options: &[String]) -> Result<usize, CliError> {
        match self.next(label)? {
            Answer::Select(index) => Ok(index),
            other => Err(mismatch(label, "selection", &other)),
        }
    }

    fn multi_select(&mut self, label: &str, _options: &[String]) -> Result<Vec<usize>, CliError> {
        match self.next(label)? {
            Answer::MultiSelect(indices) => Ok(indices),
            other => Err(mismatch(label, "multi-selection", &other)),
        }
    }
}

fn mismatch(label: &str, expected: &str, got: &Answer) -> CliError {
    CliError::Script(format!(
        "expected a {expected} answer for `{label}`, got {got:?}"
    ))
}
