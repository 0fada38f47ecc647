//! operator interaction seam
//!
//! Batch and navigation logic talk to the operator through [`Prompt`] so the
//! flows can run headlessly in tests with scripted answers.
use {
    color_eyre::eyre::{Context, Result},
    inquire::{Confirm, Select, Text},
};

pub mod navigate;

/// One question to the operator at a time.
pub trait Prompt {
    /// free-form line of input
    fn line(&mut self, message: &str) -> Result<String>;
    /// yes/no question
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
    /// pick one of `options` by index; `None` when the operator declines
    fn select(&mut self, message: &str, options: &[String]) -> Result<Option<usize>>;
}

/// Console implementation on `inquire`.
pub struct ConsolePrompt;

impl Prompt for ConsolePrompt {
    fn line(&mut self, message: &str) -> Result<String> {
        Text::new(message).prompt().context("reading input failed")
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        Confirm::new(message)
            .with_default(default)
            .prompt()
            .context("reading confirmation failed")
    }

    fn select(&mut self, message: &str, options: &[String]) -> Result<Option<usize>> {
        let indexed: Vec<String> = options
            .iter()
            .enumerate()
            .map(|(index, option)| format!("[{index}] {option}"))
            .collect();

        let picked = Select::new(message, indexed.clone())
            .with_help_message("Use arrow keys to navigate, Enter to select, Esc to cancel")
            .prompt_skippable()
            .context("reading selection failed")?;

        Ok(picked.and_then(|choice| indexed.iter().position(|option| *option == choice)))
    }
}
