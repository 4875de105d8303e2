use inquire::{Confirm, InquireError, Select, Text};

use crate::shared::error::BimaError;

/// Blocking terminal interaction used by the module generator.
pub trait Prompter {
    fn ask_yes_no(&self, prompt: &str, default: bool) -> Result<bool, BimaError>;

    fn ask_text(&self, prompt: &str) -> Result<String, BimaError>;

    fn ask_choice(&self, prompt: &str, options: &[&str]) -> Result<String, BimaError>;

    /// Show a message between prompts, e.g. why an answer was rejected.
    fn notify(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Prompter backed by `inquire`.
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn ask_yes_no(&self, prompt: &str, default: bool) -> Result<bool, BimaError> {
        Confirm::new(prompt)
            .with_default(default)
            .prompt()
            .map_err(|e| interaction_error(prompt, e))
    }

    fn ask_text(&self, prompt: &str) -> Result<String, BimaError> {
        Text::new(prompt)
            .prompt()
            .map_err(|e| interaction_error(prompt, e))
    }

    fn ask_choice(&self, prompt: &str, options: &[&str]) -> Result<String, BimaError> {
        Select::new(prompt, options.to_vec())
            .prompt()
            .map(str::to_string)
            .map_err(|e| interaction_error(prompt, e))
    }
}

fn interaction_error(prompt: &str, error: InquireError) -> BimaError {
    match error {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => BimaError::Cancelled,
        other => BimaError::Interaction {
            prompt: prompt.to_string(),
            message: other.to_string(),
        },
    }
}
