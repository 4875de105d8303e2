use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the module registry, the generators and the toolchain glue.
#[derive(Debug, Error)]
pub enum BimaError {
    /// Invalid or missing user input. Nothing was written.
    #[error("{0}")]
    Validation(String),

    /// A module must carry at least one column before anything is emitted.
    #[error("You must have at least one column in module '{module}'")]
    NoFields { module: String },

    /// A prompt could not be answered (terminal I/O failure).
    #[error("Failed to read answer for '{prompt}': {message}")]
    Interaction { prompt: String, message: String },

    /// The user aborted a prompt.
    #[error("Cancelled.")]
    Cancelled,

    #[error("Unknown wire type '{0}'")]
    UnknownWireType(String),

    #[error("Failed to {action} {}", .path.display())]
    ArtifactIo {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A staged commit failed midway.
    #[error(
        "Failed to write {} after {} artifact(s) were applied ({})",
        .failed.display(),
        .applied.len(),
        rollback_note(.rolled_back)
    )]
    PartialApply {
        applied: Vec<PathBuf>,
        failed: PathBuf,
        rolled_back: bool,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {}", exit_code(.code))]
    ExternalTool { command: String, code: Option<i32> },

    #[error("Failed to start `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Failed to render template")]
    Render(#[from] askama::Error),
}

fn rollback_note(rolled_back: &bool) -> &'static str {
    if *rolled_back {
        "rolled back"
    } else {
        "rollback incomplete"
    }
}

fn exit_code(code: &Option<i32>) -> String {
    code.map(|c| c.to_string()).unwrap_or_else(|| "unknown".to_string())
}

impl BimaError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BimaError::ArtifactIo {
            action,
            path: path.into(),
            source,
        }
    }

    /// Conditions that end the command with a message and a zero exit status.
    pub fn is_graceful(&self) -> bool {
        matches!(
            self,
            BimaError::Validation(_) | BimaError::NoFields { .. } | BimaError::Cancelled
        )
    }
}
