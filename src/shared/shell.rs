use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::shared::error::BimaError;

/// Runs external tools (`go`, `git`, `sh`) for the command pipelines.
#[cfg_attr(test, mockall::automock)]
pub trait ShellRunner {
    /// Run `command_line` through `sh -c` in `dir`, inheriting stdio.
    fn run(&self, command_line: &str, dir: &Path) -> Result<(), BimaError>;

    /// Like [`ShellRunner::run`] but returns the captured stdout.
    fn capture(&self, command_line: &str, dir: &Path) -> Result<String, BimaError>;
}

pub struct SystemShell;

impl SystemShell {
    fn command(command_line: &str, dir: &Path) -> Command {
        debug!(command = command_line, dir = %dir.display(), "running");
        let mut command = Command::new("sh");
        command.arg("-c").arg(command_line).current_dir(dir);
        command
    }
}

impl ShellRunner for SystemShell {
    fn run(&self, command_line: &str, dir: &Path) -> Result<(), BimaError> {
        let status = Self::command(command_line, dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| BimaError::Spawn {
                command: command_line.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(BimaError::ExternalTool {
                command: command_line.to_string(),
                code: status.code(),
            })
        }
    }

    fn capture(&self, command_line: &str, dir: &Path) -> Result<String, BimaError> {
        let output = Self::command(command_line, dir)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| BimaError::Spawn {
                command: command_line.to_string(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(BimaError::ExternalTool {
                command: command_line.to_string(),
                code: output.status.code(),
            })
        }
    }
}

/// Quote `arg` for `sh -c` when it holds anything besides plain path characters.
pub fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@+,".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}
