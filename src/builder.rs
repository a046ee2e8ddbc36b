use crate::error::{ReleaseError, Result};
use std::process::{Command, ExitStatus};

/// Produces the release binary
pub trait Builder {
    /// Run the build, failing unless it exits successfully
    fn build(&self) -> Result<()>;
}

/// Runs the build command through the platform shell
///
/// Output is inherited so the build log streams to the terminal as it runs.
pub struct ShellBuilder {
    command: String,
}

impl ShellBuilder {
    pub fn new(command: impl Into<String>) -> Self {
        ShellBuilder {
            command: command.into(),
        }
    }

    fn shell(&self) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", self.command.as_str()]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", self.command.as_str()]);
            cmd
        }
    }
}

impl Builder for ShellBuilder {
    fn build(&self) -> Result<()> {
        if self.command.trim().is_empty() {
            return Err(ReleaseError::build("build command is empty"));
        }

        tracing::debug!(command = %self.command, "running build");
        let status = self.shell().status().map_err(|e| {
            ReleaseError::build(format!("Failed to start '{}': {}", self.command, e))
        })?;

        check_status(&self.command, status)
    }
}

fn check_status(command: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }

    match status.code() {
        Some(code) => Err(ReleaseError::build(format!(
            "'{}' exited with code {}",
            command, code
        ))),
        None => Err(ReleaseError::build(format!(
            "'{}' was terminated by a signal",
            command
        ))),
    }
}
