//! Command execution utilities for scheduler queries.

use std::process::Command;
use thiserror::Error;

/// Error type for command execution.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to execute {command}: {error}")]
    Execution { command: String, error: String },
    #[error("Command {command} failed: {stderr}")]
    Failed { command: String, stderr: String },
}

/// Execute a command, blocking until it exits, and return stdout as a string.
pub fn run_command(cmd: &mut Command, name: &str) -> Result<String, CommandError> {
    let output = cmd.output().map_err(|e| CommandError::Execution {
        command: name.to_string(),
        error: e.to_string(),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CommandError::Failed {
            command: name.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command_success() {
        let mut cmd = Command::new("echo");
        cmd.arg("hello");
        let result = run_command(&mut cmd, "echo").unwrap();
        assert_eq!(result.trim(), "hello");
    }

    #[test]
    fn test_run_command_not_found() {
        let mut cmd = Command::new("nonexistent_command_12345");
        let result = run_command(&mut cmd, "nonexistent").unwrap_err();
        assert!(matches!(result, CommandError::Execution { .. }));
    }

    #[test]
    fn test_run_command_nonzero_exit() {
        let mut cmd = Command::new("false");
        let result = run_command(&mut cmd, "false").unwrap_err();
        assert!(matches!(result, CommandError::Failed { .. }));
    }
}
