//! External command execution.

use crate::types::CommandSpec;
use creator_core::{AppError, AppResult};
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

/// Exit status of a finished command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code; `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {}", code),
            None => f.write_str("no exit status (terminated by signal)"),
        }
    }
}

/// Runs one command to completion in a directory.
pub trait CommandRunner {
    fn run(&mut self, command: &CommandSpec, dir: &Path) -> AppResult<CommandStatus>;
}

/// Spawns real processes with inherited stdio.
#[derive(Debug, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&mut self, command: &CommandSpec, dir: &Path) -> AppResult<CommandStatus> {
        // Resolve through PATH first so `npm.cmd` and friends are found on Windows.
        let program = which::which(&command.cmd)
            .map_err(|e| AppError::Command(format!("{} not found: {}", command.cmd, e)))?;

        tracing::debug!("Running {} ({:?}) in {:?}", command, program, dir);

        let status = Command::new(&program)
            .args(&command.args)
            .current_dir(dir)
            .status()
            .map_err(|e| AppError::Command(format!("Failed to run {}: {}", command, e)))?;

        Ok(CommandStatus {
            code: status.code(),
        })
    }
}

/// Reports commands instead of running them (`--dry-run`).
#[derive(Debug)]
pub struct DryRunCommandRunner<W = io::Stderr> {
    out: W,
}

impl DryRunCommandRunner {
    /// Report to stderr.
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }
}

impl Default for DryRunCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> DryRunCommandRunner<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_writer(self) -> W {
        self.out
    }
}

impl<W: Write> CommandRunner for DryRunCommandRunner<W> {
    fn run(&mut self, command: &CommandSpec, dir: &Path) -> AppResult<CommandStatus> {
        writeln!(self.out, "  would run `{}` in {}", command, dir.display())?;
        Ok(CommandStatus::success())
    }
}
