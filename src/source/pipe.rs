//! Spawned-process line source.
//!
//! Runs a command with its stdout connected to a pipe, reads that pipe on a
//! background thread and hands complete lines to the event loop on demand.

use super::LineReader;
use crate::model::error::InputError;
use std::process::{Child, Command, ExitStatus, Stdio};
use tracing::{debug, info, warn};

/// Shell used when `$SHELL` is not set.
const FALLBACK_SHELL: &str = "/bin/sh";

/// A running command whose stdout feeds the viewport.
///
/// # Design
///
/// - stdout is read on a background thread; `poll()` never blocks
/// - pausing holds delivery: lines stay queued until `resume()`; once the
///   queue is full the reader stops and the process blocks on its pipe
/// - the child is killed and reaped on `close()` or drop
#[derive(Debug)]
pub struct PipeSource {
    command: String,
    child: Option<Child>,
    lines: LineReader,
    paused: bool,
    drained: bool,
    status: Option<ExitStatus>,
}

impl PipeSource {
    /// Spawn `argv[0]` with the remaining arguments.
    ///
    /// # Errors
    ///
    /// Returns `InputError::EmptyCommand` for an empty `argv` and
    /// `InputError::Spawn` if the program cannot be started.
    pub fn spawn<S: AsRef<str>>(argv: &[S]) -> Result<Self, InputError> {
        let (program, args) = argv.split_first().ok_or(InputError::EmptyCommand)?;
        let mut command = Command::new(program.as_ref());
        command.args(args.iter().map(AsRef::as_ref));
        let label = argv
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        Self::start(command, label)
    }

    /// Spawn `command` through the user's shell (`$SHELL -c`, or `/bin/sh`).
    ///
    /// # Errors
    ///
    /// Returns `InputError::Spawn` if the shell cannot be started.
    pub fn spawn_shell(command: &str) -> Result<Self, InputError> {
        Self::start(shell_command(command), command.to_string())
    }

    fn start(mut command: Command, label: String) -> Result<Self, InputError> {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        let mut child = command.spawn().map_err(|source| InputError::Spawn {
            command: label.clone(),
            source,
        })?;
        let stdout = child.stdout.take().ok_or_else(|| InputError::Spawn {
            command: label.clone(),
            source: std::io::Error::other("child stdout was not captured"),
        })?;
        info!(command = %label, pid = child.id(), "spawned process");
        let lines = LineReader::spawn(stdout, &label);
        Ok(Self {
            command: label,
            child: Some(child),
            lines,
            paused: false,
            drained: false,
            status: None,
        })
    }

    /// The command line this source runs.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Collect lines that arrived since the last poll.
    ///
    /// Returns an empty vec while paused; held lines are delivered after
    /// `resume()`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if reading the pipe failed.
    pub fn poll(&mut self) -> Result<Vec<String>, InputError> {
        if self.paused || self.drained {
            return Ok(Vec::new());
        }
        let (lines, finished) = self.lines.drain()?;
        if finished {
            debug!(command = %self.command, "pipe drained");
            self.drained = true;
        }
        Ok(lines)
    }

    /// Hold delivery of new lines.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Release delivery of new lines.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether delivery is held.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the process exited and all of its output was delivered.
    pub fn has_ended(&mut self) -> bool {
        self.drained && self.exit_status().is_some()
    }

    /// Exit status, once the process has terminated.
    pub fn exit_status(&mut self) -> Option<ExitStatus> {
        if self.status.is_none() {
            if let Some(child) = self.child.as_mut() {
                match child.try_wait() {
                    Ok(status) => self.status = status,
                    Err(e) => warn!(command = %self.command, error = %e, "try_wait failed"),
                }
            }
        }
        self.status
    }

    /// Block until the process exits, without discarding queued output.
    ///
    /// A paused process that fills the queue never exits on its own, so only
    /// wait on one whose output fits.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if waiting on the child fails.
    pub fn wait(&mut self) -> Result<Option<ExitStatus>, InputError> {
        if self.status.is_none() {
            if let Some(child) = self.child.as_mut() {
                self.status = Some(child.wait()?);
            }
        }
        Ok(self.status)
    }

    /// Kill the process if still running, reap it and discard pending output.
    pub fn close(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        if self.status.is_none() {
            if let Err(e) = child.kill() {
                debug!(command = %self.command, error = %e, "kill on close failed");
            }
            match child.wait() {
                Ok(status) => self.status = Some(status),
                Err(e) => warn!(command = %self.command, error = %e, "wait on close failed"),
            }
        }
        self.lines.discard();
        self.drained = true;
        info!(command = %self.command, "closed process");
    }
}

impl Drop for PipeSource {
    fn drop(&mut self) {
        self.close();
    }
}

/// Run `argv` in the foreground and wait for it.
///
/// Returns whether it exited successfully. The child inherits the terminal.
///
/// # Errors
///
/// Returns `InputError::Spawn` if the program cannot be started.
pub fn exec<S: AsRef<str>>(argv: &[S]) -> Result<bool, InputError> {
    let (program, args) = argv.split_first().ok_or(InputError::EmptyCommand)?;
    let status = Command::new(program.as_ref())
        .args(args.iter().map(AsRef::as_ref))
        .status()
        .map_err(|source| InputError::Spawn {
            command: program.as_ref().to_string(),
            source,
        })?;
    Ok(status.success())
}

/// Run `command` through the user's shell in the foreground and wait for it.
///
/// # Errors
///
/// Returns `InputError::Spawn` if the shell cannot be started.
pub fn exec_shell(command: &str) -> Result<bool, InputError> {
    let status = shell_command(command)
        .status()
        .map_err(|source| InputError::Spawn {
            command: command.to_string(),
            source,
        })?;
    Ok(status.success())
}

fn shell_command(command: &str) -> Command {
    let shell = std::env::var("SHELL").unwrap_or_else(|_| FALLBACK_SHELL.to_string());
    let mut cmd = Command::new(shell);
    cmd.arg("-c").arg(command);
    cmd
}
