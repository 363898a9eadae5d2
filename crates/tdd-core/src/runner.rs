//! External command execution and tool lookup.
//!
//! Both are traits so the orchestrator can be driven by fakes in tests. The
//! system implementations capture stdout and stderr into one anonymous temp
//! file, giving a single interleaved stream, and bound each command by a
//! wall-clock timeout.

use serde::{Deserialize, Serialize};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Exit code reserved for "the engine could not run or finish the command".
pub const INFRA_FAILURE_CODE: i32 = -1;

/// Added to the signal number for children killed by a signal.
pub const SIGNAL_EXIT_BASE: i32 = 128;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// CommandResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub command: Vec<String>,
    pub exit_code: i32,
    /// Merged stdout and stderr, or a message when `exit_code` is -1.
    pub output: String,
}

impl CommandResult {
    pub fn infra_failure(command: &[String], message: impl Into<String>) -> Self {
        Self {
            command: command.to_vec(),
            exit_code: INFRA_FAILURE_CODE,
            output: message.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// The command as a single shell-like string, for display.
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

pub trait CommandRunner {
    /// Run `argv` in `cwd`. Never fails: launch errors and timeouts are
    /// reported as exit code -1.
    fn run(&self, argv: &[String], cwd: &Path, timeout: Duration) -> CommandResult;
}

pub trait ToolLocator {
    fn is_available(&self, program: &str) -> bool;
}

// ---------------------------------------------------------------------------
// System implementations
// ---------------------------------------------------------------------------

/// Resolves programs on `PATH` via `which`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLocator;

impl ToolLocator for PathLocator {
    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Runs real subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[String], cwd: &Path, timeout: Duration) -> CommandResult {
        tracing::debug!(command = %argv.join(" "), cwd = %cwd.display(), "running command");
        match run_captured(argv, cwd, timeout) {
            Ok((code, output)) => CommandResult {
                command: argv.to_vec(),
                exit_code: code,
                output,
            },
            Err(message) => {
                tracing::warn!(command = %argv.join(" "), %message, "command did not complete");
                CommandResult::infra_failure(argv, message)
            }
        }
    }
}

fn run_captured(
    argv: &[String],
    cwd: &Path,
    timeout: Duration,
) -> std::result::Result<(i32, String), String> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| "Error: empty command".to_string())?;

    let mut capture = tempfile::tempfile().map_err(|e| format!("Error: capture file: {e}"))?;
    let stderr = capture
        .try_clone()
        .map_err(|e| format!("Error: capture file: {e}"))?;
    let stdout = capture
        .try_clone()
        .map_err(|e| format!("Error: capture file: {e}"))?;

    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .spawn()
        .map_err(|e| format!("Error: failed to run {program}: {e}"))?;

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if started.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(format!(
                        "Timeout: {} timed out after {} seconds",
                        argv.join(" "),
                        timeout.as_secs()
                    ));
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(format!("Error: wait for {program} failed: {e}")),
        }
    };

    let mut bytes = Vec::new();
    capture
        .seek(SeekFrom::Start(0))
        .and_then(|_| capture.read_to_end(&mut bytes))
        .map_err(|e| format!("Error: read output of {program}: {e}"))?;

    Ok((exit_code(status), String::from_utf8_lossy(&bytes).into_owned()))
}

/// The child's exit code. A child killed by a signal reports `128 + signal`,
/// the shell convention, so a crashing tool never looks like an engine
/// failure.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return SIGNAL_EXIT_BASE + signal;
        }
    }
    INFRA_FAILURE_CODE
}

/// Build an argv from string literals.
pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
