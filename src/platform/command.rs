//! External command execution for mount and unmount operations
//!
//! Commands are described by a [`CommandSpec`] and executed through the
//! [`CommandRunner`] capability so tests can substitute a fake. Arguments are
//! passed straight to the program, never through a shell.

use std::fmt;
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

/// Poll interval while waiting on a child with a deadline.
const WAIT_POLL: Duration = Duration::from_millis(20);

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// What a finished command reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Capability to run an external command to completion.
pub trait CommandRunner {
    fn run(&self, command: &CommandSpec) -> io::Result<CommandOutput>;
}

/// Runs commands with `std::process`, optionally killing them after a deadline.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner {
    timeout: Option<Duration>,
}

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill commands that run longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, command: &CommandSpec) -> io::Result<CommandOutput> {
        debug!("Running `{}`", command);

        let deadline = self.timeout.map(|limit| (Instant::now() + limit, limit));
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain both pipes off-thread so a chatty child cannot block on a full pipe.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match deadline {
            Some((at, limit)) => wait_with_deadline(&mut child, at, limit, command)?,
            None => child.wait()?,
        };

        // A forked descendant can keep the pipes open after the child exits,
        // so collecting output counts against the same deadline.
        Ok(CommandOutput {
            code: status.code(),
            stdout: collect(&stdout, deadline, command)?,
            stderr: collect(&stderr, deadline, command)?,
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

fn collect(
    output: &mpsc::Receiver<String>,
    deadline: Option<(Instant, Duration)>,
    command: &CommandSpec,
) -> io::Result<String> {
    let Some((at, limit)) = deadline else {
        return Ok(output.recv().unwrap_or_default());
    };
    match output.recv_timeout(at.saturating_duration_since(Instant::now())) {
        Ok(text) => Ok(text),
        Err(RecvTimeoutError::Disconnected) => Ok(String::new()),
        Err(RecvTimeoutError::Timeout) => {
            warn!("`{}` still holds its output open after {:?}", command, limit);
            Err(timed_out(command, limit))
        }
    }
}

fn wait_with_deadline(
    child: &mut Child,
    deadline: Instant,
    limit: Duration,
    command: &CommandSpec,
) -> io::Result<ExitStatus> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            warn!("`{}` exceeded {:?}, killing it", command, limit);
            let _ = child.kill();
            let _ = child.wait();
            return Err(timed_out(command, limit));
        }
        thread::sleep(WAIT_POLL);
    }
}

fn timed_out(command: &CommandSpec, limit: Duration) -> io::Error {
    io::Error::new(
        io::ErrorKind::TimedOut,
        format!("`{}` timed out after {:?}", command, limit),
    )
}

// ============================================================================
// Exit status classification
// ============================================================================

/// Outcome of a mount or unmount request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MountStatus {
    /// Location was already in the requested state; nothing was run
    Unchanged,
    /// The command ran and succeeded
    Changed,
    /// The command failed, was killed, or could not be spawned
    Failed,
}

impl MountStatus {
    /// Numeric status code: 0 unchanged, 1 changed, -1 failed.
    pub fn code(self) -> i32 {
        match self {
            MountStatus::Unchanged => 0,
            MountStatus::Changed => 1,
            MountStatus::Failed => -1,
        }
    }

    /// Classify the result of running a mount or unmount command.
    pub fn from_outcome(outcome: &io::Result<CommandOutput>) -> Self {
        match outcome {
            Ok(output) if output.success() => MountStatus::Changed,
            _ => MountStatus::Failed,
        }
    }
}

impl fmt::Display for MountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountStatus::Unchanged => write!(f, "unchanged"),
            MountStatus::Changed => write!(f, "changed"),
            MountStatus::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(code: Option<i32>) -> io::Result<CommandOutput> {
        Ok(CommandOutput { code, ..Default::default() })
    }

    #[test]
    fn test_classify_success() {
        assert_eq!(MountStatus::from_outcome(&output(Some(0))), MountStatus::Changed);
    }

    #[test]
    fn test_classify_failures() {
        assert_eq!(MountStatus::from_outcome(&output(Some(32))), MountStatus::Failed);
        // Killed by a signal
        assert_eq!(MountStatus::from_outcome(&output(None)), MountStatus::Failed);

        let spawn_err = Err(io::Error::new(io::ErrorKind::NotFound, "no such program"));
        assert_eq!(MountStatus::from_outcome(&spawn_err), MountStatus::Failed);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(MountStatus::Unchanged.code(), 0);
        assert_eq!(MountStatus::Changed.code(), 1);
        assert_eq!(MountStatus::Failed.code(), -1);
    }

    #[test]
    fn test_command_display() {
        let command = CommandSpec::new("mount").args(["/dev/sdb1", "/mnt/usb"]);
        assert_eq!(command.to_string(), "mount /dev/sdb1 /mnt/usb");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_exit_codes() {
        let runner = SystemCommandRunner::new();

        let ok = runner.run(&CommandSpec::new("true")).unwrap();
        assert!(ok.success());

        let fail = runner.run(&CommandSpec::new("false")).unwrap();
        assert_eq!(fail.code, Some(1));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_stdout() {
        let runner = SystemCommandRunner::new();
        let out = runner.run(&CommandSpec::new("echo").arg("mounted")).unwrap();
        assert_eq!(out.stdout.trim(), "mounted");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_timeout() {
        let runner = SystemCommandRunner::with_timeout(Some(Duration::from_millis(100)));
        let err = runner.run(&CommandSpec::new("sleep").arg("5")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_covers_background_descendants() {
        let runner = SystemCommandRunner::with_timeout(Some(Duration::from_millis(200)));
        let started = Instant::now();
        let err = runner
            .run(&CommandSpec::new("sh").args(["-c", "sleep 4 & exit 0"]))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_output_is_kept() {
        let runner = SystemCommandRunner::new();
        let out = runner.run(&CommandSpec::new("printf").arg("\\377mounted")).unwrap();
        assert!(out.stdout.ends_with("mounted"));
        assert!(out.stdout.contains('\u{FFFD}'));
    }
}
