//! External command execution
//!
//! The scaffolding steps never spawn processes directly; they go through a
//! [`CommandRunner`] so tests can record invocations instead.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;

use tracing::debug;

use crate::errors::ScaffoldError;

/// Exit status of a finished command. `code` is `None` when the process was
/// killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub code: Option<i32>,
}

impl RunStatus {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn failure(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Runs a named program with arguments in a working directory
pub trait CommandRunner {
    /// Blocks until the program exits. `Err` means it could not be launched.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> std::io::Result<RunStatus>;
}

/// Spawns real processes; output is discarded, only the exit status counts
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> std::io::Result<RunStatus> {
        debug!(program, ?args, cwd = %cwd.display(), "spawning");
        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        Ok(RunStatus { code: status.code() })
    }
}

/// Run a command and map launch failures and non-zero exits to
/// [`ScaffoldError::Subprocess`]
pub fn run_checked(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[&str],
    cwd: &Path,
) -> Result<(), ScaffoldError> {
    let command = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");

    match runner.run(program, args, cwd) {
        Ok(status) if status.is_success() => Ok(()),
        Ok(status) => Err(ScaffoldError::Subprocess {
            command,
            reason: status.to_string(),
        }),
        Err(e) => Err(ScaffoldError::Subprocess {
            command,
            reason: format!("could not launch: {}", e),
        }),
    }
}

/// One recorded call to [`RecordingRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    /// Program and arguments joined by spaces
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Records invocations without spawning anything.
///
/// Every call succeeds unless its command line contains a configured
/// failure pattern. An optional hook runs on successful calls, which lets
/// tests mimic side effects such as `go mod init` writing `go.mod`.
#[derive(Default)]
pub struct RecordingRunner {
    invocations: Mutex<Vec<Invocation>>,
    fail_on: Vec<String>,
    on_success: Option<Box<dyn Fn(&Invocation) + Send + Sync>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any command whose command line contains `pattern`
    pub fn failing_on(mut self, pattern: impl Into<String>) -> Self {
        self.fail_on.push(pattern.into());
        self
    }

    pub fn with_hook(mut self, hook: impl Fn(&Invocation) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(hook));
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.invocations().iter().map(Invocation::command_line).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> std::io::Result<RunStatus> {
        let invocation = Invocation {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.to_path_buf(),
        };
        let line = invocation.command_line();
        if let Ok(mut calls) = self.invocations.lock() {
            calls.push(invocation.clone());
        }

        if self.fail_on.iter().any(|p| line.contains(p.as_str())) {
            return Ok(RunStatus::failure(1));
        }
        if let Some(hook) = &self.on_success {
            hook(&invocation);
        }
        Ok(RunStatus::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_checked_maps_nonzero_exit() {
        let runner = RecordingRunner::new().failing_on("mod init");
        let err = run_checked(&runner, "go", &["mod", "init", "demo"], Path::new(".")).unwrap_err();
        assert!(err.is_subprocess());
        assert!(err.to_string().contains("go mod init demo"));
        assert!(err.to_string().contains("exit status 1"));
    }

    #[test]
    fn test_recording_runner_records_in_order() {
        let runner = RecordingRunner::new();
        run_checked(&runner, "go", &["mod", "init", "a"], Path::new("/p")).unwrap();
        run_checked(&runner, "go", &["get", "-u", "b"], Path::new("/p")).unwrap();

        assert_eq!(runner.command_lines(), vec!["go mod init a", "go get -u b"]);
        assert_eq!(runner.invocations()[1].cwd, PathBuf::from("/p"));
    }

    #[test]
    fn test_system_runner_missing_program_is_launch_failure() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = run_checked(
            &SystemRunner,
            "goscaffold-definitely-not-a-real-binary",
            &[],
            temp.path(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("could not launch"));
    }

    #[test]
    fn test_signal_status_display() {
        assert_eq!(RunStatus { code: None }.to_string(), "terminated by signal");
        assert!(!RunStatus { code: None }.is_success());
    }
}
