//! Subprocess execution and executable lookup.
//!
//! Everything that touches the outside world during resolution goes through
//! [`ProcessRunner`], so probing logic can be exercised against a fake
//! search path in tests.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};

/// Captured result of running a program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with code 0.
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

impl From<Output> for ProcessOutput {
    fn from(output: Output) -> Self {
        ProcessOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Runs programs and finds them on the search path.
pub trait ProcessRunner: Send + Sync {
    /// Run a program to completion and capture its output.
    ///
    /// An `Err` means the program could not be spawned at all; a non-zero
    /// exit is reported through [`ProcessOutput::status`].
    fn run(&self, program: &Path, args: &[&str]) -> Result<ProcessOutput>;

    /// Find an executable on the search path.
    ///
    /// With `resolve_symlinks` unset the returned path is the one found on
    /// the search path (e.g. `/usr/bin/cc`), not what it points to.
    fn find_executable(&self, name: &str, resolve_symlinks: bool) -> Option<PathBuf>;
}

/// [`ProcessRunner`] backed by the real operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<ProcessOutput> {
        let output = ProcessBuilder::new(program).args(args).exec()?;
        Ok(output.into())
    }

    fn find_executable(&self, name: &str, resolve_symlinks: bool) -> Option<PathBuf> {
        let path = which::which(name).ok()?;
        if resolve_symlinks {
            std::fs::canonicalize(&path).ok().or(Some(path))
        } else {
            Some(path)
        }
    }
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Execute the command and wait for completion.
    ///
    /// Stdin is closed so a probe can never sit waiting for input.
    pub fn exec(&self) -> Result<Output> {
        tracing::debug!("running `{}`", self.display_command());

        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to run `{}`", self.program.display()))
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("vswhere")
            .args(["-legacy", "-version", "16"])
            .arg("-sort");

        assert_eq!(pb.display_command(), "vswhere -legacy -version 16 -sort");
    }

    #[test]
    fn test_output_success() {
        let ok = ProcessOutput {
            status: Some(0),
            ..ProcessOutput::default()
        };
        assert!(ok.success());

        let killed = ProcessOutput::default();
        assert!(!killed.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_echo() {
        let runner = SystemRunner;
        let echo = runner.find_executable("echo", false).unwrap();
        let output = runner.run(&echo, &["hello"]).unwrap();

        assert!(output.success());
        assert!(output.stdout.contains("hello"));
    }

    #[test]
    fn test_system_runner_missing_executable() {
        let runner = SystemRunner;
        assert!(runner
            .find_executable("keel-definitely-not-installed-anywhere", false)
            .is_none());
    }
}
