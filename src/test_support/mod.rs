//! Test utilities and mocks for Keel unit tests.
//!
//! [`MockRunner`] stands in for the real [`ProcessRunner`]: it has a fake
//! search path and canned command outputs, and it records every call.
//!
//! # Example
//!
//! ```rust,ignore
//! use keel::test_support::{MockRunner, MockProcessOutput};
//!
//! #[test]
//! fn test_example() {
//!     let runner = MockRunner::new();
//!     runner.add_executable("gcc", "/usr/bin/gcc");
//!     runner.expect("/usr/bin/gcc --version", MockProcessOutput::success("gcc (GCC) 12.2.0"));
//!
//!     // Hand `Arc::new(runner)` to a Resolver...
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{bail, Result};

use crate::core::catalog::CompilerCatalog;
use crate::core::host::Host;
use crate::toolchain::Resolver;
use crate::util::process::{ProcessOutput, ProcessRunner};

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

impl From<MockProcessOutput> for ProcessOutput {
    fn from(mock: MockProcessOutput) -> Self {
        ProcessOutput {
            status: Some(mock.status),
            stdout: mock.stdout,
            stderr: mock.stderr,
        }
    }
}

/// Pattern for matching commands in MockRunner.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
        }
    }
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    /// Pattern to match against commands.
    pub pattern: CommandPattern,
    /// Output to return when matched.
    pub output: MockProcessOutput,
    /// Executable that appears on the search path once this command runs.
    pub installs: Option<(String, PathBuf)>,
    /// Number of times this expectation has been used.
    pub used: usize,
}

impl CommandExpectation {
    /// Create a new expectation.
    pub fn new(pattern: CommandPattern, output: MockProcessOutput) -> Self {
        CommandExpectation {
            pattern,
            output,
            installs: None,
            used: 0,
        }
    }

    /// Make `name` resolvable at `path` after this command has run.
    pub fn installs(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.installs = Some((name.to_string(), path.into()));
        self
    }
}

#[derive(Debug, Clone)]
struct MockExecutable {
    path: PathBuf,
    link_target: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct MockState {
    executables: HashMap<String, MockExecutable>,
    expectations: Vec<CommandExpectation>,
    calls: Vec<String>,
    lookups: Vec<String>,
    default_output: Option<MockProcessOutput>,
}

/// Mock [`ProcessRunner`] with a fake search path.
#[derive(Debug, Default)]
pub struct MockRunner {
    state: Mutex<MockState>,
}

impl MockRunner {
    /// Create a new mock runner with an empty search path.
    pub fn new() -> Self {
        MockRunner::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Put an executable on the search path.
    pub fn add_executable(&self, name: &str, path: impl Into<PathBuf>) -> &Self {
        self.state().executables.insert(
            name.to_string(),
            MockExecutable {
                path: path.into(),
                link_target: None,
            },
        );
        self
    }

    /// Put a symlink on the search path.
    pub fn add_symlink(
        &self,
        name: &str,
        path: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
    ) -> &Self {
        self.state().executables.insert(
            name.to_string(),
            MockExecutable {
                path: path.into(),
                link_target: Some(target.into()),
            },
        );
        self
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Exact(cmd.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            output,
        ))
    }

    /// Add a custom expectation.
    pub fn expect_pattern(&self, expectation: CommandExpectation) -> &Self {
        self.state().expectations.push(expectation);
        self
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&self, output: MockProcessOutput) -> &Self {
        self.state().default_output = Some(output);
        self
    }

    /// All commands that were run, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Number of recorded runs whose command line contains `needle`.
    pub fn call_count(&self, needle: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.contains(needle))
            .count()
    }

    /// All names that were looked up on the search path, in order.
    pub fn lookups(&self) -> Vec<String> {
        self.state().lookups.clone()
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<ProcessOutput> {
        let full_cmd = if args.is_empty() {
            program.display().to_string()
        } else {
            format!("{} {}", program.display(), args.join(" "))
        };

        let mut state = self.state();
        state.calls.push(full_cmd.clone());

        let matched = state
            .expectations
            .iter_mut()
            .find(|exp| exp.pattern.matches(&full_cmd))
            .map(|exp| {
                exp.used += 1;
                (exp.output.clone(), exp.installs.clone())
            });

        if let Some((output, installs)) = matched {
            if let Some((name, path)) = installs {
                state.executables.insert(
                    name,
                    MockExecutable {
                        path,
                        link_target: None,
                    },
                );
            }
            return Ok(output.into());
        }

        if let Some(ref default) = state.default_output {
            return Ok(default.clone().into());
        }

        bail!("unexpected command: {}", full_cmd)
    }

    fn find_executable(&self, name: &str, resolve_symlinks: bool) -> Option<PathBuf> {
        let mut state = self.state();
        state.lookups.push(name.to_string());

        let exe = state.executables.get(name)?;
        match (&exe.link_target, resolve_symlinks) {
            (Some(target), true) => Some(target.clone()),
            _ => Some(exe.path.clone()),
        }
    }
}

/// Build a resolver for `os`/`arch` backed by the given mock runner.
pub fn mock_resolver(os: &str, arch: &str, runner: &Arc<MockRunner>) -> Resolver {
    let runner: Arc<dyn ProcessRunner> = runner.clone();
    Resolver::new(Host::new(os, arch), CompilerCatalog::builtin(), runner)
}

/// A realistic GCC `--version` banner.
pub fn gcc_banner(version: &str) -> String {
    format!(
        "gcc (GCC) {}\nCopyright (C) 2023 Free Software Foundation, Inc.\n",
        version
    )
}

/// A realistic LLVM clang `--version` banner.
pub fn clang_banner(version: &str) -> String {
    format!(
        "clang version {}\nTarget: x86_64-pc-linux-gnu\nThread model: posix\n",
        version
    )
}

/// A realistic Apple clang `--version` banner.
pub fn apple_clang_banner(version: &str) -> String {
    format!(
        "Apple clang version {} (clang-1500.1.0.2.5)\nTarget: arm64-apple-darwin23.2.0\n",
        version
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_expectations() {
        let runner = MockRunner::new();
        runner.expect("gcc --version", MockProcessOutput::success("gcc 12.0.0"));
        runner.expect_prefix("vswhere", MockProcessOutput::failure(1, "boom"));

        let result = runner.run(Path::new("gcc"), &["--version"]).unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, "gcc 12.0.0");

        let result = runner.run(Path::new("vswhere"), &["-legacy"]).unwrap();
        assert_eq!(result.status, Some(1));

        assert_eq!(runner.calls(), vec!["gcc --version", "vswhere -legacy"]);
    }

    #[test]
    fn test_mock_runner_unexpected() {
        let runner = MockRunner::new();
        assert!(runner.run(Path::new("unknown"), &[]).is_err());
    }

    #[test]
    fn test_mock_runner_symlinks() {
        let runner = MockRunner::new();
        runner.add_symlink("cc", "/usr/bin/cc", "/usr/bin/gcc-12");

        assert_eq!(
            runner.find_executable("cc", false),
            Some(PathBuf::from("/usr/bin/cc"))
        );
        assert_eq!(
            runner.find_executable("cc", true),
            Some(PathBuf::from("/usr/bin/gcc-12"))
        );
        assert_eq!(runner.find_executable("clang", false), None);
        assert_eq!(runner.lookups(), vec!["cc", "cc", "clang"]);
    }

    #[test]
    fn test_mock_runner_installs() {
        let runner = MockRunner::new();
        runner.expect_pattern(
            CommandExpectation::new(
                CommandPattern::Contains("install".to_string()),
                MockProcessOutput::success(""),
            )
            .installs("vswhere", "C:/bin/vswhere.exe"),
        );

        assert!(runner.find_executable("vswhere", true).is_none());
        runner.run(Path::new("choco"), &["install", "vswhere"]).unwrap();
        assert_eq!(
            runner.find_executable("vswhere", true),
            Some(PathBuf::from("C:/bin/vswhere.exe"))
        );
    }
}
