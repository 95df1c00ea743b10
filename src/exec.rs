//! Subprocess execution behind the [`Executor`] seam.
use anyhow::{Context as _, Result};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

impl ExecResult {
    /// Short description of why the command failed.
    ///
    /// Only one line of output is kept: the last `Error:` line when the tool
    /// printed one, otherwise the first non-empty line. Prefers stderr and
    /// falls back to stdout because some tools (cordova among them) report
    /// errors on stdout.
    #[must_use]
    pub fn failure_detail(&self) -> String {
        let code = self.code.unwrap_or(-1);
        match summary_line(self.output()) {
            Some(line) => format!("exit {code}: {line}"),
            None => format!("exit {code}"),
        }
    }

    /// The full trimmed output the failure detail is taken from.
    #[must_use]
    pub fn output(&self) -> &str {
        if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        }
    }
}

fn summary_line(output: &str) -> Option<&str> {
    let lines = || output.lines().map(str::trim).filter(|l| !l.is_empty());
    lines()
        .rfind(|l| l.starts_with("Error:"))
        .or_else(|| lines().next())
}

/// A command that ran but exited unsuccessfully.
///
/// Displays as a single line; the complete output is kept in
/// [`CommandFailed::output`] for the log file.
#[derive(Debug, thiserror::Error)]
#[error("{program} failed ({detail})")]
pub struct CommandFailed {
    /// Program that was run.
    pub program: String,
    /// One-line failure summary.
    pub detail: String,
    /// Everything the program printed.
    pub output: String,
}

impl CommandFailed {
    /// Describe the failed run of `program`.
    #[must_use]
    pub fn new(program: &str, result: &ExecResult) -> Self {
        Self {
            program: program.to_string(),
            detail: result.failure_detail(),
            output: result.output().to_string(),
        }
    }
}

/// Abstraction over process execution so tasks can be tested without
/// spawning the real build tool.
pub trait Executor: Send + Sync + fmt::Debug {
    /// Run a command, failing if it exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let result = self.run_unchecked(program, args)?;
        if !result.success {
            return Err(CommandFailed::new(program, &result).into());
        }
        Ok(result)
    }

    /// Run a command and return its result regardless of exit status.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process cannot be spawned.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Check if a program is available on PATH, or at a path relative to
    /// the directory commands run in.
    fn which(&self, program: &str) -> bool;
}

/// Production [`Executor`] that spawns real processes.
///
/// Commands run in `dir` when set, otherwise in the current directory.
/// Program paths containing a separator are resolved against that same
/// directory.
#[derive(Debug, Default, Clone)]
pub struct SystemExecutor {
    dir: Option<PathBuf>,
}

impl SystemExecutor {
    /// Create an executor that runs every command inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        let dir = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
        Self { dir: Some(dir) }
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        let found = match &self.dir {
            Some(dir) => which::which_in(program, env::var_os("PATH"), dir),
            None => which::which(program),
        };
        found.ok()
    }
}

impl Executor for SystemExecutor {
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        // Resolve through PATH so `cordova.cmd` shims work on Windows.
        let resolved = self
            .resolve(program)
            .unwrap_or_else(|| PathBuf::from(program));
        let mut cmd = Command::new(resolved);
        cmd.args(args);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        let output = cmd
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(output))
    }

    fn which(&self, program: &str) -> bool {
        self.resolve(program).is_some()
    }
}

/// A program plus its argument vector, rendered shell-style for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name.
    pub program: String,
    /// Arguments passed verbatim to the process.
    pub args: Vec<String>,
}

impl Invocation {
    /// Build an invocation from a program and its arguments.
    #[must_use]
    pub fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
        }
    }

    /// Borrow the arguments as `&str` for [`Executor`] calls.
    #[must_use]
    pub fn arg_refs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        let mut prev: Option<&str> = None;
        for arg in &self.args {
            if prev == Some("--variable")
                && let Some((key, value)) = arg.split_once('=')
            {
                write!(f, " {key}=\"{value}\"")?;
            } else if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
            prev = Some(arg.as_str());
        }
        Ok(())
    }
}
