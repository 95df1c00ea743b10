// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed Cordova project, a scripted build
// tool and a recording logger so each integration test can run the whole
// pipeline without spawning `cordova`.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use cordova_reset::config::{Config, Overrides};
use cordova_reset::exec::{ExecResult, Executor};
use cordova_reset::logging::{Log, StepStatus};
use cordova_reset::operations::SystemFileSystemOps;
use cordova_reset::tasks::Context;

/// A `package.json` with two platforms and three plugins, one with variables.
pub const PACKAGE_JSON: &str = r#"{
  "name": "io.example.demo",
  "displayName": "Demo",
  "version": "1.0.0",
  "cordova": {
    "platforms": ["ios", "android"],
    "plugins": {
      "cordova-plugin-whitelist": {},
      "cordova-plugin-facebook4": {
        "APP_ID": "123456789",
        "APP_NAME": "Demo App"
      },
      "cordova-plugin-device": {}
    }
  }
}"#;

/// An isolated project directory backed by a [`tempfile::TempDir`].
pub struct TestProject {
    /// Temporary directory containing the project.
    pub root: tempfile::TempDir,
}

impl TestProject {
    /// Create a project whose manifest is `package_json`.
    pub fn new(package_json: &str) -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::write(root.path().join("package.json"), package_json)
            .expect("write package.json");
        Self { root }
    }

    /// Create a project without any manifest.
    pub fn empty() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Write `cordova-reset.toml` with `content`.
    pub fn with_settings(self, content: &str) -> Self {
        std::fs::write(self.root.path().join("cordova-reset.toml"), content)
            .expect("write settings");
        self
    }

    /// Path to the project root.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Path to the default recovery snapshot.
    pub fn snapshot_path(&self) -> PathBuf {
        self.root.path().join("temp.json")
    }

    /// Resolve configuration with no command-line overrides.
    pub fn config(&self) -> Config {
        Config::load(self.path(), &Overrides::default(), &SystemFileSystemOps)
            .expect("load config")
    }

    /// Build a run context over the scripted tool and a fresh recording log.
    pub fn context(&self, tool: &Arc<ScriptedTool>, dry_run: bool) -> (Context, Arc<RecordingLog>) {
        let log = Arc::new(RecordingLog::default());
        let ctx = Context::new(self.config(), Arc::clone(&log) as Arc<dyn Log>, dry_run)
            .with_executor(Arc::clone(tool) as Arc<dyn Executor>);
        (ctx, log)
    }
}

/// A fake build tool.
///
/// Exit codes are consumed in order; once exhausted every call exits 0.
/// Every call is recorded as a single space-joined command line.
#[derive(Debug, Default)]
pub struct ScriptedTool {
    exit_codes: Mutex<VecDeque<i32>>,
    calls: Mutex<Vec<String>>,
    missing: bool,
}

impl ScriptedTool {
    /// A tool that succeeds every time.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// A tool that exits with `codes` for its first calls.
    pub fn with_exit_codes(codes: &[i32]) -> Self {
        Self {
            exit_codes: Mutex::new(codes.iter().copied().collect()),
            ..Self::default()
        }
    }

    /// A tool that is not on PATH.
    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls poisoned").clone()
    }
}

impl Executor for ScriptedTool {
    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        let mut line = vec![program];
        line.extend_from_slice(args);
        self.calls.lock().expect("calls poisoned").push(line.join(" "));
        let code = self
            .exit_codes
            .lock()
            .expect("codes poisoned")
            .pop_front()
            .unwrap_or(0);
        Ok(ExecResult {
            stdout: String::new(),
            stderr: if code == 0 {
                String::new()
            } else {
                format!("scripted failure {code}")
            },
            success: code == 0,
            code: Some(code),
        })
    }

    fn which(&self, _: &str) -> bool {
        !self.missing
    }
}

/// A [`Log`] that keeps every console line prefixed with its kind.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<String>>,
    steps: Mutex<Vec<(String, StepStatus)>>,
}

impl RecordingLog {
    fn push(&self, kind: &str, msg: &str) {
        self.lines
            .lock()
            .expect("lines poisoned")
            .push(format!("{kind} {msg}"));
    }

    /// Lines a non-verbose console would show.
    pub fn console(&self) -> Vec<String> {
        self.lines
            .lock()
            .expect("lines poisoned")
            .iter()
            .filter(|l| !l.starts_with("debug "))
            .cloned()
            .collect()
    }

    /// Status lines only (everything after the header).
    pub fn status_lines(&self) -> Vec<String> {
        self.console()
            .into_iter()
            .filter(|l| !l.starts_with("header "))
            .collect()
    }

    /// Recorded step statuses.
    pub fn steps(&self) -> Vec<(String, StepStatus)> {
        self.steps.lock().expect("steps poisoned").clone()
    }
}

impl Log for RecordingLog {
    fn header(&self, msg: &str) {
        self.push("header", msg);
    }
    fn success(&self, msg: &str) {
        self.push("ok", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry-run", msg);
    }
    fn record_step(&self, name: &str, status: StepStatus, _: Option<&str>) {
        self.steps
            .lock()
            .expect("steps poisoned")
            .push((name.to_string(), status));
    }
}
