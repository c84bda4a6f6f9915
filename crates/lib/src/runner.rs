//! Concrete subdirectory runners.
//!
//! [`CommandRunner`] invokes each subdirectory's own build description as a
//! child process. [`DryRunRunner`] only records what would have run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Mutex;

use tokio::process::Command;
use tracing::{debug, info};

use crate::action::Action;
use crate::dispatch::{RunError, SubdirRunner};

/// Default program used to run a subdirectory's build description.
pub const DEFAULT_PROGRAM: &str = "ruby";

/// Default arguments passed before the action name.
pub const DEFAULT_ARGS: &[&str] = &["workfile.rb"];

/// Lines of captured stderr kept on a failed command.
const STDERR_TAIL_LINES: usize = 20;

/// Runs `<program> <args...> <action>` inside `root/<subdir>`.
#[derive(Debug, Clone)]
pub struct CommandRunner {
  root: PathBuf,
  program: String,
  args: Vec<String>,
  env: BTreeMap<String, String>,
  capture_output: bool,
}

impl CommandRunner {
  /// A runner using the default build description command.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      program: DEFAULT_PROGRAM.to_string(),
      args: DEFAULT_ARGS.iter().map(|s| s.to_string()).collect(),
      env: BTreeMap::new(),
      capture_output: false,
    }
  }

  /// Replace the program and its leading arguments.
  pub fn with_command(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
    self.program = program.into();
    self.args = args;
    self
  }

  /// Set an environment variable for every child process.
  pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.insert(key.into(), value.into());
    self
  }

  /// Capture child output instead of inheriting the terminal. Captured output
  /// is logged at debug level, and the tail of stderr is attached to the
  /// error when the command fails. Used when subdirectories run concurrently.
  pub fn with_captured_output(mut self, capture: bool) -> Self {
    self.capture_output = capture;
    self
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// The command line that would run for `action`, for display.
  pub fn command_line(&self, action: Action) -> String {
    let mut parts = Vec::with_capacity(self.args.len() + 2);
    parts.push(self.program.as_str());
    parts.extend(self.args.iter().map(String::as_str));
    parts.push(action.as_str());
    parts.join(" ")
  }

  fn subdir_path(&self, subdir: &str) -> PathBuf {
    self.root.join(subdir)
  }
}

impl SubdirRunner for CommandRunner {
  async fn run(&self, subdir: &str, action: Action) -> Result<(), RunError> {
    let dir = self.subdir_path(subdir);
    if !dir.is_dir() {
      return Err(RunError::MissingDirectory(dir));
    }

    let cmd = self.command_line(action);
    info!(subdir = %subdir, cmd = %cmd, "executing build description");

    let mut command = Command::new(&self.program);
    command.args(&self.args).arg(action.as_str()).current_dir(&dir).envs(&self.env);

    let (status, stderr) = if self.capture_output {
      let output = command.stdin(Stdio::null()).output().await?;

      let stdout = String::from_utf8_lossy(&output.stdout);
      let stderr = String::from_utf8_lossy(&output.stderr);
      if !stdout.is_empty() {
        debug!(subdir = %subdir, stdout = %stdout, "command stdout");
      }
      if !stderr.is_empty() {
        debug!(subdir = %subdir, stderr = %stderr, "command stderr");
      }

      (output.status, stderr_tail(&stderr))
    } else {
      (command.status().await?, String::new())
    };

    if !status.success() {
      return Err(RunError::CommandFailed {
        cmd,
        code: status.code(),
        stderr,
      });
    }

    Ok(())
  }
}

/// Last [`STDERR_TAIL_LINES`] non-blank lines of captured error output.
fn stderr_tail(stderr: &str) -> String {
  let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
  let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
  lines[start..].join("\n")
}

/// Records the actions it is asked to run without running anything.
#[derive(Debug, Default)]
pub struct DryRunRunner {
  planned: Mutex<Vec<(String, Action)>>,
}

impl DryRunRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Every `(subdir, action)` pair seen so far, in call order.
  pub fn planned(&self) -> Vec<(String, Action)> {
    match self.planned.lock() {
      Ok(planned) => planned.clone(),
      Err(poisoned) => poisoned.into_inner().clone(),
    }
  }
}

impl SubdirRunner for DryRunRunner {
  async fn run(&self, subdir: &str, action: Action) -> Result<(), RunError> {
    info!(subdir = %subdir, action = %action, "dry run: would run build description");
    match self.planned.lock() {
      Ok(mut planned) => planned.push((subdir.to_string(), action)),
      Err(poisoned) => poisoned.into_inner().push((subdir.to_string(), action)),
    }
    Ok(())
  }
}
