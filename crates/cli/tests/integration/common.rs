//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Subdirectories of the default (non-newlib) configuration.
pub const DEFAULT_SUBDIRS: [&str; 6] = ["MAStd", "MAFS", "MAUtil", "MTXml", "MAUI", "MATest"];

/// Isolated SDK tree.
///
/// Each subdirectory gets a `build.sh` that appends the action it was given
/// to `actions.log` in the same directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Tree with a recording build script in every default subdirectory.
  pub fn with_default_subdirs() -> Self {
    let env = Self::empty();
    for subdir in DEFAULT_SUBDIRS {
      env.write_script(subdir, "echo \"$1\" >> actions.log");
    }
    env
  }

  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  /// Write `root/subdir/build.sh`. The action name arrives as `$1`.
  pub fn write_script(&self, subdir: &str, body: &str) {
    let dir = self.root().join(subdir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("build.sh"), format!("#!/bin/sh\n{}\n", body)).unwrap();
  }

  /// Make a subdirectory's build fail after recording the action.
  pub fn fail_subdir(&self, subdir: &str) {
    self.write_script(subdir, "echo \"$1\" >> actions.log\nexit 2");
  }

  fn log_path(&self, subdir: &str) -> PathBuf {
    self.root().join(subdir).join("actions.log")
  }

  /// Actions recorded by a subdirectory's build script, in order.
  pub fn actions(&self, subdir: &str) -> Vec<String> {
    std::fs::read_to_string(self.log_path(subdir))
      .map(|s| s.lines().map(str::to_string).collect())
      .unwrap_or_default()
  }

  /// Command for the work binary rooted at this tree, using `build.sh`.
  pub fn work_cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("work");
    for var in ["USE_NEWLIB", "INCLUDE_MINUI", "WORK_JOBS", "WORK_RUNNER", "RUST_LOG"] {
      cmd.env_remove(var);
    }
    cmd.arg("-C").arg(self.root()).args(["--runner", "/bin/sh build.sh"]);
    cmd
  }
}
