//! Test utilities for workfile-lib.
//!
//! Helpers for tests that lay out fake subdirectories with their own build
//! scripts and run them through a shell.

use std::path::Path;

/// Returns the shell program and leading args that run `script` from the
/// current directory. The action name is appended after these by the runner.
#[cfg(unix)]
pub fn shell(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec![script.to_string()])
}

#[cfg(windows)]
pub fn shell(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Create `root/subdir/build.sh` with the given body.
///
/// The script receives the action name as `$1`.
pub fn write_build_script(root: &Path, subdir: &str, body: &str) {
  let dir = root.join(subdir);
  std::fs::create_dir_all(&dir).unwrap();
  std::fs::write(dir.join("build.sh"), format!("#!/bin/sh\n{}\n", body)).unwrap();
}
