//! Target run integration tests.

#![cfg(unix)]

use predicates::prelude::*;

use super::common::{DEFAULT_SUBDIRS, TestEnv};

#[test]
fn default_target_builds_pipe_everywhere() {
  let env = TestEnv::with_default_subdirs();

  env
    .work_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("All subdirectories succeeded"));

  for subdir in DEFAULT_SUBDIRS {
    assert_eq!(env.actions(subdir), vec!["pipe"], "subdir {}", subdir);
  }
}

#[test]
fn explicit_targets_run_in_order() {
  let env = TestEnv::with_default_subdirs();

  env.work_cmd().args(["clean", "native"]).assert().success();

  for subdir in DEFAULT_SUBDIRS {
    assert_eq!(env.actions(subdir), vec!["clean", "native"], "subdir {}", subdir);
  }
}

#[test]
fn failing_subdir_reported_and_others_attempted() {
  let env = TestEnv::with_default_subdirs();
  env.fail_subdir("MAUI");

  env
    .work_cmd()
    .arg("pipe")
    .assert()
    .failure()
    .stderr(predicate::str::contains("pipe failed in 1 subdirectory: MAUI"));

  for subdir in DEFAULT_SUBDIRS {
    assert_eq!(env.actions(subdir), vec!["pipe"], "subdir {}", subdir);
  }
}

#[test]
fn every_failure_listed() {
  let env = TestEnv::with_default_subdirs();
  env.fail_subdir("MAFS");
  env.fail_subdir("MATest");

  env
    .work_cmd()
    .arg("clean")
    .assert()
    .failure()
    .stderr(predicate::str::contains("clean failed in 2 subdirectories"))
    .stderr(predicate::str::contains("MAFS"))
    .stderr(predicate::str::contains("MATest"));
}

#[test]
fn newlib_uses_alternate_stdlib() {
  let env = TestEnv::with_default_subdirs();
  env.write_script("newlib", "echo \"$1 $USE_NEWLIB\" >> actions.log");

  env.work_cmd().args(["USE_NEWLIB=1", "native"]).assert().success();

  assert_eq!(env.actions("newlib"), vec!["native 1"]);
  assert!(env.actions("MAStd").is_empty());
  assert!(env.actions("MAFS").is_empty());
  assert_eq!(env.actions("MATest"), vec!["native"]);
}

#[test]
fn unrecognised_setting_reaches_build_scripts() {
  let env = TestEnv::with_default_subdirs();
  env.write_script("MAUtil", "echo \"$1 $CONFIG\" >> actions.log");

  env.work_cmd().args(["CONFIG=debug", "pipe"]).assert().success();

  assert_eq!(env.actions("MAUtil"), vec!["pipe debug"]);
}

#[test]
fn missing_subdir_is_a_failure() {
  let env = TestEnv::with_default_subdirs();
  std::fs::remove_dir_all(env.root().join("MTXml")).unwrap();

  env
    .work_cmd()
    .assert()
    .failure()
    .stdout(predicate::str::contains("subdirectory not found"));

  assert_eq!(env.actions("MATest"), vec!["pipe"]);
}

#[test]
fn parallel_jobs_build_everything() {
  let env = TestEnv::with_default_subdirs();
  env.fail_subdir("MAStd");

  env.work_cmd().args(["-j", "3", "pipe"]).assert().failure();

  for subdir in DEFAULT_SUBDIRS {
    assert_eq!(env.actions(subdir), vec!["pipe"], "subdir {}", subdir);
  }
}

#[test]
fn parallel_failure_shows_build_errors() {
  let env = TestEnv::with_default_subdirs();
  env.write_script("MAUI", "echo 'error: Widget.cpp:12 undefined symbol' >&2\nexit 2");

  env
    .work_cmd()
    .args(["-j", "4", "pipe"])
    .assert()
    .failure()
    .stdout(predicate::str::contains("error: Widget.cpp:12 undefined symbol"))
    .stderr(predicate::str::contains("error: Widget.cpp:12 undefined symbol"));
}

#[test]
fn json_output_reports_failures() {
  let env = TestEnv::with_default_subdirs();
  env.fail_subdir("MAUI");

  let output = env.work_cmd().args(["--output", "json", "pipe"]).output().unwrap();
  assert!(!output.status.success());

  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value["success"], false);
  let subdirs = value["targets"][0]["result"]["subdirs"].as_array().unwrap();
  assert_eq!(subdirs.len(), 6);
  let failed: Vec<&str> = subdirs
    .iter()
    .filter(|s| s["success"] == false)
    .map(|s| s["subdir"].as_str().unwrap())
    .collect();
  assert_eq!(failed, vec!["MAUI"]);
}

#[test]
fn unknown_target_touches_nothing() {
  let env = TestEnv::with_default_subdirs();

  env.work_cmd().args(["pipe", "bogus"]).assert().failure();

  for subdir in DEFAULT_SUBDIRS {
    assert!(env.actions(subdir).is_empty(), "subdir {}", subdir);
  }
}
