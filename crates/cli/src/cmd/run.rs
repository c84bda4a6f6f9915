//! Implementation of running targets.
//!
//! Resolves the requested targets (or the default), dispatches each one across
//! the configured subdirectories and reports every failing subdirectory.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use workfile_lib::WorkConfig;

use crate::output::{
  OutputFormat, count_subdirs, format_duration, print_error, print_info, print_json, print_stat, print_subdir_outcome,
  print_success,
};

/// Execute the requested targets.
///
/// Returns `Ok(true)` when every subdirectory action of every target
/// succeeded, `Ok(false)` when at least one failed. Registry and
/// configuration errors are returned as errors before anything runs.
pub fn cmd_run(targets: &[String], config: &WorkConfig, output: OutputFormat) -> Result<bool> {
  let start = Instant::now();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt
    .block_on(workfile_lib::run(targets, config))
    .context("Failed to run targets")?;

  let success = report.is_success();

  if output.is_json() {
    print_json(&report.summary())?;
  } else {
    for run in &report.runs {
      println!();
      print_info(&format!(
        "Target {} ({}) in {}{}",
        run.target,
        run.action,
        count_subdirs(run.outcome.attempted()),
        if config.dry_run { " [dry run]" } else { "" }
      ));
      for outcome in &run.outcome.outcomes {
        print_subdir_outcome(outcome);
      }
    }

    println!();
    if success {
      print_success("All subdirectories succeeded");
    } else {
      for (target, err) in report.into_failures() {
        print_error(&format!("{}: {}", target, err));
      }
    }
    print_stat("Duration", &format_duration(start.elapsed()));
  }

  info!(success, elapsed_ms = start.elapsed().as_millis() as u64, "run finished");

  Ok(success)
}
