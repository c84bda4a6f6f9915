//! Types for subdirectory dispatch.
//!
//! This module defines the collaborator trait the dispatcher calls into, the
//! error types a subdirectory action can produce, and the aggregated outcome
//! of dispatching one action across a subdirectory list.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::action::Action;

/// A build description provider for subdirectories.
///
/// The dispatcher knows nothing about how a subdirectory is built; it only
/// asks the runner to perform an [`Action`] against a subdirectory identifier
/// and observes success or failure.
///
/// Implementations must not rely on state shared between calls: every
/// subdirectory action is logically isolated, and calls may run concurrently
/// when the dispatcher is configured with more than one job.
pub trait SubdirRunner: Send + Sync + 'static {
  /// Perform `action` in `subdir`.
  fn run(&self, subdir: &str, action: Action) -> impl Future<Output = Result<(), RunError>> + Send;
}

/// Errors a single subdirectory action can produce.
#[derive(Debug, Error)]
pub enum RunError {
  /// The subdirectory does not exist under the build root.
  #[error("subdirectory not found: {}", .0.display())]
  MissingDirectory(PathBuf),

  /// The build description exited unsuccessfully. `stderr` holds the tail
  /// of its captured error output, empty when output was not captured.
  #[error("command failed with exit code {code:?}: {cmd}{}", stderr_suffix(.stderr))]
  CommandFailed {
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },

  /// The build description could not be started.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The task running the action ended without producing a result.
  #[error("action aborted: {0}")]
  Aborted(String),
}

fn stderr_suffix(stderr: &str) -> String {
  if stderr.is_empty() {
    String::new()
  } else {
    format!("\n{}", stderr)
  }
}

/// A failed action in a specific subdirectory.
#[derive(Debug, Error)]
#[error("{subdir}: {action} failed: {cause}")]
pub struct SubdirActionError {
  pub subdir: String,
  pub action: Action,
  #[source]
  pub cause: RunError,
}

/// Every subdirectory that failed while dispatching one action.
#[derive(Debug, Error)]
#[error("{action} failed in {}: {}", plural_subdirs(.failures.len()), list_failures(.failures))]
pub struct DispatchError {
  pub action: Action,
  pub failures: Vec<SubdirActionError>,
}

impl DispatchError {
  /// Identifiers of the failing subdirectories, in list order.
  pub fn failed_subdirs(&self) -> Vec<&str> {
    self.failures.iter().map(|f| f.subdir.as_str()).collect()
  }
}

fn plural_subdirs(count: usize) -> String {
  if count == 1 {
    "1 subdirectory".to_string()
  } else {
    format!("{} subdirectories", count)
  }
}

fn list_failures(failures: &[SubdirActionError]) -> String {
  failures
    .iter()
    .map(|f| format!("{} ({})", f.subdir, f.cause))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Completion state of one subdirectory action.
#[derive(Debug)]
pub enum SubdirStatus {
  Succeeded,
  Failed(RunError),
}

/// The result of running an action in one subdirectory.
#[derive(Debug)]
pub struct SubdirOutcome {
  pub subdir: String,
  pub status: SubdirStatus,
}

impl SubdirOutcome {
  pub fn is_success(&self) -> bool {
    matches!(self.status, SubdirStatus::Succeeded)
  }
}

/// Aggregated result of dispatching one action across a subdirectory list.
///
/// Outcomes are kept in list order regardless of the order in which the
/// actions completed.
#[derive(Debug)]
pub struct DispatchOutcome {
  pub action: Action,
  pub outcomes: Vec<SubdirOutcome>,
}

impl DispatchOutcome {
  /// Returns true if every subdirectory action succeeded.
  pub fn is_success(&self) -> bool {
    self.outcomes.iter().all(SubdirOutcome::is_success)
  }

  /// Number of subdirectories the action was attempted in.
  pub fn attempted(&self) -> usize {
    self.outcomes.len()
  }

  /// Identifiers of the subdirectories whose action failed, in list order.
  pub fn failed_subdirs(&self) -> Vec<&str> {
    self
      .outcomes
      .iter()
      .filter(|o| !o.is_success())
      .map(|o| o.subdir.as_str())
      .collect()
  }

  /// Reduce to a single result carrying every failure.
  pub fn into_result(self) -> Result<(), DispatchError> {
    let action = self.action;
    let failures: Vec<SubdirActionError> = self
      .outcomes
      .into_iter()
      .filter_map(|o| match o.status {
        SubdirStatus::Succeeded => None,
        SubdirStatus::Failed(cause) => Some(SubdirActionError {
          subdir: o.subdir,
          action,
          cause,
        }),
      })
      .collect();

    if failures.is_empty() {
      Ok(())
    } else {
      Err(DispatchError { action, failures })
    }
  }

  /// A serializable view of the outcome for machine-readable output.
  pub fn summary(&self) -> DispatchSummary {
    DispatchSummary {
      action: self.action,
      success: self.is_success(),
      subdirs: self
        .outcomes
        .iter()
        .map(|o| SubdirSummary {
          subdir: o.subdir.clone(),
          success: o.is_success(),
          error: match &o.status {
            SubdirStatus::Succeeded => None,
            SubdirStatus::Failed(e) => Some(e.to_string()),
          },
        })
        .collect(),
    }
  }
}

impl fmt::Display for SubdirStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SubdirStatus::Succeeded => f.write_str("ok"),
      SubdirStatus::Failed(e) => write!(f, "failed: {}", e),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
  pub action: Action,
  pub success: bool,
  pub subdirs: Vec<SubdirSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubdirSummary {
  pub subdir: String,
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

/// Configuration for subdirectory dispatch.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
  /// Maximum number of subdirectory actions running at once. 1 runs them
  /// sequentially in list order.
  pub jobs: usize,
}

impl Default for DispatchConfig {
  fn default() -> Self {
    Self { jobs: 1 }
  }
}
