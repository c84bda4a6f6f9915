//! Subdirectory dispatch.
//!
//! This module invokes one [`Action`] against every subdirectory in a list.
//! It handles:
//! - Fail-slow execution: every subdirectory is attempted, whatever failed before it
//! - Optional bounded parallelism across independent subdirectories
//! - Aggregating per-subdirectory results into a [`DispatchOutcome`] in list order

pub mod types;

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::action::Action;

pub use types::{
  DispatchConfig, DispatchError, DispatchOutcome, DispatchSummary, RunError, SubdirActionError, SubdirOutcome,
  SubdirRunner, SubdirStatus, SubdirSummary,
};

/// Dispatches actions across subdirectories through a [`SubdirRunner`].
///
/// The dispatcher holds no state between calls besides its runner and
/// configuration.
pub struct Dispatcher<R> {
  runner: Arc<R>,
  config: DispatchConfig,
}

impl<R: SubdirRunner> Dispatcher<R> {
  pub fn new(runner: R, config: DispatchConfig) -> Self {
    Self {
      runner: Arc::new(runner),
      config,
    }
  }

  pub fn runner(&self) -> &R {
    &self.runner
  }

  pub fn config(&self) -> &DispatchConfig {
    &self.config
  }

  /// Perform `action` in every subdirectory of `subdirs`.
  ///
  /// Each subdirectory is attempted exactly once. A failure is recorded and
  /// dispatch continues with the remaining subdirectories; the returned
  /// outcome lists every result in the order of `subdirs`.
  pub async fn invoke_subdirs(&self, subdirs: &[String], action: Action) -> DispatchOutcome {
    info!(action = %action, count = subdirs.len(), jobs = self.config.jobs, "dispatching to subdirectories");

    let outcomes = if self.config.jobs <= 1 || subdirs.len() <= 1 {
      self.invoke_sequential(subdirs, action).await
    } else {
      self.invoke_parallel(subdirs, action).await
    };

    let outcome = DispatchOutcome { action, outcomes };

    info!(
      action = %action,
      attempted = outcome.attempted(),
      failed = outcome.failed_subdirs().len(),
      "dispatch complete"
    );

    outcome
  }

  async fn invoke_sequential(&self, subdirs: &[String], action: Action) -> Vec<SubdirOutcome> {
    let mut outcomes = Vec::with_capacity(subdirs.len());

    for subdir in subdirs {
      let result = run_one(self.runner.as_ref(), subdir, action).await;
      outcomes.push(record(subdir.clone(), action, result));
    }

    outcomes
  }

  async fn invoke_parallel(&self, subdirs: &[String], action: Action) -> Vec<SubdirOutcome> {
    let semaphore = Arc::new(Semaphore::new(self.config.jobs));
    let mut join_set = JoinSet::new();

    for (index, subdir) in subdirs.iter().enumerate() {
      let runner = self.runner.clone();
      let semaphore = semaphore.clone();
      let subdir = subdir.clone();

      join_set.spawn(async move {
        let result = match semaphore.acquire_owned().await {
          Ok(_permit) => run_one(runner.as_ref(), &subdir, action).await,
          Err(_) => Err(RunError::Aborted("job limiter closed".to_string())),
        };
        (index, result)
      });
    }

    let mut results: Vec<Option<Result<(), RunError>>> = subdirs.iter().map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
      match joined {
        Ok((index, result)) => results[index] = Some(result),
        Err(e) => error!(action = %action, error = %e, "subdirectory task did not complete"),
      }
    }

    // Tasks finish in any order; the index puts them back in list order.
    subdirs
      .iter()
      .zip(results)
      .map(|(subdir, result)| {
        let result = result.unwrap_or_else(|| Err(RunError::Aborted("task ended without a result".to_string())));
        record(subdir.clone(), action, result)
      })
      .collect()
  }
}

async fn run_one<R: SubdirRunner>(runner: &R, subdir: &str, action: Action) -> Result<(), RunError> {
  debug!(subdir = %subdir, action = %action, "running subdirectory action");
  runner.run(subdir, action).await
}

fn record(subdir: String, action: Action, result: Result<(), RunError>) -> SubdirOutcome {
  let status = match result {
    Ok(()) => {
      info!(subdir = %subdir, action = %action, "subdirectory action succeeded");
      SubdirStatus::Succeeded
    }
    Err(e) => {
      error!(subdir = %subdir, action = %action, error = %e, "subdirectory action failed");
      SubdirStatus::Failed(e)
    }
  };

  SubdirOutcome { subdir, status }
}
