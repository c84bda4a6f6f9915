//! The SDK library workfile.
//!
//! Declares the standard targets and wires configuration, the subdirectory
//! list, the target registry and a runner into a single [`run`] call:
//!
//! | target    | body            |
//! |-----------|-----------------|
//! | `pipe`    | dispatch `pipe` |
//! | `native`  | dispatch `native` |
//! | `default` | alias of `pipe` (the default target) |
//! | `clean`   | dispatch `clean` |

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::action::Action;
use crate::config::{ConfigError, WorkConfig, split_setting};
use crate::consts::ENV_USE_NEWLIB;
use crate::dispatch::{DispatchError, DispatchSummary, Dispatcher, SubdirRunner};
use crate::runner::{CommandRunner, DryRunRunner};
use crate::target::{Registry, TargetBody, TargetError, TargetRun};

/// Name of the target run when none is requested.
pub const DEFAULT_TARGET: &str = "default";

#[derive(Debug, Error)]
pub enum WorkError {
  #[error(transparent)]
  Target(#[from] TargetError),

  #[error(transparent)]
  Config(#[from] ConfigError),
}

/// Registry holding the standard targets with `default` selected.
pub fn standard_registry() -> Result<Registry, TargetError> {
  let mut registry = Registry::new();
  registry.register("pipe", TargetBody::Dispatch(Action::Pipe))?;
  registry.register("native", TargetBody::Dispatch(Action::Native))?;
  registry.register(DEFAULT_TARGET, TargetBody::alias("pipe"))?;
  registry.register("clean", TargetBody::Dispatch(Action::Clean))?;
  registry.set_default(DEFAULT_TARGET)?;
  Ok(registry)
}

/// Separate target names from `KEY=VALUE` settings and apply the settings
/// to `config`. Returns the target names in the order given.
pub fn parse_args(args: &[String], config: &mut WorkConfig) -> Result<Vec<String>, ConfigError> {
  let mut targets = Vec::new();

  for arg in args {
    match split_setting(arg) {
      Some((key, value)) => config.apply_setting(key, value)?,
      None => targets.push(arg.clone()),
    }
  }

  Ok(targets)
}

/// Everything one invocation did.
#[derive(Debug)]
pub struct RunReport {
  /// The subdirectory list the targets were dispatched over.
  pub subdirs: Vec<String>,
  /// One entry per target, in the order they ran.
  pub runs: Vec<TargetRun>,
}

impl RunReport {
  /// True only if every subdirectory action of every target succeeded.
  pub fn is_success(&self) -> bool {
    self.runs.iter().all(TargetRun::is_success)
  }

  /// Reduce to one error per failing target.
  pub fn into_failures(self) -> Vec<(String, DispatchError)> {
    self
      .runs
      .into_iter()
      .filter_map(|run| {
        let target = run.target;
        run.outcome.into_result().err().map(|e| (target, e))
      })
      .collect()
  }

  pub fn summary(&self) -> RunSummary {
    RunSummary {
      success: self.is_success(),
      subdirs: self.subdirs.clone(),
      targets: self
        .runs
        .iter()
        .map(|run| TargetSummary {
          target: run.target.clone(),
          result: run.outcome.summary(),
        })
        .collect(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
  pub success: bool,
  pub subdirs: Vec<String>,
  pub targets: Vec<TargetSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetSummary {
  pub target: String,
  pub result: DispatchSummary,
}

/// Run the requested targets (or the default) with the standard registry.
///
/// Registry errors abort before any subdirectory is touched. Subdirectory
/// failures are collected into the report.
pub async fn run(targets: &[String], config: &WorkConfig) -> Result<RunReport, WorkError> {
  let registry = standard_registry()?;
  let subdirs = config.subdirs();

  let forwarded: Vec<&str> = config.env.keys().map(String::as_str).collect();
  info!(
    root = %config.root.display(),
    use_newlib = config.use_newlib,
    subdirs = ?subdirs,
    forwarded = ?forwarded,
    "configured subdirectories"
  );

  let runs = if config.dry_run {
    let dispatcher = Dispatcher::new(DryRunRunner::new(), config.dispatch_config());
    run_with(&registry, targets, &dispatcher, &subdirs).await?
  } else {
    let (program, args) = config.runner_command();
    let runner = config
      .env
      .iter()
      .fold(CommandRunner::new(config.resolved_root()), |runner, (key, value)| {
        runner.with_env(key.as_str(), value.as_str())
      })
      .with_command(program, args)
      .with_env(ENV_USE_NEWLIB, if config.use_newlib { "1" } else { "0" })
      .with_captured_output(config.jobs > 1);
    let dispatcher = Dispatcher::new(runner, config.dispatch_config());
    run_with(&registry, targets, &dispatcher, &subdirs).await?
  };

  Ok(RunReport { subdirs, runs })
}

/// Run the requested targets against any runner.
pub async fn run_with<R: SubdirRunner>(
  registry: &Registry,
  targets: &[String],
  dispatcher: &Dispatcher<R>,
  subdirs: &[String],
) -> Result<Vec<TargetRun>, TargetError> {
  registry.invoke_all(targets, dispatcher, subdirs).await
}
