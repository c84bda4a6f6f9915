//! Target registry.
//!
//! Targets are named, user-selectable build goals. Each one either dispatches
//! an [`Action`] across the subdirectory list or aliases another target.
//! Resolution follows alias chains to a concrete action and rejects cycles
//! and missing names before anything is executed.

mod types;

pub use types::*;

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::action::Action;
use crate::dispatch::{DispatchOutcome, Dispatcher, SubdirRunner};

/// A registered target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
  pub name: String,
  pub body: TargetBody,
}

/// The result of running one target.
#[derive(Debug)]
pub struct TargetRun {
  /// The name that was requested, or the default name.
  pub target: String,
  /// The action the alias chain resolved to.
  pub action: Action,
  pub outcome: DispatchOutcome,
}

impl TargetRun {
  pub fn is_success(&self) -> bool {
    self.outcome.is_success()
  }
}

/// Owns every target definition and the default selection.
#[derive(Debug, Default)]
pub struct Registry {
  targets: Vec<Target>,
  index: HashMap<String, usize>,
  default: Option<String>,
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a target. Alias bodies may name targets registered later.
  pub fn register(&mut self, name: impl Into<String>, body: TargetBody) -> Result<(), TargetError> {
    let name = name.into();
    if self.index.contains_key(&name) {
      return Err(TargetError::DuplicateTarget(name));
    }

    debug!(target_name = %name, body = %body, "registering target");
    self.index.insert(name.clone(), self.targets.len());
    self.targets.push(Target { name, body });
    Ok(())
  }

  /// Select the target that runs when none is requested.
  pub fn set_default(&mut self, name: impl Into<String>) -> Result<(), TargetError> {
    let name = name.into();
    if !self.index.contains_key(&name) {
      return Err(TargetError::UnknownTarget(name));
    }
    self.default = Some(name);
    Ok(())
  }

  pub fn default_target(&self) -> Option<&str> {
    self.default.as_deref()
  }

  pub fn get(&self, name: &str) -> Option<&Target> {
    self.index.get(name).map(|&i| &self.targets[i])
  }

  /// Registered targets, in registration order.
  pub fn targets(&self) -> &[Target] {
    &self.targets
  }

  /// Follow `name` through any aliases to the action it performs.
  pub fn resolve(&self, name: &str) -> Result<Action, TargetError> {
    let mut chain = vec![name.to_string()];
    let mut seen = HashSet::new();
    let mut current = name;

    loop {
      if !seen.insert(current) {
        return Err(TargetError::CyclicTarget { chain });
      }

      let target = self
        .get(current)
        .ok_or_else(|| TargetError::UnknownTarget(current.to_string()))?;

      match &target.body {
        TargetBody::Dispatch(action) => return Ok(*action),
        TargetBody::Alias(next) => {
          chain.push(next.clone());
          current = next.as_str();
        }
      }
    }
  }

  /// The name to run: `requested` if given, otherwise the default.
  pub fn effective_name<'a>(&'a self, requested: Option<&'a str>) -> Result<&'a str, TargetError> {
    requested.or(self.default.as_deref()).ok_or(TargetError::NoDefaultTarget)
  }

  /// Resolve a requested name (or the default) to `(name, action)`.
  pub fn resolve_requested<'a>(&'a self, requested: Option<&'a str>) -> Result<(&'a str, Action), TargetError> {
    let name = self.effective_name(requested)?;
    let action = self.resolve(name)?;
    Ok((name, action))
  }

  /// Run one target against `subdirs`.
  ///
  /// Registry errors are returned before any subdirectory action starts.
  /// Subdirectory failures are reported in the returned outcome.
  pub async fn invoke<R: SubdirRunner>(
    &self,
    requested: Option<&str>,
    dispatcher: &Dispatcher<R>,
    subdirs: &[String],
  ) -> Result<TargetRun, TargetError> {
    let (name, action) = self.resolve_requested(requested)?;
    Ok(run_target(name, action, dispatcher, subdirs).await)
  }

  /// Run several targets in order. An empty list runs the default.
  ///
  /// Every name is resolved before the first one runs, so a registry error
  /// leaves every subdirectory untouched. A failing target does not stop the
  /// ones after it.
  pub async fn invoke_all<R: SubdirRunner>(
    &self,
    requested: &[String],
    dispatcher: &Dispatcher<R>,
    subdirs: &[String],
  ) -> Result<Vec<TargetRun>, TargetError> {
    let plan: Vec<(&str, Action)> = if requested.is_empty() {
      vec![self.resolve_requested(None)?]
    } else {
      requested
        .iter()
        .map(|name| self.resolve_requested(Some(name.as_str())))
        .collect::<Result<_, _>>()?
    };

    let mut runs = Vec::with_capacity(plan.len());
    for (name, action) in plan {
      runs.push(run_target(name, action, dispatcher, subdirs).await);
    }
    Ok(runs)
  }
}

async fn run_target<R: SubdirRunner>(
  name: &str,
  action: Action,
  dispatcher: &Dispatcher<R>,
  subdirs: &[String],
) -> TargetRun {
  info!(target_name = %name, action = %action, "running target");
  let outcome = dispatcher.invoke_subdirs(subdirs, action).await;
  TargetRun {
    target: name.to_string(),
    action,
    outcome,
  }
}
