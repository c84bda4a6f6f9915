//! Run configuration.
//!
//! A [`WorkConfig`] is assembled in layers: defaults, then the process
//! environment, then command-line flags, then `KEY=VALUE` settings given
//! alongside the target names. The subdirectory list is derived from the
//! finished value, never from ambient state.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::consts::{ENV_INCLUDE_MINUI, ENV_JOBS, ENV_RUNNER, ENV_USE_NEWLIB};
use crate::dispatch::DispatchConfig;
use crate::runner::{DEFAULT_ARGS, DEFAULT_PROGRAM};
use crate::subdirs::{SubdirOptions, subdir_list};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("invalid setting name: {0:?}")]
  InvalidSettingName(String),

  #[error("invalid value for {key}: {value:?}")]
  InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkConfig {
  /// Directory containing the component subdirectories.
  pub root: PathBuf,

  /// Build against `newlib` instead of `MAStd` + `MAFS`.
  pub use_newlib: bool,

  /// Append the optional `MinUI` component.
  pub include_minui: bool,

  /// Maximum concurrent subdirectory actions.
  pub jobs: usize,

  /// Override for the build description command, split on whitespace.
  pub runner: Option<String>,

  /// Log what would run without running it.
  pub dry_run: bool,

  /// Unrecognised `KEY=VALUE` settings, passed to every build description
  /// as environment variables.
  pub env: BTreeMap<String, String>,
}

impl Default for WorkConfig {
  fn default() -> Self {
    Self {
      root: PathBuf::from("."),
      use_newlib: false,
      include_minui: false,
      jobs: 1,
      runner: None,
      dry_run: false,
      env: BTreeMap::new(),
    }
  }
}

impl WorkConfig {
  /// Defaults overridden by any recognised environment variables.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut config = Self::default();

    for key in [ENV_USE_NEWLIB, ENV_INCLUDE_MINUI, ENV_JOBS, ENV_RUNNER] {
      if let Ok(value) = std::env::var(key) {
        config.apply_setting(key, &value)?;
      }
    }

    Ok(config)
  }

  /// Apply one `KEY=VALUE` setting. Keys this tool does not recognise are
  /// kept in [`WorkConfig::env`] for the build descriptions.
  pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
    debug!(key = %key, value = %value, "applying setting");

    match key {
      ENV_USE_NEWLIB => self.use_newlib = parse_bool(key, value)?,
      ENV_INCLUDE_MINUI => self.include_minui = parse_bool(key, value)?,
      ENV_JOBS => self.jobs = parse_jobs(key, value)?,
      ENV_RUNNER => {
        let trimmed = value.trim();
        self.runner = if trimmed.is_empty() { None } else { Some(trimmed.to_string()) };
      }
      other if is_env_name(other) => {
        self.env.insert(other.to_string(), value.to_string());
      }
      other => return Err(ConfigError::InvalidSettingName(other.to_string())),
    }

    Ok(())
  }

  pub fn subdir_options(&self) -> SubdirOptions {
    SubdirOptions {
      use_newlib: self.use_newlib,
      include_minui: self.include_minui,
    }
  }

  /// The subdirectory list this configuration selects.
  pub fn subdirs(&self) -> Vec<String> {
    subdir_list(&self.subdir_options())
  }

  pub fn dispatch_config(&self) -> DispatchConfig {
    DispatchConfig { jobs: self.jobs }
  }

  /// Program and leading arguments for the build description command.
  ///
  /// The override is split on whitespace with no quoting, so a program path
  /// containing spaces cannot be expressed.
  pub fn runner_command(&self) -> (String, Vec<String>) {
    match &self.runner {
      Some(cmd) => {
        let mut parts = cmd.split_whitespace().map(str::to_string);
        // `apply_setting` and the CLI never store an all-whitespace runner.
        let program = parts.next().unwrap_or_else(|| DEFAULT_PROGRAM.to_string());
        (program, parts.collect())
      }
      None => (
        DEFAULT_PROGRAM.to_string(),
        DEFAULT_ARGS.iter().map(|s| s.to_string()).collect(),
      ),
    }
  }

  /// The root as an absolute path, when it exists.
  pub fn resolved_root(&self) -> PathBuf {
    dunce::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone())
  }
}

/// Split a `KEY=VALUE` argument. Returns `None` for plain target names.
pub fn split_setting(arg: &str) -> Option<(&str, &str)> {
  let (key, value) = arg.split_once('=')?;
  if key.is_empty() { None } else { Some((key, value)) }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, the names a shell can export.
fn is_env_name(key: &str) -> bool {
  let mut chars = key.chars();
  matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Ok(true),
    "" | "0" | "false" | "no" | "off" => Ok(false),
    _ => Err(ConfigError::InvalidValue {
      key: key.to_string(),
      value: value.to_string(),
    }),
  }
}

fn parse_jobs(key: &str, value: &str) -> Result<usize, ConfigError> {
  match value.trim().parse::<usize>() {
    Ok(jobs) if jobs > 0 => Ok(jobs),
    _ => Err(ConfigError::InvalidValue {
      key: key.to_string(),
      value: value.to_string(),
    }),
  }
}
