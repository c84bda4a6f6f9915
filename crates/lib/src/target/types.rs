use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::action::Action;

/// What a target does when it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum TargetBody {
  /// Dispatch an action across every configured subdirectory.
  Dispatch(Action),
  /// Run another target by name. The name may be registered later.
  Alias(String),
}

impl TargetBody {
  pub fn alias(name: impl Into<String>) -> Self {
    TargetBody::Alias(name.into())
  }
}

impl fmt::Display for TargetBody {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TargetBody::Dispatch(action) => write!(f, "dispatch {}", action),
      TargetBody::Alias(name) => write!(f, "=> {}", name),
    }
  }
}

/// Registry errors. All of them abort an invocation before anything runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
  /// The requested, default or aliased name has no registration.
  #[error("unknown target: {0}")]
  UnknownTarget(String),

  /// A name was registered twice.
  #[error("target already registered: {0}")]
  DuplicateTarget(String),

  /// Alias resolution revisited a name without reaching an action.
  #[error("cyclic target aliases: {}", .chain.join(" => "))]
  CyclicTarget { chain: Vec<String> },

  /// No target was requested and no default is set.
  #[error("no target requested and no default target set")]
  NoDefaultTarget,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn body_display() {
    assert_eq!(TargetBody::Dispatch(Action::Pipe).to_string(), "dispatch pipe");
    assert_eq!(TargetBody::alias("pipe").to_string(), "=> pipe");
  }

  #[test]
  fn cyclic_error_shows_chain() {
    let err = TargetError::CyclicTarget {
      chain: vec!["a".to_string(), "b".to_string(), "a".to_string()],
    };
    assert_eq!(err.to_string(), "cyclic target aliases: a => b => a");
  }

  #[test]
  fn body_serializes_tagged() {
    let json = serde_json::to_value(TargetBody::alias("pipe")).unwrap();
    assert_eq!(json, serde_json::json!({ "kind": "alias", "value": "pipe" }));
  }
}
