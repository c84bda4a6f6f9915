use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An action that every subdirectory build description must support.
///
/// Actions are passed by name to the per-subdirectory build description,
/// so the rendered names (`pipe`, `native`, `clean`) are part of the
/// contract with those descriptions.
///
/// # Variants
///
/// - [`Pipe`](Action::Pipe): build the pipeline variant of the component
/// - [`Native`](Action::Native): build the native variant of the component
/// - [`Clean`](Action::Clean): remove the component's build artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
  Pipe,
  Native,
  Clean,
}

impl Action {
  /// All actions, in declaration order.
  pub const ALL: [Action; 3] = [Action::Pipe, Action::Native, Action::Clean];

  /// The name passed to a subdirectory build description.
  pub fn as_str(self) -> &'static str {
    match self {
      Action::Pipe => "pipe",
      Action::Native => "native",
      Action::Clean => "clean",
    }
  }
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Returned when a string does not name a known [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action: {0}")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
  type Err = ParseActionError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pipe" => Ok(Action::Pipe),
      "native" => Ok(Action::Native),
      "clean" => Ok(Action::Clean),
      other => Err(ParseActionError(other.to_string())),
    }
  }
}
