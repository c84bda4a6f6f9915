//! CLI output formatting utilities.
//!
//! Colored status lines for targets and subdirectories, duration formatting
//! and JSON output.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use workfile_lib::dispatch::{SubdirOutcome, SubdirStatus};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

/// "1 subdirectory", "6 subdirectories".
pub fn count_subdirs(count: usize) -> String {
  if count == 1 {
    "1 subdirectory".to_string()
  } else {
    format!("{} subdirectories", count)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// One line per subdirectory: a check mark, or a cross with the cause.
pub fn print_subdir_outcome(outcome: &SubdirOutcome) {
  match &outcome.status {
    SubdirStatus::Succeeded => println!(
      "  {} {}",
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
      outcome.subdir
    ),
    SubdirStatus::Failed(e) => println!(
      "  {} {} {} {}",
      symbols::ERROR.if_supports_color(Stream::Stdout, |s| s.red()),
      outcome.subdir,
      symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.dimmed()),
      e.if_supports_color(Stream::Stdout, |s| s.red())
    ),
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_duration() {
    assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
    assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
  }

  #[test]
  fn test_count_subdirs() {
    assert_eq!(count_subdirs(1), "1 subdirectory");
    assert_eq!(count_subdirs(6), "6 subdirectories");
  }

  #[test]
  fn test_output_format_default_is_text() {
    assert!(!OutputFormat::default().is_json());
    assert!(OutputFormat::Json.is_json());
  }
}
