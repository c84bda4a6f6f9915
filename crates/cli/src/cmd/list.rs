//! Lists registered targets and the subdirectories they dispatch to.

use anyhow::Result;
use serde_json::json;

use workfile_lib::WorkConfig;
use workfile_lib::workfile::standard_registry;

use crate::output::{OutputFormat, print_info, print_json, print_stat, symbols};

pub fn cmd_list(config: &WorkConfig, output: OutputFormat) -> Result<()> {
  let registry = standard_registry()?;
  let subdirs = config.subdirs();
  let default = registry.default_target();

  if output.is_json() {
    let targets: Vec<_> = registry
      .targets()
      .iter()
      .map(|t| json!({ "name": t.name, "body": t.body, "default": Some(t.name.as_str()) == default }))
      .collect();
    print_json(&json!({ "targets": targets, "subdirs": subdirs }))?;
    return Ok(());
  }

  print_info("Targets:");
  for target in registry.targets() {
    let marker = if Some(target.name.as_str()) == default { " (default)" } else { "" };
    println!("  {} {} {}{}", symbols::INFO, target.name, target.body, marker);
  }

  println!();
  print_info("Subdirectories:");
  for subdir in &subdirs {
    println!("  {} {}", symbols::INFO, subdir);
  }

  println!();
  print_stat("Root", &config.root.display().to_string());
  print_stat("Standard library", if config.use_newlib { "newlib" } else { "MAStd + MAFS" });

  Ok(())
}
