mod cmd;
mod output;

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use workfile_lib::WorkConfig;
use workfile_lib::workfile::parse_args;

use crate::output::OutputFormat;

/// work - build SDK component libraries across their subdirectories
#[derive(Parser)]
#[command(name = "work")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Targets to run in order (pipe, native, clean, default) and KEY=VALUE
  /// settings such as USE_NEWLIB=1. Runs the default target when empty.
  targets: Vec<String>,

  /// Directory containing the component subdirectories
  #[arg(short = 'C', long, default_value = ".")]
  root: PathBuf,

  /// Build against newlib instead of MAStd + MAFS
  #[arg(long)]
  newlib: bool,

  /// Include the optional MinUI component
  #[arg(long)]
  minui: bool,

  /// Number of subdirectories to build at once
  #[arg(short, long)]
  jobs: Option<NonZeroUsize>,

  /// Command that runs a subdirectory's build description (default: ruby workfile.rb).
  /// The command is split on whitespace, so the program path cannot contain spaces
  #[arg(long)]
  runner: Option<String>,

  /// Show what would run without running it
  #[arg(long)]
  dry_run: bool,

  /// List targets and subdirectories, then exit
  #[arg(long)]
  list: bool,

  /// Output format
  #[arg(short, long, value_enum, default_value_t)]
  output: OutputFormat,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let mut config = WorkConfig::from_env().context("Invalid configuration in environment")?;
  config.root = cli.root;
  config.use_newlib |= cli.newlib;
  config.include_minui |= cli.minui;
  config.dry_run = cli.dry_run;
  if let Some(jobs) = cli.jobs {
    config.jobs = jobs.get();
  }
  if let Some(runner) = cli.runner.filter(|r| !r.trim().is_empty()) {
    config.runner = Some(runner);
  }

  let targets = parse_args(&cli.targets, &mut config).context("Invalid setting")?;

  if cli.list {
    return cmd::cmd_list(&config, cli.output);
  }

  if !cmd::cmd_run(&targets, &config, cli.output)? {
    std::process::exit(1);
  }

  Ok(())
}
