//! workfile-lib: target resolution and subdirectory dispatch
//!
//! This crate provides the building blocks of the SDK library workfile:
//! - `Action`: the closed set of operations every subdirectory supports
//! - `Registry`: named targets, aliases and the default target
//! - `Dispatcher`: runs an action across a subdirectory list, fail-slow
//! - `WorkConfig`: configuration that selects the subdirectory list

pub mod action;
pub mod config;
pub mod consts;
pub mod dispatch;
pub mod runner;
pub mod subdirs;
pub mod target;
#[cfg(test)]
mod util;
pub mod workfile;

pub use action::Action;
pub use config::{ConfigError, WorkConfig};
pub use dispatch::{DispatchConfig, DispatchError, DispatchOutcome, Dispatcher, RunError, SubdirRunner};
pub use target::{Registry, TargetBody, TargetError};
pub use workfile::{RunReport, WorkError, run};
