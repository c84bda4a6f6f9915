//! Shared utilities.
//!
//! Common utilities used across the crate, currently test helpers only.

pub mod testutil;
