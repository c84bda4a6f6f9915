//! Integration tests that run real per-subdirectory build scripts.

mod common;
mod run_tests;
