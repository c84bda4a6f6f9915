//! Subdirectory actions.
//!
//! An [`Action`] is the primitive operation the orchestrator asks each
//! subdirectory to perform. The set is closed: every build description must
//! understand all three.

mod types;

pub use types::*;
