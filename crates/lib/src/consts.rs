/// Selects the `newlib` standard library when truthy.
pub const ENV_USE_NEWLIB: &str = "USE_NEWLIB";

/// Appends the optional `MinUI` component when truthy.
pub const ENV_INCLUDE_MINUI: &str = "INCLUDE_MINUI";

/// Maximum number of subdirectory actions running at once.
pub const ENV_JOBS: &str = "WORK_JOBS";

/// Command that runs a subdirectory's build description.
pub const ENV_RUNNER: &str = "WORK_RUNNER";
