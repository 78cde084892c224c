//! Process exit codes. Part of the CLI contract for scripts and CI.

pub const SUCCESS: i32 = 0;
pub const DENIED: i32 = 1; // Only with --fail-on-deny
pub const CONFIG_ERROR: i32 = 2;
