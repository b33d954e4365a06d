//! Stable exit codes for `session-timer` CLI commands.

/// Command succeeded, or the countdown was interrupted before the deadline.
pub const OK: i32 = 0;
/// Invalid arguments, config, or deadline.
pub const INVALID: i32 = 1;
/// `session-timer watch` ran until the session expired.
pub const EXPIRED: i32 = 2;
