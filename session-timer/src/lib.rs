//! Session countdown display.
//!
//! Once per tick the timer reads the session deadline, computes the time
//! remaining, and writes it as `MM:SS` into a single text element. Every
//! collaborator is injected:
//!
//! - **[`core`]**: Pure, deterministic logic (countdown arithmetic, formatting,
//!   deadline timestamps). No I/O, fully testable in isolation.
//! - **[`io`]**: Capabilities handed to the timer (clock, deadline provider,
//!   output target) and the TOML config file.
//!
//! [`updater`] performs one tick; [`schedule`] repeats it on a tokio interval
//! with an explicit start/stop lifecycle.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod schedule;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod updater;

pub use crate::core::countdown::{Countdown, ExpiredDisplay, format_remaining};
pub use crate::core::deadline::Deadline;
pub use crate::error::{ScheduleError, TargetError, TickError};
pub use crate::schedule::{ScheduleEnd, SessionTimer};
pub use crate::updater::{TickOutcome, TimerDisplayUpdater};
