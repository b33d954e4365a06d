//! Capabilities injected into the timer: clock, deadline source, output
//! target, and on-disk configuration.

pub mod clock;
pub mod config;
pub mod provider;
pub mod target;
