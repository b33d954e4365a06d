//! Deadline providers.
//!
//! The [`DeadlineProvider`] trait decouples the timer from whatever owns the
//! session (a page, an auth layer, a test). The updater calls it on every
//! tick, so a provider that changes its answer (see [`SessionDeadline::prolong`])
//! is picked up on the next tick.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::core::deadline::Deadline;
use crate::io::clock::Clock;

/// Supplies the session deadline.
pub trait DeadlineProvider: Send {
    /// Current deadline, or an error when none is available.
    fn deadline(&self) -> Result<Deadline>;
}

impl<F> DeadlineProvider for F
where
    F: Fn() -> Result<Deadline> + Send,
{
    fn deadline(&self) -> Result<Deadline> {
        self()
    }
}

/// A deadline that never changes.
#[derive(Debug, Clone, Copy)]
pub struct FixedDeadline(pub Deadline);

impl DeadlineProvider for FixedDeadline {
    fn deadline(&self) -> Result<Deadline> {
        Ok(self.0)
    }
}

/// Shared, updatable session deadline.
///
/// Clones share state: the host keeps one clone to set, clear, or prolong the
/// session while the timer reads another.
#[derive(Debug, Clone, Default)]
pub struct SessionDeadline {
    inner: Arc<RwLock<Option<Deadline>>>,
}

impl SessionDeadline {
    pub fn new(deadline: Deadline) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(deadline))),
        }
    }

    /// No session yet; ticks report the deadline as unavailable.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set(&self, deadline: Deadline) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(deadline);
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Move the deadline to `now + lifetime`, as a session refresh does.
    pub fn prolong(&self, clock: &dyn Clock, lifetime: Duration) -> Deadline {
        let deadline = Deadline::after(clock.now_millis(), lifetime);
        self.set(deadline);
        deadline
    }

    pub fn get(&self) -> Option<Deadline> {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeadlineProvider for SessionDeadline {
    fn deadline(&self) -> Result<Deadline> {
        self.get().ok_or_else(|| anyhow!("no session deadline set"))
    }
}
