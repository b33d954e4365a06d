//! One tick of the countdown display.
//!
//! [`TimerDisplayUpdater::tick`] reads the deadline, computes the remaining
//! time against the injected clock, formats it, and writes it to the target.
//! Failures are reported once per streak: the first failure of a kind logs at
//! `warn`, repeats log at `debug`, and the next successful render logs the
//! recovery.

use tracing::{debug, info, warn};

use crate::core::countdown::{Countdown, ExpiredDisplay};
use crate::error::TickError;
use crate::io::clock::Clock;
use crate::io::config::{TimerConfig, UnavailableDisplay};
use crate::io::provider::DeadlineProvider;
use crate::io::target::TextTarget;

/// Result of a successful tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Deadline still ahead.
    Counting(Countdown),
    /// Deadline reached or passed.
    Expired(Countdown),
}

impl TickOutcome {
    pub fn countdown(&self) -> Countdown {
        match self {
            Self::Counting(countdown) | Self::Expired(countdown) => *countdown,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired(_))
    }
}

/// Renders the remaining session time into one target.
pub struct TimerDisplayUpdater<P, T, C> {
    provider: P,
    target: T,
    clock: C,
    expired: ExpiredDisplay,
    /// `None` leaves the target untouched while the deadline is unavailable.
    placeholder: Option<String>,
    last_text: Option<String>,
    ticks: u64,
    failing: Option<&'static str>,
}

impl<P, T, C> TimerDisplayUpdater<P, T, C>
where
    P: DeadlineProvider,
    T: TextTarget,
    C: Clock,
{
    /// Updater with default display policies (clamp at `00:00`, `--:--`
    /// while the deadline is unavailable).
    pub fn new(provider: P, target: T, clock: C) -> Self {
        Self::from_config(provider, target, clock, &TimerConfig::default())
    }

    pub fn from_config(provider: P, target: T, clock: C, cfg: &TimerConfig) -> Self {
        let placeholder = match cfg.on_unavailable {
            UnavailableDisplay::Placeholder => Some(cfg.placeholder.clone()),
            UnavailableDisplay::Skip => None,
        };
        Self {
            provider,
            target,
            clock,
            expired: cfg.expired,
            placeholder,
            last_text: None,
            ticks: 0,
            failing: None,
        }
    }

    pub fn with_expired_display(mut self, expired: ExpiredDisplay) -> Self {
        self.expired = expired;
        self
    }

    pub fn with_placeholder(mut self, placeholder: Option<&str>) -> Self {
        self.placeholder = placeholder.map(str::to_string);
        self
    }

    /// Render the countdown once.
    pub fn tick(&mut self) -> Result<TickOutcome, TickError> {
        self.ticks += 1;
        let result = self.render();
        self.report(&result);
        result
    }

    /// Last text successfully written to the target.
    pub fn last_text(&self) -> Option<&str> {
        self.last_text.as_deref()
    }

    /// Number of tick attempts, successful or not.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    fn render(&mut self) -> Result<TickOutcome, TickError> {
        let deadline = match self.provider.deadline() {
            Ok(deadline) => deadline,
            Err(err) => {
                if let Some(placeholder) = self.placeholder.clone() {
                    if let Err(write_err) = self.write(&placeholder) {
                        debug!(
                            target_id = self.target.id(),
                            error = %write_err,
                            "placeholder not written"
                        );
                    }
                }
                return Err(TickError::DeadlineUnavailable(err.into()));
            }
        };

        let countdown = Countdown::from_millis(deadline.remaining_from(self.clock.now_millis()));
        self.write(&countdown.render(self.expired))?;

        if countdown.is_expired() {
            Ok(TickOutcome::Expired(countdown))
        } else {
            Ok(TickOutcome::Counting(countdown))
        }
    }

    fn write(&mut self, text: &str) -> Result<(), TickError> {
        self.target.set_text(text)?;
        match &mut self.last_text {
            Some(last) => {
                last.clear();
                last.push_str(text);
            }
            None => self.last_text = Some(text.to_string()),
        }
        Ok(())
    }

    fn report(&mut self, result: &Result<TickOutcome, TickError>) {
        let target_id = self.target.id();
        match result {
            Ok(outcome) => {
                if let Some(kind) = self.failing.take() {
                    info!(
                        target_id,
                        recovered_from = kind,
                        "countdown rendering recovered"
                    );
                }
                debug!(
                    target_id,
                    tick = self.ticks,
                    remaining_ms = outcome.countdown().remaining_ms,
                    text = self.last_text.as_deref().unwrap_or_default(),
                    "countdown rendered"
                );
            }
            Err(err) => {
                let kind = err.kind();
                if self.failing == Some(kind) {
                    debug!(target_id, tick = self.ticks, error = %err, "tick failed again");
                } else {
                    warn!(target_id, tick = self.ticks, error = %err, "tick failed");
                    self.failing = Some(kind);
                }
            }
        }
    }
}
