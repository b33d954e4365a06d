//! Periodic schedule driving a [`TimerDisplayUpdater`].
//!
//! A [`SessionTimer`] owns the handle of its tick task. `start()` spawns the
//! task on the current tokio runtime, `stop()` (or dropping the timer) ends
//! it. Ticks never overlap: the task runs each tick to completion before
//! waiting for the next interval.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use crate::error::ScheduleError;
use crate::io::clock::Clock;
use crate::io::config::TimerConfig;
use crate::io::provider::DeadlineProvider;
use crate::io::target::TextTarget;
use crate::updater::TimerDisplayUpdater;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Why a tick task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleEnd {
    /// `stop()` was called or the timer was dropped.
    Stopped,
    /// A tick reached the deadline with `stop_when_expired` set.
    Expired,
    /// The configured tick limit was reached.
    TicksExhausted,
}

type SharedUpdater<P, T, C> = Arc<Mutex<TimerDisplayUpdater<P, T, C>>>;

struct Running {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<ScheduleEnd>,
}

/// Repeating countdown with an explicit start/stop lifecycle.
pub struct SessionTimer<P, T, C> {
    updater: SharedUpdater<P, T, C>,
    period: Duration,
    stop_when_expired: bool,
    max_ticks: Option<u64>,
    running: Option<Running>,
}

impl<P, T, C> SessionTimer<P, T, C> {
    /// Signal the tick task to end. Returns whether a task was running.
    ///
    /// The task exits at its next wake-up without rendering again.
    pub fn stop(&mut self) -> bool {
        let Some(running) = self.running.take() else {
            return false;
        };
        let was_running = !running.task.is_finished();
        // Errors only when the task already ended and dropped its receiver.
        let _ = running.shutdown.send(true);
        if was_running {
            info!("session timer stopped");
        }
        was_running
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.task.is_finished())
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl<P, T, C> SessionTimer<P, T, C>
where
    P: DeadlineProvider + 'static,
    T: TextTarget + 'static,
    C: Clock + 'static,
{
    pub fn new(updater: TimerDisplayUpdater<P, T, C>, period: Duration) -> Self {
        Self {
            updater: Arc::new(Mutex::new(updater)),
            period: period.max(MIN_PERIOD),
            stop_when_expired: false,
            max_ticks: None,
            running: None,
        }
    }

    pub fn from_config(updater: TimerDisplayUpdater<P, T, C>, cfg: &TimerConfig) -> Self {
        Self::new(updater, cfg.period()).stop_when_expired(cfg.stop_when_expired)
    }

    /// End the schedule after the first tick at or past the deadline.
    pub fn stop_when_expired(mut self, enabled: bool) -> Self {
        self.stop_when_expired = enabled;
        self
    }

    /// End the schedule after `max_ticks` ticks.
    pub fn max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Shared handle to the updater, for inspection between ticks.
    pub fn updater(&self) -> SharedUpdater<P, T, C> {
        Arc::clone(&self.updater)
    }

    /// Lock the updater. Never held across a tick boundary by the schedule.
    pub fn lock_updater(&self) -> MutexGuard<'_, TimerDisplayUpdater<P, T, C>> {
        self.updater.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn the tick task. The first tick fires immediately.
    #[instrument(skip_all, fields(period_ms = self.period.as_millis() as u64))]
    pub fn start(&mut self) -> Result<(), ScheduleError> {
        if self.is_running() {
            return Err(ScheduleError::AlreadyRunning);
        }
        let runtime = Handle::try_current().map_err(|_| ScheduleError::NoRuntime)?;

        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = runtime.spawn(run_ticks(
            Arc::clone(&self.updater),
            self.period,
            self.stop_when_expired,
            self.max_ticks,
            shutdown_rx,
        ));
        self.running = Some(Running { shutdown, task });
        info!(
            stop_when_expired = self.stop_when_expired,
            max_ticks = self.max_ticks,
            "session timer started"
        );
        Ok(())
    }

    /// Wait for the tick task to end on its own.
    ///
    /// Returns `None` if nothing was running. Cancelling this future leaves
    /// the schedule running; call [`stop`](Self::stop) to end it.
    pub async fn wait(&mut self) -> Option<ScheduleEnd> {
        let running = self.running.as_mut()?;
        let result = (&mut running.task).await;
        self.running = None;
        match result {
            Ok(end) => Some(end),
            Err(err) => {
                warn!(error = %err, "session timer task failed");
                None
            }
        }
    }
}

impl<P, T, C> Drop for SessionTimer<P, T, C> {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_ticks<P, T, C>(
    updater: SharedUpdater<P, T, C>,
    period: Duration,
    stop_when_expired: bool,
    max_ticks: Option<u64>,
    mut shutdown: watch::Receiver<bool>,
) -> ScheduleEnd
where
    P: DeadlineProvider,
    T: TextTarget,
    C: Clock,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ticks = 0u64;

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => return ScheduleEnd::Stopped,
            _ = interval.tick() => {}
        }

        let expired = {
            let mut updater = updater.lock().unwrap_or_else(PoisonError::into_inner);
            updater.tick().is_ok_and(|outcome| outcome.is_expired())
        };
        ticks += 1;

        if stop_when_expired && expired {
            info!(ticks, "session deadline reached");
            return ScheduleEnd::Expired;
        }
        if max_ticks.is_some_and(|max| ticks >= max) {
            debug!(ticks, "tick limit reached");
            return ScheduleEnd::TicksExhausted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deadline::Deadline;
    use crate::io::clock::MonotonicClock;
    use crate::io::provider::FixedDeadline;
    use crate::io::target::{DEFAULT_TARGET_ID, Document, ElementTarget};

    fn timer(
        deadline_ms: i64,
    ) -> (
        SessionTimer<FixedDeadline, ElementTarget, MonotonicClock>,
        Document,
    ) {
        let doc = Document::with_element(DEFAULT_TARGET_ID);
        let updater = TimerDisplayUpdater::new(
            FixedDeadline(Deadline::from_unix_millis(deadline_ms)),
            doc.target(DEFAULT_TARGET_ID),
            MonotonicClock::anchored_at(0),
        );
        (SessionTimer::new(updater, Duration::from_secs(1)), doc)
    }

    #[test]
    fn start_outside_runtime_fails() {
        let (mut timer, _doc) = timer(10_000);
        assert_eq!(timer.start(), Err(ScheduleError::NoRuntime));
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn start_twice_is_rejected() {
        let (mut timer, _doc) = timer(10_000);
        timer.start().expect("start");
        assert_eq!(timer.start(), Err(ScheduleError::AlreadyRunning));
        assert!(timer.stop());
        assert!(!timer.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_is_immediate() {
        let (mut timer, doc) = timer(90_000);
        timer.start().expect("start");
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(doc.text(DEFAULT_TARGET_ID).as_deref(), Some("01:30"));
        assert_eq!(timer.lock_updater().ticks(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn can_restart_after_stop() {
        let (mut timer, doc) = timer(90_000);
        timer.start().expect("start");
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        timer.stop();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(timer.lock_updater().ticks(), 2);

        timer.start().expect("restart");
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(timer.lock_updater().ticks(), 3);
        assert_eq!(doc.text(DEFAULT_TARGET_ID).as_deref(), Some("01:18"));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_without_start_returns_none() {
        let (mut timer, _doc) = timer(10_000);
        assert_eq!(timer.wait().await, None);
    }

    #[test]
    fn zero_period_is_raised_to_minimum() {
        let doc = Document::with_element(DEFAULT_TARGET_ID);
        let updater = TimerDisplayUpdater::new(
            FixedDeadline(Deadline::from_unix_millis(0)),
            doc.target(DEFAULT_TARGET_ID),
            MonotonicClock::anchored_at(0),
        );
        let timer = SessionTimer::new(updater, Duration::ZERO);
        assert_eq!(timer.period(), MIN_PERIOD);
    }
}
