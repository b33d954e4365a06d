//! Test-only doubles for the timer's injected capabilities.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Result, anyhow};

use crate::core::deadline::Deadline;
use crate::error::TargetError;
use crate::io::provider::DeadlineProvider;
use crate::io::target::{DEFAULT_TARGET_ID, TextTarget};

/// Target that records every text written to it.
///
/// Clones share the history.
#[derive(Debug, Clone, Default)]
pub struct RecordingTarget {
    history: Arc<Mutex<Vec<String>>>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every text written so far, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<String> {
        self.history().pop()
    }
}

impl TextTarget for RecordingTarget {
    fn id(&self) -> &str {
        DEFAULT_TARGET_ID
    }

    fn set_text(&mut self, text: &str) -> Result<(), TargetError> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        Ok(())
    }
}

/// Provider that fails its first `failures` calls, then returns `deadline`.
#[derive(Debug, Clone)]
pub struct FlakyProvider {
    deadline: Deadline,
    failures: usize,
    calls: Arc<AtomicUsize>,
}

impl FlakyProvider {
    pub fn new(deadline: Deadline, failures: usize) -> Self {
        Self {
            deadline,
            failures,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DeadlineProvider for FlakyProvider {
    fn deadline(&self) -> Result<Deadline> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(anyhow!("deadline not published yet (call {})", call + 1));
        }
        Ok(self.deadline)
    }
}
