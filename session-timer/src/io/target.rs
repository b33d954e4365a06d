//! Output targets for the rendered countdown.
//!
//! A [`TextTarget`] is a handle to exactly one text element. The timer never
//! looks elements up globally; the host hands it a target at construction.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::TargetError;

/// Default id of the countdown element.
pub const DEFAULT_TARGET_ID: &str = "session-timer-value";

/// A text element whose contents the timer replaces on every tick.
pub trait TextTarget: Send {
    /// Identifier of the element, used in logs and errors.
    fn id(&self) -> &str;

    /// Replace the displayed text.
    fn set_text(&mut self, text: &str) -> Result<(), TargetError>;
}

/// An in-memory page of named text elements.
///
/// Clones share the same elements, so the host can add, remove, and read
/// elements while an [`ElementTarget`] writes to them.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Arc<Mutex<BTreeMap<String, String>>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document containing one empty element.
    pub fn with_element(id: &str) -> Self {
        let doc = Self::new();
        doc.insert_element(id);
        doc
    }

    /// Add an empty element; existing text is kept if it is already present.
    pub fn insert_element(&self, id: &str) {
        self.lock().entry(id.to_string()).or_default();
    }

    /// Remove an element, returning its last text.
    pub fn remove_element(&self, id: &str) -> Option<String> {
        self.lock().remove(id)
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.lock().get(id).cloned()
    }

    pub fn set_text(&self, id: &str, text: &str) -> Result<(), TargetError> {
        let mut elements = self.lock();
        let slot = elements
            .get_mut(id)
            .ok_or_else(|| TargetError::Missing { id: id.to_string() })?;
        slot.clear();
        slot.push_str(text);
        Ok(())
    }

    /// Handle to the element `id`. The element need not exist yet.
    pub fn target(&self, id: &str) -> ElementTarget {
        ElementTarget {
            document: self.clone(),
            id: id.to_string(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.elements.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reference to one element of a [`Document`].
#[derive(Debug, Clone)]
pub struct ElementTarget {
    document: Document,
    id: String,
}

impl TextTarget for ElementTarget {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_text(&mut self, text: &str) -> Result<(), TargetError> {
        self.document.set_text(&self.id, text)
    }
}

/// Rewrites a single terminal line in place.
pub struct TerminalTarget<W> {
    out: W,
    id: String,
    label: String,
    last_width: usize,
}

impl<W: Write + Send> TerminalTarget<W> {
    pub fn new(out: W, id: &str, label: &str) -> Self {
        Self {
            out,
            id: id.to_string(),
            label: label.to_string(),
            last_width: 0,
        }
    }

    /// End the countdown line so later output starts on a fresh line.
    pub fn finish(&mut self) -> std::io::Result<()> {
        if self.last_width > 0 {
            writeln!(self.out)?;
            self.last_width = 0;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, text: &str) -> std::io::Result<()> {
        let line = format!("{}{}", self.label, text);
        let width = line.chars().count();
        let pad = self.last_width.saturating_sub(width);
        write!(self.out, "\r{line}{:pad$}", "")?;
        self.out.flush()?;
        self.last_width = width;
        Ok(())
    }
}

impl<W: Write + Send> TextTarget for TerminalTarget<W> {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_text(&mut self, text: &str) -> Result<(), TargetError> {
        self.write_line(text).map_err(|source| TargetError::Write {
            id: self.id.clone(),
            source,
        })
    }
}
