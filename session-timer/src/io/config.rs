//! Timer configuration stored in `session-timer.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::countdown::ExpiredDisplay;
use crate::io::target::DEFAULT_TARGET_ID;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "session-timer.toml";

/// What a tick shows when the deadline provider has no answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnavailableDisplay {
    /// Write [`TimerConfig::placeholder`].
    #[default]
    Placeholder,
    /// Leave the element untouched.
    Skip,
}

/// Timer configuration (TOML).
///
/// Missing fields default to the behaviour of the session page: one tick per
/// second into `session-timer-value`, ten-minute sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimerConfig {
    /// Tick cadence in milliseconds.
    pub period_ms: u64,

    /// Id of the element the countdown is written into.
    pub target_id: String,

    /// Text shown while the deadline is unavailable.
    pub placeholder: String,

    pub on_unavailable: UnavailableDisplay,

    pub expired: ExpiredDisplay,

    /// End the schedule after the first tick at or past the deadline.
    pub stop_when_expired: bool,

    /// Session lifetime used when no explicit deadline is given.
    pub session_minutes: u64,

    /// Prefix for terminal output.
    pub label: String,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            period_ms: 1_000,
            target_id: DEFAULT_TARGET_ID.to_string(),
            placeholder: "--:--".to_string(),
            on_unavailable: UnavailableDisplay::Placeholder,
            expired: ExpiredDisplay::Clamp,
            stop_when_expired: false,
            session_minutes: 10,
            label: "session expires in ".to_string(),
        }
    }
}

impl TimerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.period_ms == 0 {
            return Err(anyhow!("period_ms must be > 0"));
        }
        if self.target_id.trim().is_empty() {
            return Err(anyhow!("target_id must be non-empty"));
        }
        if self.session_minutes == 0 {
            return Err(anyhow!("session_minutes must be > 0"));
        }
        Ok(())
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    pub fn session_lifetime(&self) -> Duration {
        Duration::from_secs(self.session_minutes.saturating_mul(60))
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `TimerConfig::default()`.
pub fn load_config(path: &Path) -> Result<TimerConfig> {
    if !path.exists() {
        let cfg = TimerConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TimerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &TimerConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
