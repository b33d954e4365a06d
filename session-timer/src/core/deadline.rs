//! Session deadline timestamp.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// Absolute session expiry in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline(i64);

impl Deadline {
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Build from whole epoch seconds, as carried by a JWT `exp` claim.
    pub const fn from_unix_secs(secs: i64) -> Self {
        Self(secs.saturating_mul(1_000))
    }

    /// `now_millis + duration`, saturating on overflow.
    pub fn after(now_millis: i64, duration: Duration) -> Self {
        let offset = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        Self(now_millis.saturating_add(offset))
    }

    /// Parse an RFC 3339 timestamp (e.g. `2026-10-18T12:00:00Z`).
    pub fn parse_rfc3339(raw: &str) -> Result<Self> {
        let parsed = DateTime::parse_from_rfc3339(raw.trim())
            .with_context(|| format!("parse deadline {raw:?} as RFC 3339"))?;
        Ok(Self::from(parsed.with_timezone(&Utc)))
    }

    pub const fn unix_millis(self) -> i64 {
        self.0
    }

    /// Milliseconds left until the deadline; negative once it has passed.
    pub const fn remaining_from(self, now_millis: i64) -> i64 {
        self.0.saturating_sub(now_millis)
    }
}

impl From<DateTime<Utc>> for Deadline {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.timestamp_millis())
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(at) => write!(f, "{}", at.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}
