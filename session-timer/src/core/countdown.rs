//! Remaining-time arithmetic and `MM:SS` formatting.

use std::fmt;

use serde::{Deserialize, Serialize};

const MILLIS_PER_SECOND: i64 = 1_000;
const SECONDS_PER_MINUTE: i64 = 60;

/// How a countdown renders once the deadline has passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiredDisplay {
    /// Hold at `00:00`.
    #[default]
    Clamp,
    /// Show overdue time as `-MM:SS`.
    Negative,
}

/// Whole minutes and seconds derived from a remaining duration.
///
/// Built with floor division, so `seconds` is always in `0..60` and a
/// negative duration yields negative `minutes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub remaining_ms: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    pub fn from_millis(remaining_ms: i64) -> Self {
        let total_seconds = remaining_ms.div_euclid(MILLIS_PER_SECOND);
        let minutes = total_seconds.div_euclid(SECONDS_PER_MINUTE);
        let seconds = total_seconds - SECONDS_PER_MINUTE * minutes;
        Self {
            remaining_ms,
            minutes,
            seconds,
        }
    }

    /// True once the deadline has been reached.
    pub fn is_expired(&self) -> bool {
        self.remaining_ms <= 0
    }

    /// Render with the given expiry policy.
    pub fn render(&self, expired: ExpiredDisplay) -> String {
        if self.remaining_ms >= 0 {
            return self.to_string();
        }
        match expired {
            ExpiredDisplay::Clamp => Self::from_millis(0).to_string(),
            ExpiredDisplay::Negative => {
                // Magnitude of the floored total, so -500 ms is already -00:01.
                let overdue = -(self.minutes * SECONDS_PER_MINUTE + self.seconds);
                format!(
                    "-{:02}:{:02}",
                    overdue / SECONDS_PER_MINUTE,
                    overdue % SECONDS_PER_MINUTE
                )
            }
        }
    }
}

impl fmt::Display for Countdown {
    /// Zero-pads each field to two digits; minutes past 99 keep all digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

/// Format a non-negative remaining duration as `MM:SS`.
///
/// Negative input is clamped to `00:00`; use [`Countdown::render`] with
/// [`ExpiredDisplay::Negative`] to show overdue time instead.
pub fn format_remaining(remaining_ms: i64) -> String {
    Countdown::from_millis(remaining_ms).render(ExpiredDisplay::Clamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero() {
        assert_eq!(format_remaining(0), "00:00");
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_remaining(65_000), "01:05");
        assert_eq!(format_remaining(599_000), "09:59");
    }

    #[test]
    fn minutes_stop_padding_at_ten() {
        assert_eq!(format_remaining(600_000), "10:00");
        assert_eq!(format_remaining(6_000_000), "100:00");
    }

    #[test]
    fn truncates_partial_seconds() {
        assert_eq!(format_remaining(1_999), "00:01");
        assert_eq!(format_remaining(999), "00:00");
        assert_eq!(format_remaining(60_999), "01:00");
    }

    #[test]
    fn formatting_is_pure() {
        let first = format_remaining(123_456);
        let second = format_remaining(123_456);
        assert_eq!(first, second);
        assert_eq!(first, "02:03");
    }

    #[test]
    fn every_non_negative_second_is_padded() {
        for secs in 0..(15 * 60) {
            let text = format_remaining(secs * 1_000);
            let (mm, ss) = text.split_once(':').expect("colon");
            assert_eq!(mm.len(), 2, "{text}");
            assert_eq!(ss.len(), 2, "{text}");
            let minutes: i64 = mm.parse().expect("minutes");
            let seconds: i64 = ss.parse().expect("seconds");
            assert_eq!(minutes * 60 + seconds, secs);
        }
    }

    #[test]
    fn negative_duration_floors_like_the_page_script() {
        let countdown = Countdown::from_millis(-1_500);
        assert_eq!(countdown.minutes, -1);
        assert_eq!(countdown.seconds, 58);
        assert!(countdown.is_expired());
    }

    #[test]
    fn expired_clamps_by_default() {
        assert_eq!(format_remaining(-1_500), "00:00");
        assert_eq!(
            Countdown::from_millis(-90_000).render(ExpiredDisplay::Clamp),
            "00:00"
        );
    }

    #[test]
    fn expired_can_show_overdue_time() {
        assert_eq!(
            Countdown::from_millis(-1_500).render(ExpiredDisplay::Negative),
            "-00:02"
        );
        assert_eq!(
            Countdown::from_millis(-65_000).render(ExpiredDisplay::Negative),
            "-01:05"
        );
    }

    #[test]
    fn overdue_time_counts_partial_seconds_as_elapsed() {
        for (remaining_ms, expected) in [
            (-1, "-00:01"),
            (-500, "-00:01"),
            (-999, "-00:01"),
            (-1_000, "-00:01"),
            (-1_001, "-00:02"),
            (-1_500, "-00:02"),
            (-60_000, "-01:00"),
            (-60_001, "-01:01"),
        ] {
            assert_eq!(
                Countdown::from_millis(remaining_ms).render(ExpiredDisplay::Negative),
                expected,
                "{remaining_ms} ms"
            );
        }
    }

    #[test]
    fn zero_counts_as_expired_but_renders_plainly() {
        let countdown = Countdown::from_millis(0);
        assert!(countdown.is_expired());
        assert_eq!(countdown.render(ExpiredDisplay::Negative), "00:00");
    }
}
