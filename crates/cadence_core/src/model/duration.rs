//! Signed duration used by relative anchors and deletion rules.
//!
//! # Invariants
//! - Values are whole seconds; negative means "before", positive "after".
//! - `invert()` never mutates; it returns a negated copy.
//! - Constructors and `invert()` saturate at the `i64` range instead of
//!   overflowing; conversion to chrono is fallible.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Immutable signed number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration {
    seconds: i64,
}

impl Duration {
    pub const ZERO: Self = Self { seconds: 0 };

    pub const fn seconds(seconds: i64) -> Self {
        Self { seconds }
    }

    pub const fn minutes(minutes: i64) -> Self {
        Self::seconds(minutes.saturating_mul(60))
    }

    pub const fn hours(hours: i64) -> Self {
        Self::seconds(hours.saturating_mul(3_600))
    }

    pub const fn days(days: i64) -> Self {
        Self::seconds(days.saturating_mul(86_400))
    }

    /// Signed seconds carried by this duration.
    pub const fn as_seconds(self) -> i64 {
        self.seconds
    }

    /// Returns a copy with the sign flipped.
    ///
    /// Lets "N seconds before X" go through the same add-to-instant path as
    /// "N seconds after X".
    pub const fn invert(self) -> Self {
        Self {
            seconds: self.seconds.saturating_neg(),
        }
    }

    pub const fn is_negative(self) -> bool {
        self.seconds < 0
    }

    /// Converts to a chrono delta, or `None` past chrono's representable span.
    pub fn to_time_delta(self) -> Option<TimeDelta> {
        TimeDelta::try_seconds(self.seconds)
    }
}

impl Display for Duration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+}s", self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::Duration;

    #[test]
    fn invert_flips_sign_without_touching_original() {
        let before = Duration::minutes(-15);
        let after = before.invert();

        assert_eq!(before.as_seconds(), -900);
        assert_eq!(after.as_seconds(), 900);
        assert_eq!(after.invert(), before);
    }

    #[test]
    fn extreme_values_saturate_and_do_not_convert() {
        assert_eq!(Duration::seconds(i64::MIN).invert().as_seconds(), i64::MAX);
        assert_eq!(Duration::days(i64::MAX).as_seconds(), i64::MAX);
        assert_eq!(Duration::seconds(i64::MAX).to_time_delta(), None);
        assert_eq!(
            Duration::hours(2).to_time_delta(),
            Some(chrono::TimeDelta::hours(2))
        );
    }

    #[test]
    fn display_is_signed() {
        assert_eq!(Duration::hours(1).to_string(), "+3600s");
        assert_eq!(Duration::seconds(-30).to_string(), "-30s");
    }
}
