//! Calendar arithmetic helpers shared by resolution code.
//!
//! # Responsibility
//! - Add signed durations to instants without losing offset identity.
//! - Compare instants at minute granularity.
//!
//! # Invariants
//! - Every helper is total: out-of-range arithmetic yields `None`, never a
//!   panic.
//! - Truncation happens on the UTC timeline, so offsets with a seconds part
//!   do not split one absolute minute in two.

use crate::model::duration::Duration;
use chrono::{DateTime, FixedOffset, TimeDelta, Timelike, Utc};

/// Instant type used across the crate.
pub type Instant = DateTime<FixedOffset>;

/// Returns `instant + duration`, keeping the offset of `instant`.
///
/// `None` when the result leaves chrono's supported date range.
pub fn shift(instant: Instant, duration: Duration) -> Option<Instant> {
    instant.checked_add_signed(duration.to_time_delta()?)
}

/// Drops the seconds and sub-second part of the UTC minute containing
/// `instant`; the result keeps the offset of `instant`.
pub fn truncate_to_minute(instant: Instant) -> Instant {
    let utc = instant.with_timezone(&Utc);
    let truncated = utc
        - TimeDelta::seconds(i64::from(utc.second()))
        - TimeDelta::nanoseconds(i64::from(utc.nanosecond()));
    truncated.with_timezone(instant.offset())
}

/// Returns whether `a` and `b` denote the same minute.
///
/// Occurrences resolve to whole minutes while callers may pass instants with
/// non-zero seconds, so every boundary check goes through this comparison.
pub fn equal_to_minute(a: Instant, b: Instant) -> bool {
    truncate_to_minute(a) == truncate_to_minute(b)
}
