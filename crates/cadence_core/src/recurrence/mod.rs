//! Recurrence rule collaborator contract.
//!
//! # Responsibility
//! - Define the two operations resolution needs from a recurrence rule.
//! - Ship one structured rule implementation (`CalendarRule`).
//!
//! # Invariants
//! - Occurrences have minute resolution; the minute containing the query
//!   instant counts as "at or after" it.
//! - `next_occurrence_at_or_after` returning `None` means "no occurrence";
//!   resolution treats it as a non-match, never as an error.
//!
//! Expression parsing is not part of this crate: any type implementing
//! [`RecurrenceRule`] can be used as an anchor.

mod calendar;

pub use calendar::CalendarRule;

use crate::time::Instant;
use std::fmt::Debug;

/// Predicate plus next-occurrence function over instants.
pub trait RecurrenceRule: Debug + Send + Sync {
    /// Canonical text of the rule; anchors compare rules by this value.
    fn expression(&self) -> String;

    /// Returns whether `instant` falls on an occurrence minute.
    fn is_due(&self, instant: Instant) -> bool;

    /// Smallest occurrence at or after `instant`, in `instant`'s offset.
    fn next_occurrence_at_or_after(&self, instant: Instant) -> Option<Instant>;
}
