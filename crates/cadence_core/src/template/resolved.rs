//! Resolved template and boundary resolution.
//!
//! # Responsibility
//! - Decide whether an instant is a create or due boundary of a template.
//! - Project templates into [`TaskInstance`] values around an instant.
//!
//! # Invariants
//! - `create_anchor` is always present; at least one anchor is a recurrence.
//! - Every "is this the boundary" check compares at minute granularity.
//! - Resolution is pure: same template + same instant gives the same result.
//! - Resolution is total: arithmetic past chrono's date range resolves to
//!   `None`/`false` like any other non-match.
//!
//! # Direction of derivation
//! - Recurrence create anchor: create instants are rule occurrences, due is
//!   derived forward from create.
//! - Duration create anchor: due instants are rule occurrences, create is
//!   derived backward as `due + offset` (negative offset = before due).

use crate::model::anchor::TemporalAnchor;
use crate::model::instance::{DeletionSchedule, TaskInstance};
use crate::model::policy::DeletionBoundary;
use crate::model::priority::Priority;
use crate::template::builder::DeletionRules;
use crate::time::{equal_to_minute, shift, Instant};

/// Compiled, validated template produced by `TaskTemplate::finalize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    name: String,
    description: Option<String>,
    priority: Option<Priority>,
    create_anchor: TemporalAnchor,
    due_anchor: Option<TemporalAnchor>,
    deletion: DeletionRules,
}

impl ResolvedTemplate {
    pub(crate) fn new(
        name: String,
        description: Option<String>,
        priority: Option<Priority>,
        create_anchor: TemporalAnchor,
        due_anchor: Option<TemporalAnchor>,
        deletion: DeletionRules,
    ) -> Self {
        Self {
            name,
            description,
            priority,
            create_anchor,
            due_anchor,
            deletion,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn create_anchor(&self) -> &TemporalAnchor {
        &self.create_anchor
    }

    pub fn due_anchor(&self) -> Option<&TemporalAnchor> {
        self.due_anchor.as_ref()
    }

    pub fn deletion_rules(&self) -> &DeletionRules {
        &self.deletion
    }

    /// Returns the create instant when `instant` is a create boundary.
    ///
    /// The returned value is the rule-derived instant (whole minute), not the
    /// caller's instant.
    pub fn resolve_create_at(&self, instant: Instant) -> Option<Instant> {
        self.candidate_create_at(instant)
            .filter(|candidate| equal_to_minute(instant, *candidate))
    }

    /// Returns the next create instant at or after `instant`, ungated.
    ///
    /// Used for previews: the result need not coincide with `instant`.
    pub fn resolve_next_create_at(&self, instant: Instant) -> Option<Instant> {
        self.candidate_create_at(instant)
    }

    /// Derives the due instant for an instance created at `create_at`.
    pub fn resolve_due_at(&self, create_at: Instant) -> Option<Instant> {
        match self.due_anchor.as_ref()? {
            TemporalAnchor::Duration(offset) => shift(create_at, *offset),
            TemporalAnchor::Recurrence(rule) => rule.next_occurrence_at_or_after(create_at),
        }
    }

    pub fn should_be_created_at(&self, instant: Instant) -> bool {
        self.resolve_create_at(instant).is_some()
    }

    /// Returns whether `instant` is a due boundary of this template.
    ///
    /// For duration due anchors the create side is re-validated from the
    /// implied create instant.
    pub fn should_be_due_at(&self, instant: Instant) -> bool {
        match &self.due_anchor {
            None => false,
            Some(TemporalAnchor::Duration(offset)) => {
                let Some(create_at) = shift(instant, offset.invert()) else {
                    return false;
                };
                self.resolve_create_at(create_at)
                    .is_some_and(|resolved| equal_to_minute(resolved, create_at))
            }
            Some(TemporalAnchor::Recurrence(rule)) => rule
                .next_occurrence_at_or_after(instant)
                .is_some_and(|due| equal_to_minute(instant, due)),
        }
    }

    /// Strict projection: timestamps are set only when `instant` is a create
    /// boundary.
    pub fn current_instance(&self, instant: Instant) -> TaskInstance {
        self.instance_from(self.resolve_create_at(instant))
    }

    /// Preview projection: the next instance at or after `instant`.
    pub fn next_instance(&self, instant: Instant) -> TaskInstance {
        self.instance_from(self.resolve_next_create_at(instant))
    }

    fn candidate_create_at(&self, instant: Instant) -> Option<Instant> {
        match &self.create_anchor {
            TemporalAnchor::Recurrence(rule) => rule.next_occurrence_at_or_after(instant),
            TemporalAnchor::Duration(offset) => {
                let Some(TemporalAnchor::Recurrence(due_rule)) = &self.due_anchor else {
                    return None;
                };
                let due_at = due_rule.next_occurrence_at_or_after(instant)?;
                shift(due_at, *offset)
            }
        }
    }

    fn instance_from(&self, create_at: Option<Instant>) -> TaskInstance {
        let due_at = create_at.and_then(|create| self.resolve_due_at(create));
        TaskInstance {
            name: self.name.clone(),
            priority: self.priority,
            create_at,
            due_at,
            description: self.description.clone(),
            deletion: self.deletion_schedule(create_at, due_at),
        }
    }

    fn deletion_schedule(
        &self,
        create_at: Option<Instant>,
        due_at: Option<Instant>,
    ) -> DeletionSchedule {
        self.deletion.filter_map(|boundary, _, duration| {
            let anchor = match boundary {
                DeletionBoundary::Due => due_at,
                DeletionBoundary::Existing => create_at,
            };
            anchor.and_then(|instant| shift(instant, duration))
        })
    }
}
