//! Copy-on-write task template builder.
//!
//! # Responsibility
//! - Accumulate template metadata, create/due anchors and deletion rules.
//! - Validate the accumulated shape in `finalize()`.
//!
//! # Invariants
//! - Every builder call returns a new value; the receiver is never mutated,
//!   so one base template can seed several variants.
//! - Later calls for the same field or deletion slot overwrite earlier ones.
//! - `finalize()` requires a name, at least one anchor, and at least one
//!   recurrence anchor.

use crate::model::anchor::TemporalAnchor;
use crate::model::duration::Duration;
use crate::model::policy::{CompletionPolicy, DeletionBoundary, DeletionSlots};
use crate::model::priority::Priority;
use crate::recurrence::RecurrenceRule;
use crate::template::resolved::ResolvedTemplate;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TemplateResult<T> = Result<T, TemplateError>;

/// Deletion durations keyed by (boundary, completion state).
pub type DeletionRules = DeletionSlots<Duration>;

/// Validation errors returned by [`TaskTemplate::finalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateError {
    /// Name was never set or is blank.
    MissingName,
    /// Neither create nor due anchor was supplied.
    MissingBoundary,
    /// No anchor is a recurrence rule, so no instant can ever resolve.
    NoRecurrenceAnchor,
}

impl Display for TemplateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "task template requires a name"),
            Self::MissingBoundary => {
                write!(f, "task template requires a create or due boundary")
            }
            Self::NoRecurrenceAnchor => write!(
                f,
                "task template requires at least one recurrence-anchored boundary"
            ),
        }
    }
}

impl Error for TemplateError {}

impl TemplateError {
    fn code(self) -> &'static str {
        match self {
            Self::MissingName => "missing_name",
            Self::MissingBoundary => "missing_boundary",
            Self::NoRecurrenceAnchor => "no_recurrence_anchor",
        }
    }
}

/// Immutable template value; builder methods return modified copies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskTemplate {
    name: Option<String>,
    description: Option<String>,
    priority: Option<Priority>,
    create_anchor: Option<TemporalAnchor>,
    due_anchor: Option<TemporalAnchor>,
    deletion: DeletionRules,
}

impl TaskTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self, name: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.name = Some(name.into());
        next
    }

    pub fn description(&self, description: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.description = Some(description.into());
        next
    }

    pub fn priority(&self, priority: Priority) -> Self {
        let mut next = self.clone();
        next.priority = Some(priority);
        next
    }

    pub fn create_anchor(&self, anchor: TemporalAnchor) -> Self {
        let mut next = self.clone();
        next.create_anchor = Some(anchor);
        next
    }

    pub fn due_anchor(&self, anchor: TemporalAnchor) -> Self {
        let mut next = self.clone();
        next.due_anchor = Some(anchor);
        next
    }

    /// Creates an instance on every occurrence of `rule`.
    pub fn create_on(&self, rule: impl RecurrenceRule + 'static) -> Self {
        self.create_anchor(TemporalAnchor::recurrence(rule))
    }

    /// Creates an instance `offset` relative to its due instant.
    ///
    /// Negative offsets create before the due instant.
    pub fn create_offset(&self, offset: Duration) -> Self {
        self.create_anchor(TemporalAnchor::Duration(offset))
    }

    /// Makes instances due on every occurrence of `rule`.
    pub fn due_on(&self, rule: impl RecurrenceRule + 'static) -> Self {
        self.due_anchor(TemporalAnchor::recurrence(rule))
    }

    /// Makes instances due `offset` after their create instant.
    pub fn due_offset(&self, offset: Duration) -> Self {
        self.due_anchor(TemporalAnchor::Duration(offset))
    }

    /// Adds a retirement rule `duration` after `boundary`, for the completion
    /// states selected by `policy`.
    ///
    /// Rules for the same (boundary, state) pair are last-write-wins.
    pub fn automatically_delete(
        &self,
        duration: Duration,
        boundary: DeletionBoundary,
        policy: CompletionPolicy,
    ) -> Self {
        let mut next = self.clone();
        next.deletion.apply(boundary, policy, duration);
        next
    }

    pub fn name_value(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn create_anchor_value(&self) -> Option<&TemporalAnchor> {
        self.create_anchor.as_ref()
    }

    pub fn due_anchor_value(&self) -> Option<&TemporalAnchor> {
        self.due_anchor.as_ref()
    }

    pub fn deletion_rules(&self) -> &DeletionRules {
        &self.deletion
    }

    /// Validates the template and compiles it into a [`ResolvedTemplate`].
    ///
    /// # Errors
    /// - `MissingBoundary` when neither anchor was set.
    /// - `MissingName` when no non-blank name was set.
    /// - `NoRecurrenceAnchor` when every supplied anchor is a duration.
    pub fn finalize(&self) -> TemplateResult<ResolvedTemplate> {
        match self.compile() {
            Ok(resolved) => {
                debug!(
                    "event=template_finalize module=template status=ok name={} create={} due={}",
                    resolved.name(),
                    resolved.create_anchor().kind().as_str(),
                    resolved
                        .due_anchor()
                        .map_or("none", |anchor| anchor.kind().as_str())
                );
                Ok(resolved)
            }
            Err(err) => {
                warn!(
                    "event=template_finalize module=template status=error code={}",
                    err.code()
                );
                Err(err)
            }
        }
    }

    fn compile(&self) -> TemplateResult<ResolvedTemplate> {
        let create_anchor = match (&self.create_anchor, &self.due_anchor) {
            (None, None) => return Err(TemplateError::MissingBoundary),
            (Some(create), _) => create.clone(),
            (None, Some(due)) => due.clone(),
        };

        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(TemplateError::MissingName)?;

        let anchored = create_anchor.is_recurrence()
            || self
                .due_anchor
                .as_ref()
                .is_some_and(TemporalAnchor::is_recurrence);
        if !anchored {
            return Err(TemplateError::NoRecurrenceAnchor);
        }

        Ok(ResolvedTemplate::new(
            name.to_string(),
            self.description.clone(),
            self.priority,
            create_anchor,
            self.due_anchor.clone(),
            self.deletion,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskTemplate, TemplateError};
    use crate::model::duration::Duration;
    use crate::recurrence::CalendarRule;

    #[test]
    fn blank_name_is_rejected() {
        let err = TaskTemplate::new()
            .name("   ")
            .due_on(CalendarRule::daily_at(9, 0))
            .finalize()
            .unwrap_err();
        assert_eq!(err, TemplateError::MissingName);
    }

    #[test]
    fn create_duration_without_due_is_rejected() {
        let err = TaskTemplate::new()
            .name("orphan")
            .create_offset(Duration::minutes(-5))
            .finalize()
            .unwrap_err();
        assert_eq!(err, TemplateError::NoRecurrenceAnchor);
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(TemplateError::MissingName.code(), "missing_name");
        assert_eq!(TemplateError::MissingBoundary.code(), "missing_boundary");
        assert_eq!(
            TemplateError::NoRecurrenceAnchor.code(),
            "no_recurrence_anchor"
        );
    }
}
