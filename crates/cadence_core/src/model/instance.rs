//! Materialized task instance.
//!
//! # Responsibility
//! - Carry the resolved create/due/deletion instants of one template.
//! - Provide a stable content hash for idempotent materialization.
//!
//! # Invariants
//! - Instances are immutable once produced by a resolved template.
//! - Deletion instants are excluded from the content hash.
//! - Hash field order is `name, description, priority, create, due`.

use crate::model::policy::{CompletionState, DeletionBoundary, DeletionSlots};
use crate::model::priority::Priority;
use crate::time::Instant;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{SecondsFormat, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Retirement instants keyed by (boundary, completion state).
pub type DeletionSchedule = DeletionSlots<Instant>;

/// One task materialized from a template around a query instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInstance {
    pub name: String,
    pub priority: Option<Priority>,
    pub create_at: Option<Instant>,
    pub due_at: Option<Instant>,
    pub description: Option<String>,
    pub deletion: DeletionSchedule,
}

#[derive(Serialize)]
struct HashPayload<'a> {
    name: &'a str,
    description: Option<&'a str>,
    priority: Option<u8>,
    create: Option<String>,
    due: Option<String>,
}

impl TaskInstance {
    /// Returns the retirement instant for one (state, boundary) pair.
    pub fn deletion_at(
        &self,
        state: CompletionState,
        boundary: DeletionBoundary,
    ) -> Option<Instant> {
        self.deletion.get(boundary, state)
    }

    /// Returns `base64(JSON{name, description, priority, create, due})`.
    ///
    /// Content-addressing aid for "was this already materialized", not a
    /// cryptographic digest.
    ///
    /// # Errors
    /// - Propagates the JSON encoder error for the hash payload.
    pub fn content_hash(&self) -> serde_json::Result<String> {
        let payload = HashPayload {
            name: &self.name,
            description: self.description.as_deref(),
            priority: self.priority.map(Priority::weight),
            create: self.create_at.map(iso_utc),
            due: self.due_at.map(iso_utc),
        };
        let json = serde_json::to_string(&payload)?;
        Ok(STANDARD.encode(json))
    }
}

impl Serialize for TaskInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let deletion = DeletionView(&self.deletion);
        let mut state = serializer.serialize_struct("TaskInstance", 6)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("priority", &self.priority)?;
        state.serialize_field("create_at", &self.create_at.map(iso_utc))?;
        state.serialize_field("due_at", &self.due_at.map(iso_utc))?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("deletion", &deletion)?;
        state.end()
    }
}

struct DeletionView<'a>(&'a DeletionSchedule);

impl Serialize for DeletionView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let at = |boundary, state| self.0.get(boundary, state).map(iso_utc);
        let mut state = serializer.serialize_struct("DeletionSchedule", 4)?;
        state.serialize_field(
            "complete_after_due",
            &at(DeletionBoundary::Due, CompletionState::Complete),
        )?;
        state.serialize_field(
            "incomplete_after_due",
            &at(DeletionBoundary::Due, CompletionState::Incomplete),
        )?;
        state.serialize_field(
            "complete_after_existing",
            &at(DeletionBoundary::Existing, CompletionState::Complete),
        )?;
        state.serialize_field(
            "incomplete_after_existing",
            &at(DeletionBoundary::Existing, CompletionState::Incomplete),
        )?;
        state.end()
    }
}

fn iso_utc(instant: Instant) -> String {
    instant
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::iso_utc;
    use chrono::DateTime;

    #[test]
    fn iso_utc_normalizes_offset_and_keeps_millis() {
        let instant = DateTime::parse_from_rfc3339("2024-03-01T10:45:00+02:00").unwrap();
        assert_eq!(iso_utc(instant), "2024-03-01T08:45:00.000Z");
    }
}
