//! Completion policies and the four-slot deletion table.
//!
//! # Responsibility
//! - Describe which completion states a deletion rule applies to.
//! - Key deletion data by (boundary x completion state) in one table, so rule
//!   writes and timestamp reads share one code path.
//!
//! # Invariants
//! - Slots are independent: writing one never touches another.
//! - Writing a slot twice keeps the last value.

use serde::{Deserialize, Serialize};

/// Boundary a deletion rule counts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionBoundary {
    /// Counts from the instance due instant.
    Due,
    /// Counts from the instance create instant.
    Existing,
}

/// Completion state of a materialized instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    Complete,
    Incomplete,
}

/// Which completion states a deletion rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompletionPolicy {
    pub applies_when_complete: bool,
    pub applies_when_incomplete: bool,
}

impl Default for CompletionPolicy {
    fn default() -> Self {
        Self::always()
    }
}

impl CompletionPolicy {
    pub const fn new(applies_when_complete: bool, applies_when_incomplete: bool) -> Self {
        Self {
            applies_when_complete,
            applies_when_incomplete,
        }
    }

    pub const fn always() -> Self {
        Self::new(true, true)
    }

    pub const fn complete_only() -> Self {
        Self::new(true, false)
    }

    pub const fn incomplete_only() -> Self {
        Self::new(false, true)
    }

    pub const fn is_always(self) -> bool {
        self.applies_when_complete && self.applies_when_incomplete
    }

    pub const fn applies_to(self, state: CompletionState) -> bool {
        match state {
            CompletionState::Complete => self.applies_when_complete,
            CompletionState::Incomplete => self.applies_when_incomplete,
        }
    }
}

/// Fixed four-slot table keyed by (boundary, completion state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeletionSlots<T> {
    slots: [[Option<T>; 2]; 2],
}

impl<T> Default for DeletionSlots<T> {
    fn default() -> Self {
        Self {
            slots: [[None, None], [None, None]],
        }
    }
}

/// Every (boundary, state) key in stable order.
pub const DELETION_KEYS: [(DeletionBoundary, CompletionState); 4] = [
    (DeletionBoundary::Due, CompletionState::Complete),
    (DeletionBoundary::Due, CompletionState::Incomplete),
    (DeletionBoundary::Existing, CompletionState::Complete),
    (DeletionBoundary::Existing, CompletionState::Incomplete),
];

impl<T: Copy> DeletionSlots<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, boundary: DeletionBoundary, state: CompletionState) -> Option<T> {
        self.slots[boundary_index(boundary)][state_index(state)]
    }

    pub fn set(&mut self, boundary: DeletionBoundary, state: CompletionState, value: T) {
        self.slots[boundary_index(boundary)][state_index(state)] = Some(value);
    }

    /// Writes `value` into every slot of `boundary` selected by `policy`.
    pub fn apply(&mut self, boundary: DeletionBoundary, policy: CompletionPolicy, value: T) {
        for state in [CompletionState::Complete, CompletionState::Incomplete] {
            if policy.applies_to(state) {
                self.set(boundary, state, value);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        DELETION_KEYS
            .iter()
            .all(|(boundary, state)| self.get(*boundary, *state).is_none())
    }

    /// Builds a new table by transforming each set slot; `f` may drop a slot.
    pub fn filter_map<U: Copy>(
        &self,
        mut f: impl FnMut(DeletionBoundary, CompletionState, T) -> Option<U>,
    ) -> DeletionSlots<U> {
        let mut mapped = DeletionSlots::new();
        for (boundary, state) in DELETION_KEYS {
            if let Some(value) = self.get(boundary, state).and_then(|v| f(boundary, state, v)) {
                mapped.set(boundary, state, value);
            }
        }
        mapped
    }
}

fn boundary_index(boundary: DeletionBoundary) -> usize {
    match boundary {
        DeletionBoundary::Due => 0,
        DeletionBoundary::Existing => 1,
    }
}

fn state_index(state: CompletionState) -> usize {
    match state {
        CompletionState::Complete => 0,
        CompletionState::Incomplete => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::{CompletionPolicy, CompletionState, DeletionBoundary, DeletionSlots};

    #[test]
    fn default_policy_is_always() {
        assert!(CompletionPolicy::default().is_always());
        assert!(!CompletionPolicy::complete_only().is_always());
    }

    #[test]
    fn apply_writes_only_selected_states() {
        let mut slots = DeletionSlots::new();
        slots.apply(DeletionBoundary::Due, CompletionPolicy::incomplete_only(), 7);

        assert_eq!(slots.get(DeletionBoundary::Due, CompletionState::Incomplete), Some(7));
        assert_eq!(slots.get(DeletionBoundary::Due, CompletionState::Complete), None);
        assert_eq!(slots.get(DeletionBoundary::Existing, CompletionState::Incomplete), None);
    }

    #[test]
    fn apply_with_no_states_writes_nothing() {
        let mut slots = DeletionSlots::new();
        slots.apply(DeletionBoundary::Existing, CompletionPolicy::new(false, false), 1);
        assert!(slots.is_empty());
    }

    #[test]
    fn later_write_overwrites_same_slot() {
        let mut slots = DeletionSlots::new();
        slots.apply(DeletionBoundary::Due, CompletionPolicy::always(), 1);
        slots.apply(DeletionBoundary::Due, CompletionPolicy::complete_only(), 2);

        assert_eq!(slots.get(DeletionBoundary::Due, CompletionState::Complete), Some(2));
        assert_eq!(slots.get(DeletionBoundary::Due, CompletionState::Incomplete), Some(1));
    }

    #[test]
    fn filter_map_drops_rejected_slots() {
        let mut slots = DeletionSlots::new();
        slots.set(DeletionBoundary::Due, CompletionState::Complete, 10);
        slots.set(DeletionBoundary::Existing, CompletionState::Complete, 20);

        let mapped = slots.filter_map(|boundary, _, value| {
            (boundary == DeletionBoundary::Existing).then_some(value * 2)
        });
        assert_eq!(mapped.get(DeletionBoundary::Due, CompletionState::Complete), None);
        assert_eq!(
            mapped.get(DeletionBoundary::Existing, CompletionState::Complete),
            Some(40)
        );
    }
}
