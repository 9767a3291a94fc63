//! # AssignmentState
//!
//! Per-instance record of which declared fields have ever been written.
//!
//! Flags are stored positionally, parallel to the FieldSet they were created
//! for. The state only ever moves forward: `mark` sets a flag, nothing clears one.

use crate::FieldStatus;

/// Per-instance "ever assigned" flags, one per declared field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssignmentState {
    flags: Vec<FieldStatus>,
}

impl AssignmentState {
    /// Create a state for `field_count` fields, all `Unset`.
    #[must_use]
    pub fn new(field_count: usize) -> Self {
        Self {
            flags: vec![FieldStatus::Unset; field_count],
        }
    }

    /// Record a write to the field at `position`.
    ///
    /// Returns `true` if this was the first write (Unset → Set).
    /// Positions outside the declared range are ignored and return `false`.
    pub fn mark(&mut self, position: usize) -> bool {
        match self.flags.get_mut(position) {
            Some(status) => {
                let first = !status.is_set();
                *status = status.on_write();
                first
            }
            None => false,
        }
    }

    /// Status of the field at `position`.
    #[must_use]
    pub fn status(&self, position: usize) -> Option<FieldStatus> {
        self.flags.get(position).copied()
    }

    /// Whether the field at `position` has been written.
    #[must_use]
    pub fn is_set(&self, position: usize) -> bool {
        self.status(position).is_some_and(FieldStatus::is_set)
    }

    /// Number of tracked fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether no fields are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Number of fields written at least once.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.flags.iter().filter(|s| s.is_set()).count()
    }

    /// Whether every tracked field has been written.
    #[must_use]
    pub fn all_set(&self) -> bool {
        self.flags.iter().all(|s| s.is_set())
    }

    /// Iterate statuses in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = FieldStatus> + '_ {
        self.flags.iter().copied()
    }
}

// =============================================================================
// TESTS
// =============================================================================
