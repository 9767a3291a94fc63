//! # Completeness Report
//!
//! Derived view over an instance's assignment state.
//!
//! - Always recomputed from the current state, never cached
//! - `missing_fields` is in FieldSet declaration order
//! - `is_complete` holds iff `missing_fields` is empty

use crate::primitives::MISSING_FIELDS_SEPARATOR;
use crate::{AssignmentState, FieldSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of an instance's completeness at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessReport {
    /// Every declared field has been assigned.
    pub is_complete: bool,
    /// Declared fields never assigned, in declaration order.
    pub missing_fields: Vec<String>,
    /// Number of declared fields.
    pub declared: usize,
}

impl CompletenessReport {
    /// Compute the report for `state` over `fields`.
    #[must_use]
    pub fn from_state(fields: &FieldSet, state: &AssignmentState) -> Self {
        let missing_fields: Vec<String> = fields
            .iter()
            .enumerate()
            .filter(|(position, _)| !state.is_set(*position))
            .map(|(_, name)| name.to_string())
            .collect();

        Self {
            is_complete: missing_fields.is_empty(),
            missing_fields,
            declared: fields.len(),
        }
    }

    /// Number of declared fields that have been assigned.
    #[must_use]
    pub fn assigned(&self) -> usize {
        self.declared.saturating_sub(self.missing_fields.len())
    }
}

impl fmt::Display for CompletenessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_complete {
            write!(f, "complete ({}/{})", self.assigned(), self.declared)
        } else {
            write!(
                f,
                "incomplete ({}/{}), missing: {}",
                self.assigned(),
                self.declared,
                self.missing_fields.join(MISSING_FIELDS_SEPARATOR)
            )
        }
    }
}

// =============================================================================
// TRACKED TRAIT
// =============================================================================

/// An instrumented instance: a value paired with its own AssignmentState.
///
/// Implemented by `Record` and by every type generated with `tracked_shape!`.
pub trait Tracked {
    /// The FieldSet this instance was instrumented with.
    fn field_set(&self) -> &FieldSet;

    /// This instance's assignment flags.
    fn assignment_state(&self) -> &AssignmentState;

    /// Compute the current completeness report.
    fn completeness(&self) -> CompletenessReport {
        CompletenessReport::from_state(self.field_set(), self.assignment_state())
    }

    /// Whether every declared field has been assigned.
    fn is_complete(&self) -> bool {
        self.assignment_state().all_set()
    }

    /// Declared fields never assigned, in declaration order.
    fn missing_fields(&self) -> Vec<String> {
        self.completeness().missing_fields
    }
}

// =============================================================================
// TESTS
// =============================================================================
