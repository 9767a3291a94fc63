//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the proptrack CORE:
//! - Per-field assignment status (`FieldStatus`)
//! - Declaration errors (`TrackError`)
//! - Boundary failure (`IncompleteObjectError`)

use crate::primitives::MISSING_FIELDS_SEPARATOR;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// FIELD STATUS
// =============================================================================

/// Assignment status of a single declared field.
///
/// Two states, one transition:
///
/// ```text
/// Unset ──write──▶ Set ──write──▶ Set
/// ```
///
/// There is no operation that moves a field back to `Unset`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    /// The field has never been written.
    #[default]
    Unset,
    /// The field has been written at least once.
    Set,
}

impl FieldStatus {
    /// Apply a write. The result is always `Set`.
    #[must_use]
    pub const fn on_write(self) -> Self {
        Self::Set
    }

    /// Whether this status counts towards completeness.
    #[must_use]
    pub const fn is_set(self) -> bool {
        matches!(self, Self::Set)
    }
}

impl From<bool> for FieldStatus {
    fn from(set: bool) -> Self {
        if set { Self::Set } else { Self::Unset }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised while declaring a shape.
///
/// These are programming errors in the declaration itself, detected once
/// when the FieldSet is built, never during field writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// A shape was declared with an empty name.
    #[error("Shape name must not be empty")]
    EmptyShapeName,

    /// A declared field name is the empty string.
    #[error("Field name at position {0} is empty")]
    EmptyFieldName(usize),

    /// A declared field name exceeds `MAX_FIELD_NAME_LENGTH`.
    #[error("Field name '{name}' is {len} bytes, limit is {max}")]
    FieldNameTooLong {
        /// The offending name.
        name: String,
        /// Its length in bytes.
        len: usize,
        /// The configured limit.
        max: usize,
    },

    /// The same field name was declared twice.
    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),

    /// The declaration exceeds `MAX_FIELD_COUNT`.
    #[error("Shape declares {count} fields, limit is {max}")]
    TooManyFields {
        /// Number of declared fields.
        count: usize,
        /// The configured limit.
        max: usize,
    },
}

/// A wrapped transformation returned an object with unassigned fields.
///
/// Raised by the enforcement wrapper. `missing_fields` is in FieldSet
/// declaration order. The call that produced it returns no value.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error(
    "Not all fields are set in the object returned from {function_name}, the following are not set: {}",
    .missing_fields.join(MISSING_FIELDS_SEPARATOR)
)]
pub struct IncompleteObjectError {
    /// Name of the wrapped function.
    pub function_name: String,
    /// Unassigned fields, in declaration order.
    pub missing_fields: Vec<String>,
}

impl IncompleteObjectError {
    /// Create a new error for `function_name`.
    #[must_use]
    pub fn new(function_name: impl Into<String>, missing_fields: Vec<String>) -> Self {
        Self {
            function_name: function_name.into(),
            missing_fields,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
