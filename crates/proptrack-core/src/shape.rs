//! # Shapes and Records
//!
//! Whole-instance interception for shapes declared at runtime.
//!
//! ```text
//! ShapeDefinition ──instrument()──▶ InstrumentedShape ──create()──▶ Record<V>
//! ```
//!
//! A `Record` routes every read and write by field name through one layer.
//! Any name may be written. Names in the FieldSet mark their flag; names outside
//! it are stored as untracked extras and never change the report.
//!
//! `instrument` snapshots the FieldSet. Fields added to a `ShapeDefinition`
//! afterwards only reach factories instrumented after the change.

use crate::primitives::INSTRUMENT_LOG_TARGET;
use crate::{AssignmentState, FieldSet, FieldStatus, TrackError, Tracked};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

// =============================================================================
// SHAPE DEFINITION
// =============================================================================

/// A named shape with its declared fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeDefinition {
    name: String,
    fields: FieldSet,
}

impl ShapeDefinition {
    /// Declare a shape.
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Result<Self, TrackError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(TrackError::EmptyShapeName);
        }
        Ok(Self {
            name,
            fields: FieldSet::new(fields)?,
        })
    }

    /// Declare one more field.
    pub fn with_field(mut self, field: impl Into<Cow<'static, str>>) -> Result<Self, TrackError> {
        self.fields = self.fields.with_field(field)?;
        Ok(self)
    }

    /// Shape name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields.
    #[must_use]
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }
}

/// Instrument a shape once, before any instance exists.
#[must_use]
pub fn instrument(shape: &ShapeDefinition) -> InstrumentedShape {
    tracing::debug!(
        target: INSTRUMENT_LOG_TARGET,
        shape = %shape.name,
        fields = shape.fields.len(),
        "instrumented shape"
    );
    InstrumentedShape {
        name: Arc::from(shape.name.as_str()),
        fields: Arc::new(shape.fields.clone()),
    }
}

// =============================================================================
// INSTRUMENTED SHAPE (FACTORY)
// =============================================================================

/// Factory for tracked records of one shape.
///
/// Cloning is cheap; clones share the same FieldSet snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentedShape {
    name: Arc<str>,
    fields: Arc<FieldSet>,
}

impl InstrumentedShape {
    /// Shape name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The FieldSet snapshot taken at instrumentation time.
    #[must_use]
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Create a record with every declared field `Unset`.
    #[must_use]
    pub fn create<V>(&self) -> Record<V> {
        Record {
            shape: Arc::clone(&self.name),
            fields: Arc::clone(&self.fields),
            values: std::iter::repeat_with(|| None).take(self.fields.len()).collect(),
            state: AssignmentState::new(self.fields.len()),
            extras: BTreeMap::new(),
        }
    }

    /// Create a record and write every pair through `Record::set`.
    pub fn create_from<V, I, K>(&self, pairs: I) -> Record<V>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        let mut record = self.create();
        for (name, value) in pairs {
            record.set(name, value);
        }
        record
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// An instrumented instance of a runtime-declared shape.
///
/// `Clone` is a shallow, field-for-field copy that keeps the assignment flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<V> {
    shape: Arc<str>,
    fields: Arc<FieldSet>,
    values: Vec<Option<V>>,
    state: AssignmentState,
    extras: BTreeMap<String, V>,
}

impl<V> Record<V> {
    /// Name of the shape this record was created from.
    #[must_use]
    pub fn shape_name(&self) -> &str {
        &self.shape
    }

    /// Write `value` to `name` and return the previous value.
    ///
    /// A declared field is marked `Set`. An undeclared name is stored as an
    /// untracked extra.
    pub fn set(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        let name = name.into();
        match self.fields.position(&name) {
            Some(position) => {
                self.state.mark(position);
                self.values[position].replace(value)
            }
            None => {
                tracing::trace!(
                    target: INSTRUMENT_LOG_TARGET,
                    shape = %self.shape,
                    field = %name,
                    "write to undeclared field is not tracked"
                );
                self.extras.insert(name, value)
            }
        }
    }

    /// Read the current value of `name`, declared or not.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&V> {
        match self.fields.position(name) {
            Some(position) => self.values[position].as_ref(),
            None => self.extras.get(name),
        }
    }

    /// Whether `name` is part of the tracked FieldSet.
    #[must_use]
    pub fn is_tracked(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    /// Assignment status of a declared field. `None` for undeclared names.
    #[must_use]
    pub fn status(&self, name: &str) -> Option<FieldStatus> {
        self.fields
            .position(name)
            .and_then(|position| self.state.status(position))
    }

    /// Whether a declared field has been written. `None` for undeclared names.
    #[must_use]
    pub fn is_set(&self, name: &str) -> Option<bool> {
        self.status(name).map(FieldStatus::is_set)
    }

    /// Names of untracked extras, sorted.
    pub fn untracked_fields(&self) -> impl Iterator<Item = &str> {
        self.extras.keys().map(String::as_str)
    }

    /// Iterate present fields: declared fields in declaration order,
    /// then untracked extras sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        let declared = self
            .fields
            .iter()
            .zip(self.values.iter())
            .filter_map(|(name, value)| value.as_ref().map(|v| (name, v)));
        let extras = self.extras.iter().map(|(name, v)| (name.as_str(), v));
        declared.chain(extras)
    }
}

impl<V> Tracked for Record<V> {
    fn field_set(&self) -> &FieldSet {
        &self.fields
    }

    fn assignment_state(&self) -> &AssignmentState {
        &self.state
    }
}

impl<V: Serialize> Serialize for Record<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// =============================================================================
// TESTS
// =============================================================================
