//! # FieldSet
//!
//! The ordered, fixed set of field names declared on a shape.
//!
//! - Order is declaration order and is the order of every report
//! - Fixed once built; there is no insertion after construction
//! - Shared read-only between all instances of a shape

use crate::TrackError;
use crate::primitives::{MAX_FIELD_COUNT, MAX_FIELD_NAME_LENGTH};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Ordered set of declared field names.
///
/// Names are validated on construction: non-empty, at most
/// `MAX_FIELD_NAME_LENGTH` bytes, and unique. A FieldSet may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldSet {
    names: Vec<Cow<'static, str>>,
    #[serde(skip)]
    index: BTreeMap<Cow<'static, str>, usize>,
}

impl FieldSet {
    /// Build a FieldSet from owned or borrowed names.
    pub fn new<I, S>(names: I) -> Result<Self, TrackError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        let names: Vec<Cow<'static, str>> = names.into_iter().map(Into::into).collect();

        if names.len() > MAX_FIELD_COUNT {
            return Err(TrackError::TooManyFields {
                count: names.len(),
                max: MAX_FIELD_COUNT,
            });
        }

        let mut index = BTreeMap::new();
        for (position, name) in names.iter().enumerate() {
            validate_name(position, name)?;
            if index.insert(name.clone(), position).is_some() {
                return Err(TrackError::DuplicateField(name.to_string()));
            }
        }

        Ok(Self { names, index })
    }

    /// Build a FieldSet from the field list of a `tracked_shape!` struct.
    ///
    /// Struct field names are unique by construction and their length is
    /// checked at compile time by the macro, so no validation runs here.
    #[doc(hidden)]
    #[must_use]
    pub fn from_struct_fields(names: &'static [&'static str]) -> Self {
        let names: Vec<Cow<'static, str>> = names.iter().map(|n| Cow::Borrowed(*n)).collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(position, name)| (name.clone(), position))
            .collect();
        Self { names, index }
    }

    /// An empty FieldSet. Instances of an empty shape are always complete.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            names: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Declaration position of `name`, if declared.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether `name` is a declared field.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Field name at `position`.
    #[must_use]
    pub fn name(&self, position: usize) -> Option<&str> {
        self.names.get(position).map(|n| n.as_ref())
    }

    /// Iterate names in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|n| n.as_ref())
    }

    /// Return a new FieldSet with `name` appended.
    ///
    /// Existing FieldSets (and every instance built on them) are unaffected.
    pub fn with_field(&self, name: impl Into<Cow<'static, str>>) -> Result<Self, TrackError> {
        let mut names = self.names.clone();
        names.push(name.into());
        Self::new(names)
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::empty()
    }
}

fn validate_name(position: usize, name: &str) -> Result<(), TrackError> {
    if name.is_empty() {
        return Err(TrackError::EmptyFieldName(position));
    }
    if name.len() > MAX_FIELD_NAME_LENGTH {
        return Err(TrackError::FieldNameTooLong {
            name: name.to_string(),
            len: name.len(),
            max: MAX_FIELD_NAME_LENGTH,
        });
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_declaration_order() {
        let set = FieldSet::new(["zeta", "alpha", "mid"]).expect("fieldset");
        let names: Vec<_> = set.iter().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(set.position("alpha"), Some(1));
        assert_eq!(set.name(2), Some("mid"));
    }

    #[test]
    fn rejects_duplicates() {
        let result = FieldSet::new(["a", "b", "a"]);
        assert_eq!(result, Err(TrackError::DuplicateField("a".into())));
    }

    #[test]
    fn rejects_empty_name() {
        let result = FieldSet::new(["a", ""]);
        assert_eq!(result, Err(TrackError::EmptyFieldName(1)));
    }

    #[test]
    fn rejects_long_name() {
        let long = "x".repeat(MAX_FIELD_NAME_LENGTH + 1);
        let result = FieldSet::new([long]);
        assert!(matches!(result, Err(TrackError::FieldNameTooLong { .. })));
    }

    #[test]
    fn rejects_too_many_fields() {
        let names: Vec<String> = (0..=MAX_FIELD_COUNT).map(|i| format!("f{i}")).collect();
        let result = FieldSet::new(names);
        assert!(matches!(result, Err(TrackError::TooManyFields { .. })));
    }

    #[test]
    fn with_field_leaves_original_untouched() {
        let base = FieldSet::new(["a"]).expect("fieldset");
        let extended = base.with_field("b").expect("extend");

        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
        assert!(!base.contains("b"));
        assert!(extended.contains("b"));
    }

    #[test]
    fn serializes_as_name_list() {
        let set = FieldSet::new(["first", "second"]).expect("fieldset");
        let json = serde_json::to_string(&set).expect("json");
        assert_eq!(json, r#"["first","second"]"#);
    }
}
