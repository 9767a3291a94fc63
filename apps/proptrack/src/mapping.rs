//! # Field Mappings
//!
//! Config-driven transformations between runtime shapes.
//!
//! A `FieldMapping` copies values from a source record onto a fresh target
//! record, one configured field pair at a time. It never fills gaps: a pair
//! whose source field is absent leaves the target field unset, and the
//! enforcement boundary in `FieldMapping::run` rejects the result.

use crate::config::AppConfig;
use crate::error::AppError;
use proptrack_core::{InstrumentedShape, Record, checked_call};
use serde_json::Value;
use std::collections::BTreeMap;

/// A record of a runtime shape holding JSON values.
pub type JsonRecord = Record<Value>;

// =============================================================================
// SHAPE REGISTRY
// =============================================================================

/// Instrumented shapes and mappings built once from an `AppConfig`.
#[derive(Debug, Clone)]
pub struct ShapeRegistry {
    shapes: BTreeMap<String, InstrumentedShape>,
    mappings: BTreeMap<String, FieldMapping>,
}

impl ShapeRegistry {
    /// Instrument every shape and resolve every mapping in `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        config.validate()?;
        let shapes = config.instrument_shapes()?;

        let mut mappings = BTreeMap::new();
        for (name, mapping) in &config.mappings {
            let source = lookup(&shapes, &mapping.source)?;
            let target = lookup(&shapes, &mapping.target)?;
            let pairs = mapping
                .fields
                .iter()
                .map(|(from, to)| (from.clone(), to.clone()))
                .collect();
            mappings.insert(
                name.clone(),
                FieldMapping::new(name.clone(), source.clone(), target.clone(), pairs),
            );
        }

        tracing::debug!(
            shapes = shapes.len(),
            mappings = mappings.len(),
            "shape registry ready"
        );
        Ok(Self { shapes, mappings })
    }

    /// Instrumented shape by name.
    pub fn shape(&self, name: &str) -> Result<&InstrumentedShape, AppError> {
        lookup(&self.shapes, name)
    }

    /// Mapping by name.
    pub fn mapping(&self, name: &str) -> Result<&FieldMapping, AppError> {
        self.mappings
            .get(name)
            .ok_or_else(|| AppError::UnknownMapping(name.to_string()))
    }

    /// All shapes, sorted by name.
    pub fn shapes(&self) -> impl Iterator<Item = &InstrumentedShape> {
        self.shapes.values()
    }

    /// All mappings, sorted by name.
    pub fn mappings(&self) -> impl Iterator<Item = &FieldMapping> {
        self.mappings.values()
    }
}

fn lookup<'a>(
    shapes: &'a BTreeMap<String, InstrumentedShape>,
    name: &str,
) -> Result<&'a InstrumentedShape, AppError> {
    shapes
        .get(name)
        .ok_or_else(|| AppError::UnknownShape(name.to_string()))
}

/// Write every key of a JSON object into a new record of `shape`.
///
/// Keys outside the shape's FieldSet are kept as untracked extras.
pub fn record_from_json(shape: &InstrumentedShape, value: Value) -> Result<JsonRecord, AppError> {
    match value {
        Value::Object(map) => Ok(shape.create_from(map)),
        other => Err(AppError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// FIELD MAPPING
// =============================================================================

/// A named transformation from one runtime shape to another.
#[derive(Debug, Clone)]
pub struct FieldMapping {
    name: String,
    source: InstrumentedShape,
    target: InstrumentedShape,
    pairs: Vec<(String, String)>,
}

impl FieldMapping {
    /// Create a mapping copying `pairs` (source field, target field).
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        source: InstrumentedShape,
        target: InstrumentedShape,
        pairs: Vec<(String, String)>,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            target,
            pairs,
        }
    }

    /// Mapping name, used as the function name at the boundary.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source shape.
    #[must_use]
    pub fn source(&self) -> &InstrumentedShape {
        &self.source
    }

    /// Target shape.
    #[must_use]
    pub fn target(&self) -> &InstrumentedShape {
        &self.target
    }

    /// Copy mapped values onto a new target record, unchecked.
    #[must_use]
    pub fn apply(&self, source: &JsonRecord) -> JsonRecord {
        let mut target = self.target.create();
        for (from, to) in &self.pairs {
            if let Some(value) = source.get(from) {
                target.set(to.as_str(), value.clone());
            }
        }
        target
    }

    /// Apply the mapping behind the completeness boundary.
    pub fn run(&self, source: &JsonRecord) -> Result<JsonRecord, AppError> {
        if source.shape_name() != self.source.name() {
            return Err(AppError::ShapeMismatch {
                mapping: self.name.clone(),
                expected: self.source.name().to_string(),
                actual: source.shape_name().to_string(),
            });
        }

        let target = checked_call(&self.name, || self.apply(source))?;
        tracing::info!(
            mapping = %self.name,
            source = %self.source.name(),
            target = %self.target.name(),
            "mapped record"
        );
        Ok(target)
    }
}

// =============================================================================
// TESTS
// =============================================================================
