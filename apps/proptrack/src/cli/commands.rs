//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::AppConfig;
use crate::error::AppError;
use crate::mapping::{JsonRecord, ShapeRegistry, record_from_json};
use crate::users::{UserMapper, entity_json, persistence_json, sample_user};
use proptrack_core::{Tracked, checked_call, enforce_completeness};
use serde::Serialize;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum input file size (10 MB).
///
/// A single JSON object larger than this is rejected before reading.
const MAX_INPUT_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Canonicalize `path` and ensure it is a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, AppError> {
    let canonical = path.canonicalize().map_err(|e| {
        AppError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(AppError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Reject files above `max_size` before reading them.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), AppError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| AppError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(AppError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Read a JSON input file into a record of `shape`.
pub fn load_record(
    registry: &ShapeRegistry,
    shape: &str,
    input: &Path,
) -> Result<JsonRecord, AppError> {
    let path = validate_file_path(input)?;
    validate_file_size(&path, MAX_INPUT_FILE_SIZE)?;

    let contents = std::fs::read(&path)?;
    let value: serde_json::Value = serde_json::from_slice(&contents)?;

    tracing::info!("Loaded {:?} as shape '{}'", path, shape);
    record_from_json(registry.shape(shape)?, value)
}

/// Pretty-print `value` to stdout.
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// =============================================================================
// SHAPES COMMAND
// =============================================================================

/// List configured shapes and mappings.
pub fn cmd_shapes(config: &AppConfig, json_mode: bool) -> Result<(), AppError> {
    let registry = ShapeRegistry::from_config(config)?;

    if json_mode {
        let shapes: serde_json::Map<String, serde_json::Value> = registry
            .shapes()
            .map(|s| (s.name().to_string(), serde_json::json!(s.fields())))
            .collect();
        let mappings: serde_json::Map<String, serde_json::Value> = registry
            .mappings()
            .map(|m| {
                (
                    m.name().to_string(),
                    serde_json::json!({ "source": m.source().name(), "target": m.target().name() }),
                )
            })
            .collect();
        print_json(&serde_json::json!({ "shapes": shapes, "mappings": mappings }))?;
        return Ok(());
    }

    println!("Shapes");
    println!("======");
    for shape in registry.shapes() {
        let fields: Vec<_> = shape.fields().iter().collect();
        println!("  {:<20} {}", shape.name(), fields.join(", "));
    }
    println!();
    println!("Mappings");
    println!("========");
    for mapping in registry.mappings() {
        println!(
            "  {:<20} {} -> {}",
            mapping.name(),
            mapping.source().name(),
            mapping.target().name()
        );
    }

    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Report the completeness of an input object.
///
/// Fails with `IncompleteObjectError` when a declared field is missing.
pub fn cmd_check(
    config: &AppConfig,
    json_mode: bool,
    shape: &str,
    input: &Path,
) -> Result<(), AppError> {
    let registry = ShapeRegistry::from_config(config)?;
    let record = load_record(&registry, shape, input)?;
    let report = record.completeness();
    let untracked: Vec<_> = record.untracked_fields().collect();

    if json_mode {
        print_json(&serde_json::json!({
            "shape": shape,
            "report": report,
            "untracked_fields": untracked,
        }))?;
    } else {
        println!("Shape:     {}", shape);
        println!("Status:    {}", report);
        if !untracked.is_empty() {
            println!("Untracked: {}", untracked.join(", "));
        }
    }

    checked_call("check", || record)?;
    Ok(())
}

// =============================================================================
// MAP COMMAND
// =============================================================================

/// Run a configured mapping on an input object.
pub fn cmd_map(
    config: &AppConfig,
    json_mode: bool,
    mapping: &str,
    input: &Path,
) -> Result<(), AppError> {
    let registry = ShapeRegistry::from_config(config)?;
    let mapping = registry.mapping(mapping)?;
    let source = load_record(&registry, mapping.source().name(), input)?;

    let target = mapping.run(&source)?;
    let output = serde_json::to_value(&target)?;

    if json_mode {
        print_json(&output)?;
    } else {
        println!("{} -> {}", mapping.source().name(), mapping.target().name());
        print_json(&output)?;
    }

    Ok(())
}

// =============================================================================
// DEMO COMMAND
// =============================================================================

/// Round-trip the sample user through the static user mapper.
pub fn cmd_demo(json_mode: bool, incomplete: bool) -> Result<(), AppError> {
    let to_persistence = enforce_completeness(UserMapper::to_persistence);
    let from_persistence = enforce_completeness(UserMapper::from_persistence);

    let user = sample_user();
    tracing::info!("sample user complete: {}", user.is_complete());

    let persisted = to_persistence.call(&user)?;
    let mapped_back = from_persistence.call(&persisted)?;

    if json_mode {
        print_json(&serde_json::json!({
            "user_complete": user.is_complete(),
            "persisted": persistence_json(&persisted),
            "mapped_back": entity_json(&mapped_back),
        }))?;
    } else {
        println!("user complete: {}", user.is_complete());
        println!();
        println!("persisted:");
        print_json(&persistence_json(&persisted))?;
        println!();
        println!("mapped back:");
        print_json(&entity_json(&mapped_back))?;
    }

    if incomplete {
        let mentor_from_persistence = enforce_completeness(UserMapper::mentor_from_persistence);
        mentor_from_persistence.call(&persisted)?;
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
