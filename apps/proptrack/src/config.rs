//! # Configuration
//!
//! TOML configuration for runtime shapes, field mappings, and logging.
//!
//! ```toml
//! [logging]
//! format = "text"            # or "json"
//! filter = "proptrack=info"
//!
//! [shapes.user_entity]
//! fields = ["firstName", "lastName", "birthday", "username"]
//!
//! [mappings.from_persistence]
//! source = "user_persistence"
//! target = "user_entity"
//!
//! [mappings.from_persistence.fields]
//! FirstName = "firstName"
//! ```
//!
//! Without a config file the built-in user entity/persistence config is used.

use crate::error::AppError;
use proptrack_core::{InstrumentedShape, ShapeDefinition, instrument};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "proptrack.toml";

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Default `tracing` filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "proptrack=info";

// =============================================================================
// CONFIG TYPES
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// `[shapes.<name>]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapeConfig {
    /// Declared fields, in order.
    pub fields: Vec<String>,
}

/// `[mappings.<name>]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingConfig {
    /// Source shape name.
    pub source: String,
    /// Target shape name.
    pub target: String,
    /// Source field → target field.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

/// Full application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Logging setup.
    pub logging: LoggingConfig,
    /// Runtime shape declarations by name.
    pub shapes: BTreeMap<String, ShapeConfig>,
    /// Field mappings by name.
    pub mappings: BTreeMap<String, MappingConfig>,
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            AppError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(AppError::Config(format!(
                "Config size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load `path` if given, else `DEFAULT_CONFIG_FILE` if present, else the built-in config.
    ///
    /// An explicitly given path must exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::builtin())
                }
            }
        }
    }

    /// The built-in user entity/persistence configuration.
    #[must_use]
    pub fn builtin() -> Self {
        let entity = ["firstName", "lastName", "birthday", "username"];
        let persistence = ["FirstName", "LastName", "Birthday__c", "Username__c"];

        let shape = |fields: &[&str]| ShapeConfig {
            fields: fields.iter().map(|f| f.to_string()).collect(),
        };
        let pairs = |from: &[&str], to: &[&str]| -> BTreeMap<String, String> {
            from.iter()
                .zip(to)
                .map(|(f, t)| (f.to_string(), t.to_string()))
                .collect()
        };

        let mut shapes = BTreeMap::new();
        shapes.insert("user_entity".to_string(), shape(&entity[..]));
        shapes.insert("user_persistence".to_string(), shape(&persistence[..]));

        let mut mappings = BTreeMap::new();
        mappings.insert(
            "from_persistence".to_string(),
            MappingConfig {
                source: "user_persistence".to_string(),
                target: "user_entity".to_string(),
                fields: pairs(&persistence[..], &entity[..]),
            },
        );
        mappings.insert(
            "to_persistence".to_string(),
            MappingConfig {
                source: "user_entity".to_string(),
                target: "user_persistence".to_string(),
                fields: pairs(&entity[..], &persistence[..]),
            },
        );

        Self {
            logging: LoggingConfig::default(),
            shapes,
            mappings,
        }
    }

    /// Check that every shape is well-formed and every mapping refers to
    /// declared shapes and fields.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut declared = BTreeMap::new();
        for (name, shape) in &self.shapes {
            declared.insert(name.as_str(), Self::definition(name, shape)?);
        }

        for (name, mapping) in &self.mappings {
            let source = declared
                .get(mapping.source.as_str())
                .ok_or_else(|| unknown_shape_in(name, &mapping.source))?;
            let target = declared
                .get(mapping.target.as_str())
                .ok_or_else(|| unknown_shape_in(name, &mapping.target))?;

            for (from, to) in &mapping.fields {
                if !source.fields().contains(from) {
                    return Err(AppError::Config(format!(
                        "Mapping '{}': field '{}' is not declared on shape '{}'",
                        name, from, mapping.source
                    )));
                }
                if !target.fields().contains(to) {
                    return Err(AppError::Config(format!(
                        "Mapping '{}': field '{}' is not declared on shape '{}'",
                        name, to, mapping.target
                    )));
                }
            }
        }

        Ok(())
    }

    /// Instrument every configured shape once.
    pub fn instrument_shapes(&self) -> Result<BTreeMap<String, InstrumentedShape>, AppError> {
        self.shapes
            .iter()
            .map(|(name, shape)| {
                let definition = Self::definition(name, shape)?;
                Ok((name.clone(), instrument(&definition)))
            })
            .collect()
    }

    fn definition(name: &str, shape: &ShapeConfig) -> Result<ShapeDefinition, AppError> {
        ShapeDefinition::new(name, shape.fields.clone()).map_err(|source| AppError::Track {
            shape: name.to_string(),
            source,
        })
    }
}

fn unknown_shape_in(mapping: &str, shape: &str) -> AppError {
    AppError::Config(format!(
        "Mapping '{}' refers to unknown shape '{}'",
        mapping, shape
    ))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_is_valid() {
        let config = AppConfig::builtin();
        assert!(config.validate().is_ok());
        assert_eq!(config.shapes.len(), 2);
        assert_eq!(config.mappings.len(), 2);
        assert_eq!(
            config.mappings["from_persistence"].fields["Birthday__c"],
            "birthday"
        );
    }

    #[test]
    fn parses_minimal_document() {
        let config = AppConfig::from_toml_str(
            r#"
            [shapes.point]
            fields = ["x", "y"]
            "#,
        )
        .expect("parse");

        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.shapes["point"].fields, vec!["x", "y"]);
        assert!(config.mappings.is_empty());
    }

    #[test]
    fn parses_json_log_format() {
        let config = AppConfig::from_toml_str(
            r#"
            [logging]
            format = "json"
            filter = "proptrack=debug"
            "#,
        )
        .expect("parse");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter, "proptrack=debug");
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = AppConfig::from_toml_str("[shapes.point]\nfeilds = [\"x\"]\n");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn rejects_duplicate_fields() {
        let result = AppConfig::from_toml_str("[shapes.point]\nfields = [\"x\", \"x\"]\n");
        assert!(matches!(result, Err(AppError::Track { .. })));
    }

    #[test]
    fn rejects_mapping_to_undeclared_field() {
        let result = AppConfig::from_toml_str(
            r#"
            [shapes.a]
            fields = ["x"]
            [shapes.b]
            fields = ["y"]
            [mappings.a_to_b]
            source = "a"
            target = "b"
            [mappings.a_to_b.fields]
            x = "z"
            "#,
        );
        match result {
            Err(AppError::Config(msg)) => assert!(msg.contains("'z'")),
            other => unreachable!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_mapping_to_unknown_shape() {
        let result = AppConfig::from_toml_str(
            r#"
            [shapes.a]
            fields = ["x"]
            [mappings.a_to_c]
            source = "a"
            target = "c"
            "#,
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn instruments_every_shape() {
        let shapes = AppConfig::builtin().instrument_shapes().expect("instrument");
        assert_eq!(
            shapes["user_entity"].fields().iter().collect::<Vec<_>>(),
            vec!["firstName", "lastName", "birthday", "username"]
        );
    }
}
