//! # proptrack
//!
//! The proptrack application: configuration, runtime field mappings, the
//! static user mapper, and the CLI. Every transformation here runs behind
//! the `proptrack-core` completeness boundary.

pub mod cli;
pub mod config;
pub mod error;
pub mod mapping;
pub mod users;

pub use config::{AppConfig, LogFormat, LoggingConfig};
pub use error::AppError;
pub use mapping::{FieldMapping, JsonRecord, ShapeRegistry, record_from_json};
