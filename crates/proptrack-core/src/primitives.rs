//! # Primitives
//!
//! Hardcoded limits and constants for the proptrack CORE.
//!
//! These are compiled into the binary and are immutable at runtime.

/// Maximum length of a single declared field name, in bytes.
///
/// Declarations with longer names are rejected when the FieldSet is built.
pub const MAX_FIELD_NAME_LENGTH: usize = 256;

/// Maximum number of fields a single shape may declare.
pub const MAX_FIELD_COUNT: usize = 4096;

/// Separator used when joining missing field names for diagnostics.
pub const MISSING_FIELDS_SEPARATOR: &str = ", ";

/// `tracing` target for boundary diagnostics emitted by the enforcement wrapper.
pub const ENFORCE_LOG_TARGET: &str = "proptrack::enforce";

/// `tracing` target for instrumentation events.
pub const INSTRUMENT_LOG_TARGET: &str = "proptrack::instrument";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_is_comma_space() {
        assert_eq!(MISSING_FIELDS_SEPARATOR, ", ");
    }
}
