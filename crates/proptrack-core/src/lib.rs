//! # proptrack-core
//!
//! The completeness-tracking CORE of proptrack - THE LOGIC.
//!
//! This crate records, per declared field, whether an object's field has
//! ever been explicitly assigned, derives a completeness report from that
//! record, and enforces "result is fully populated" at the exit boundary of
//! functions that transform one shape into another.
//!
//! ## Components
//!
//! - **Field Instrumentation**: `FieldSet`, `AssignmentState`, runtime shapes
//!   (`ShapeDefinition` → `instrument` → `Record`) and static shapes
//!   (`tracked_shape!`)
//! - **Completeness Report**: `CompletenessReport`, `Tracked`
//! - **Enforcement Wrapper**: `enforce_completeness` → `Enforced`, `checked_call`, `Inspect`
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is synchronous: every check runs inline when the wrapped function returns
//! - Keeps state strictly per instance; nothing is shared but read-only FieldSets
//! - Validates declarations, never field values
//! - Has no "unset": a field once assigned stays assigned
//!
//! ```
//! use proptrack_core::{enforce_completeness_named, instrument, Record, ShapeDefinition};
//!
//! let shape = ShapeDefinition::new("point", ["x", "y"]).unwrap();
//! let points = instrument(&shape);
//!
//! let only_x = |x: i32| -> Record<i32> {
//!     let mut point = points.create();
//!     point.set("x", x);
//!     point
//! };
//!
//! let checked = enforce_completeness_named("only_x", only_x);
//! let err = checked.call(1).unwrap_err();
//! assert_eq!(err.missing_fields, vec!["y"]);
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod assignment;
pub mod enforce;
pub mod field_set;
mod macros;
pub mod primitives;
pub mod report;
pub mod shape;
pub mod types;

#[doc(hidden)]
pub use paste;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{FieldStatus, IncompleteObjectError, TrackError};

// =============================================================================
// RE-EXPORTS: Instrumentation
// =============================================================================

pub use assignment::AssignmentState;
pub use field_set::FieldSet;
pub use shape::{InstrumentedShape, Record, ShapeDefinition, instrument};

// =============================================================================
// RE-EXPORTS: Report & Enforcement
// =============================================================================

pub use enforce::{
    Enforced, Inspect, UntrackedReturnWarning, check_result, checked_call, enforce_completeness,
    enforce_completeness_named,
};
pub use report::{CompletenessReport, Tracked};
