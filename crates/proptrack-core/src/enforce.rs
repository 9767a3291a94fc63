//! # Enforcement Wrapper
//!
//! Completeness checks at the exit boundary of a transformation.
//!
//! The wrapped function's body is never touched. After it returns, its value
//! is inspected:
//! - instrumented and complete → returned unchanged
//! - instrumented and incomplete → `IncompleteObjectError`, no value
//! - not instrumented → `UntrackedReturnWarning` logged, value returned unchanged
//!
//! Each wrapped function checks its own boundary, so nesting wrapped
//! functions checks every level independently.

use crate::primitives::ENFORCE_LOG_TARGET;
use crate::{CompletenessReport, IncompleteObjectError, Record, Tracked};
use std::any::type_name;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// INSPECT TRAIT
// =============================================================================

/// Anything the enforcement wrapper can inspect at a boundary.
///
/// Instrumented types answer `Some(report)`. Everything else answers `None`
/// and is passed through with a warning. Implement it for your own untracked
/// types with `untracked!`.
pub trait Inspect {
    /// The current completeness report, or `None` if not instrumented.
    fn report(&self) -> Option<CompletenessReport>;
}

impl<V> Inspect for Record<V> {
    fn report(&self) -> Option<CompletenessReport> {
        Some(Tracked::completeness(self))
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn report(&self) -> Option<CompletenessReport> {
        self.as_ref().and_then(Inspect::report)
    }
}

// Pointers report whatever they point at.
impl<T: Inspect + ?Sized> Inspect for &T {
    fn report(&self) -> Option<CompletenessReport> {
        (**self).report()
    }
}

impl<T: Inspect + ?Sized> Inspect for Box<T> {
    fn report(&self) -> Option<CompletenessReport> {
        (**self).report()
    }
}

impl<T: Inspect + ?Sized> Inspect for Rc<T> {
    fn report(&self) -> Option<CompletenessReport> {
        (**self).report()
    }
}

impl<T: Inspect + ?Sized> Inspect for Arc<T> {
    fn report(&self) -> Option<CompletenessReport> {
        (**self).report()
    }
}

crate::untracked!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    str,
    String,
    PathBuf,
    Duration,
);

/// Generic std containers: never instrumented themselves.
macro_rules! untracked_generic {
    ($( [$($generics:tt)*] $ty:ty ),+ $(,)?) => {
        $(
            impl<$($generics)*> Inspect for $ty {
                fn report(&self) -> Option<CompletenessReport> {
                    None
                }
            }
        )+
    };
}

untracked_generic!(
    [T] [T],
    [T, const N: usize] [T; N],
    [T] Vec<T>,
    [T] VecDeque<T>,
    [T] BTreeSet<T>,
    [K, V] BTreeMap<K, V>,
    [T, S] HashSet<T, S>,
    [K, V, S] HashMap<K, V, S>,
    [A] (A,),
    [A, B] (A, B),
    [A, B, C] (A, B, C),
    [A, B, C, D] (A, B, C, D),
    [A, B, C, D, E] (A, B, C, D, E),
    [A, B, C, D, E, G] (A, B, C, D, E, G),
);

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// Non-fatal signal that a checked function returned an uninstrumented value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntrackedReturnWarning {
    /// Name of the wrapped function.
    pub function_name: String,
}

impl UntrackedReturnWarning {
    /// Create a warning for `function_name`.
    #[must_use]
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
        }
    }

    /// Log the warning on the `proptrack::enforce` target.
    pub fn emit(&self) {
        tracing::warn!(
            target: ENFORCE_LOG_TARGET,
            function = %self.function_name,
            "{}",
            self
        );
    }
}

impl fmt::Display for UntrackedReturnWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The function {} did not return an instrumented object. \
             You probably forgot to instrument its return type.",
            self.function_name
        )
    }
}

// =============================================================================
// BOUNDARY CHECKS
// =============================================================================

/// Check `value` as the result of `function_name`.
///
/// This is the single boundary rule every other entry point delegates to.
pub fn check_result<R: Inspect>(function_name: &str, value: R) -> Result<R, IncompleteObjectError> {
    match value.report() {
        Some(report) if !report.is_complete => {
            tracing::debug!(
                target: ENFORCE_LOG_TARGET,
                function = function_name,
                missing = report.missing_fields.len(),
                "rejected incomplete result"
            );
            Err(IncompleteObjectError::new(
                function_name,
                report.missing_fields,
            ))
        }
        Some(report) => {
            tracing::debug!(
                target: ENFORCE_LOG_TARGET,
                function = function_name,
                fields = report.declared,
                "accepted complete result"
            );
            Ok(value)
        }
        None => {
            UntrackedReturnWarning::new(function_name).emit();
            Ok(value)
        }
    }
}

/// Run `f` and check its result as `function_name`.
///
/// The manual form of the wrapper, for call sites that do not keep a
/// wrapped function around.
pub fn checked_call<R, F>(function_name: &str, f: F) -> Result<R, IncompleteObjectError>
where
    R: Inspect,
    F: FnOnce() -> R,
{
    check_result(function_name, f())
}

/// Wrap `f` so every call checks its result.
///
/// The reported function name is taken from `f`'s type, which for a
/// function item is its path (`UserMapper::from_persistence` reports
/// `from_persistence`). Closures report the enclosing function; use
/// `enforce_completeness_named` to choose a name.
pub fn enforce_completeness<F>(f: F) -> Enforced<F> {
    enforce_completeness_named(function_name_of::<F>(), f)
}

/// Wrap `f` under an explicit name.
pub fn enforce_completeness_named<F>(function_name: impl Into<String>, f: F) -> Enforced<F> {
    Enforced {
        function_name: function_name.into(),
        f,
    }
}

/// A function whose results are checked at its exit boundary.
///
/// `call` accepts exactly what `f` accepts. For a function item taking
/// `&T`, that is a borrow of any lifetime, created before or after the
/// wrapper.
#[derive(Debug, Clone)]
pub struct Enforced<F> {
    function_name: String,
    f: F,
}

impl<F> Enforced<F> {
    /// Name reported in errors and warnings.
    #[must_use]
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Call the wrapped function and check its result.
    pub fn call<A, R>(&self, arg: A) -> Result<R, IncompleteObjectError>
    where
        F: Fn(A) -> R,
        R: Inspect,
    {
        check_result(&self.function_name, (self.f)(arg))
    }

    /// Call a fallible wrapped function and check its `Ok` value.
    ///
    /// Errors from `f` pass through untouched; an incomplete value becomes
    /// `E::from(IncompleteObjectError)`. Wrapped functions can call each
    /// other with `?` and each boundary is still checked on its own.
    pub fn try_call<A, R, E>(&self, arg: A) -> Result<R, E>
    where
        F: Fn(A) -> Result<R, E>,
        R: Inspect,
        E: From<IncompleteObjectError>,
    {
        let value = (self.f)(arg)?;
        check_result(&self.function_name, value).map_err(E::from)
    }
}

/// Name of the function `F` stands for.
///
/// The last `::` segment outside any `<...>` group, without generic
/// arguments. Closure segments are skipped.
///
/// `a::Mapper<u8>::to_row` → `to_row`; `<a::P as a::T>::build` → `build`;
/// `a::b::run::{{closure}}` → `run`.
fn function_name_of<F>() -> String {
    let full = type_name::<F>();
    top_level_segments(full)
        .into_iter()
        .rev()
        .find(|segment| {
            !segment.is_empty() && !segment.starts_with('{') && !segment.starts_with('<')
        })
        .and_then(|segment| segment.split('<').next())
        .unwrap_or(full)
        .to_string()
}

/// Split a type path on `::` at generic depth zero.
fn top_level_segments(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            // `->` inside fn pointer arguments
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&path[start..]);
    segments
}

// =============================================================================
// TESTS
// =============================================================================
