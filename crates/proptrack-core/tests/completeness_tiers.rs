//! # Completeness Tier Tests (T0-T3)
//!
//! ## Tiers
//! - T0: Instrumentation
//! - T1: Completeness Report
//! - T2: Enforcement Boundary
//! - T3: Mapper Scenarios

#![allow(clippy::unwrap_used, clippy::panic)]

use chrono::NaiveDate;
use proptrack_core::{
    IncompleteObjectError, Record, ShapeDefinition, Tracked, checked_call, enforce_completeness,
    enforce_completeness_named, instrument, tracked_shape,
};
use std::io;
use std::sync::{Arc, Mutex};

// =============================================================================
// SHAPES
// =============================================================================

tracked_shape! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct UserEntity {
        pub first_name: String,
        pub last_name: String,
        pub birthday: NaiveDate,
        pub username: String,
    }
}

tracked_shape! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct UserRow {
        pub first_name: String,
        pub last_name: String,
        pub birthday_c: NaiveDate,
        pub username_c: String,
    }
}

tracked_shape! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct MentorProfile {
        pub first_name: String,
        pub last_name: String,
        pub birthday: NaiveDate,
        pub username: String,
        pub mentoring_topics: Vec<String>,
    }
}

fn birthday() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 2, 1).unwrap()
}

fn sample_row() -> UserRow {
    UserRow::new()
        .with_first_name("John")
        .with_last_name("Doe")
        .with_birthday_c(birthday())
        .with_username_c("johndoe123")
}

fn from_row(row: &UserRow) -> UserEntity {
    let mut user = UserEntity::new();
    if let Some(v) = row.first_name() {
        user.set_first_name(v.clone());
    }
    if let Some(v) = row.last_name() {
        user.set_last_name(v.clone());
    }
    if let Some(v) = row.birthday_c() {
        user.set_birthday(*v);
    }
    if let Some(v) = row.username_c() {
        user.set_username(v.clone());
    }
    user
}

/// Forgets `mentoring_topics`.
fn mentor_from_row(row: &UserRow) -> MentorProfile {
    let mut mentor = MentorProfile::new();
    if let Some(v) = row.first_name() {
        mentor.set_first_name(v.clone());
    }
    if let Some(v) = row.last_name() {
        mentor.set_last_name(v.clone());
    }
    if let Some(v) = row.birthday_c() {
        mentor.set_birthday(*v);
    }
    if let Some(v) = row.username_c() {
        mentor.set_username(v.clone());
    }
    mentor
}

fn row_summary(row: &UserRow) -> String {
    format!("{:?}", row.username_c())
}

/// Captures formatted `tracing` output.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture.contents())
}

// =============================================================================
// TIER T0: INSTRUMENTATION
// =============================================================================

mod t0_instrumentation {
    use super::*;

    /// T0.1: A fresh instance misses its whole FieldSet, in order.
    #[test]
    fn fresh_instance_is_incomplete() {
        let user = UserEntity::new();
        assert!(!user.is_complete());
        assert_eq!(
            user.missing_fields(),
            vec!["first_name", "last_name", "birthday", "username"]
        );
    }

    /// T0.2: Writes do not alter values seen by ordinary readers.
    #[test]
    fn values_read_back_unchanged() {
        let row = sample_row();
        assert_eq!(row.first_name().map(String::as_str), Some("John"));
        assert_eq!(row.birthday_c(), Some(&birthday()));
    }

    /// T0.3: Each instance owns its own state.
    #[test]
    fn instances_do_not_share_state() {
        let mut a = UserEntity::new();
        let b = UserEntity::new();
        a.set_username("a");
        assert_eq!(a.missing_fields().len(), 3);
        assert_eq!(b.missing_fields().len(), 4);
    }
}

// =============================================================================
// TIER T1: COMPLETENESS REPORT
// =============================================================================

mod t1_report {
    use super::*;

    /// T1.1: Reports track interleaved writes and queries.
    #[test]
    fn report_is_recomputed_on_each_query() {
        let mut user = UserEntity::new();
        user.set_username("johndoe123");
        assert_eq!(
            user.missing_fields(),
            vec!["first_name", "last_name", "birthday"]
        );

        user.set_first_name("John");
        user.set_last_name("Doe");
        assert_eq!(user.missing_fields(), vec!["birthday"]);

        user.set_birthday(birthday());
        assert!(user.is_complete());
        assert_eq!(user.completeness().assigned(), 4);
    }

    /// T1.2: Re-assigning a field keeps it Set.
    #[test]
    fn reassignment_keeps_set() {
        let mut user = from_row(&sample_row());
        user.set_username("johndoe123");
        user.set_username("someone_else");
        assert!(user.is_complete());
        assert_eq!(user.username().map(String::as_str), Some("someone_else"));
    }
}

// =============================================================================
// TIER T2: ENFORCEMENT BOUNDARY
// =============================================================================

mod t2_enforcement {
    use super::*;

    /// T2.1: A complete result is returned field-for-field equal.
    #[test]
    fn complete_result_is_returned_equal() {
        let row = sample_row();
        let checked = enforce_completeness(from_row);

        let user = checked.call(&row).unwrap();
        assert_eq!(user, from_row(&row));
    }

    /// T2.2: An untracked result is returned unchanged with a warning.
    #[test]
    fn untracked_result_warns_and_passes() {
        let row = sample_row();
        let checked = enforce_completeness(row_summary);

        let (result, logs) = with_captured_logs(|| checked.call(&row));

        assert_eq!(result.unwrap(), row_summary(&row));
        assert!(logs.contains("WARN"));
        assert!(logs.contains("The function row_summary did not return an instrumented object"));
    }

    /// T2.3: A complete result emits no warning.
    #[test]
    fn complete_result_does_not_warn() {
        let row = sample_row();
        let checked = enforce_completeness(from_row);

        let (result, logs) = with_captured_logs(|| checked.call(&row));
        assert!(result.is_ok());
        assert!(logs.is_empty());
    }

    /// T2.4: Nested wrapped functions each check their own boundary.
    #[test]
    fn nested_boundaries_are_independent() {
        let inner = enforce_completeness(from_row);
        let outer = enforce_completeness_named(
            "outer",
            |row: &UserRow| -> Result<MentorProfile, IncompleteObjectError> {
                let user = inner.call(row)?;
                let mut mentor = MentorProfile::new();
                if let Some(name) = user.first_name() {
                    mentor.set_first_name(name.clone());
                }
                Ok(mentor)
            },
        );

        // Incomplete source: the inner boundary fails and `?` carries it out.
        let partial = UserRow::new().with_first_name("John");
        let err = outer.try_call(&partial).unwrap_err();
        assert_eq!(err.function_name, "from_row");
        assert_eq!(err.missing_fields, vec!["last_name", "birthday", "username"]);

        // Complete source: the inner boundary passes, the outer one fails.
        let err = outer.try_call(&sample_row()).unwrap_err();
        assert_eq!(err.function_name, "outer");
        assert_eq!(
            err.missing_fields,
            vec!["last_name", "birthday", "username", "mentoring_topics"]
        );
    }

    /// T2.5: The failure is deterministic across repeated calls.
    #[test]
    fn failure_repeats_identically() {
        let checked = enforce_completeness(mentor_from_row);
        let row = sample_row();
        let first = checked.call(&row).unwrap_err();
        let second = checked.call(&row).unwrap_err();
        assert_eq!(first, second);
    }

    /// T2.6: A wrapper accepts borrows of any lifetime, like the function it wraps.
    #[test]
    fn wrapper_outlives_its_arguments() {
        let checked = enforce_completeness(from_row);

        let later = sample_row();
        assert!(checked.call(&later).is_ok());
        assert!(checked.call(&sample_row()).is_ok());

        let rows = vec![sample_row(), UserRow::new()];
        let results: Vec<_> = rows.iter().map(|row| checked.call(row)).collect();
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().missing_fields.len(), 4);
    }
}

// =============================================================================
// TIER T3: MAPPER SCENARIOS
// =============================================================================

mod t3_scenarios {
    use super::*;

    /// Scenario A with runtime shapes and the original column names.
    #[test]
    fn scenario_a_field_for_field_mapping() {
        let source_shape = instrument(
            &ShapeDefinition::new(
                "user_persistence",
                ["FirstName", "LastName", "Birthday__c", "Username__c"],
            )
            .unwrap(),
        );
        let target_shape = instrument(
            &ShapeDefinition::new(
                "user_entity",
                ["firstName", "lastName", "birthday", "username"],
            )
            .unwrap(),
        );

        let source: Record<String> = source_shape.create_from([
            ("FirstName", "John".to_string()),
            ("LastName", "Doe".to_string()),
            ("Birthday__c", birthday().to_string()),
            ("Username__c", "johndoe123".to_string()),
        ]);
        assert!(source.is_complete());

        let pairs = [
            ("FirstName", "firstName"),
            ("LastName", "lastName"),
            ("Birthday__c", "birthday"),
            ("Username__c", "username"),
        ];
        let map = |src: &Record<String>| {
            let mut target = target_shape.create();
            for (from, to) in pairs {
                if let Some(value) = src.get(from) {
                    target.set(to, value.clone());
                }
            }
            target
        };

        let expected = map(&source);
        assert!(expected.is_complete());

        let checked = enforce_completeness_named("from_persistence", map);
        let target = checked.call(&source).unwrap();
        assert_eq!(target, expected);
        assert_eq!(target.get("birthday").map(String::as_str), Some("1990-02-01"));
    }

    /// Scenario A with static shapes.
    #[test]
    fn scenario_a_static_shapes() {
        let user = enforce_completeness(from_row).call(&sample_row()).unwrap();
        assert_eq!(user.birthday(), Some(&birthday()));
        assert_eq!(user.username().map(String::as_str), Some("johndoe123"));
    }

    /// Scenario B: five declared fields, four assigned.
    #[test]
    fn scenario_b_one_field_omitted() {
        let checked = enforce_completeness(mentor_from_row);
        let err = checked.call(&sample_row()).unwrap_err();

        assert_eq!(
            err,
            IncompleteObjectError::new("mentor_from_row", vec!["mentoring_topics".to_string()])
        );
        assert!(err.to_string().ends_with("the following are not set: mentoring_topics"));
    }

    /// The manual checked-call form behaves like the wrapper.
    #[test]
    fn checked_call_matches_wrapper() {
        let row = sample_row();
        let manual = checked_call("mentor_from_row", || mentor_from_row(&row));
        let wrapped = enforce_completeness(mentor_from_row).call(&row);
        assert_eq!(manual, wrapped);
    }
}
