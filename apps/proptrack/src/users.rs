//! # User Mapper
//!
//! The user entity ↔ persistence mapping on static tracked shapes.
//!
//! `UserMapper`'s functions are ordinary transformations. They know nothing
//! about completeness; callers wrap them with `enforce_completeness`.

use chrono::NaiveDate;
use proptrack_core::tracked_shape;

tracked_shape! {
    /// A user as the domain sees it.
    #[derive(Debug, Clone, PartialEq)]
    pub struct UserEntityProps {
        pub first_name: String,
        pub last_name: String,
        pub birthday: NaiveDate,
        pub username: String,
    }
}

tracked_shape! {
    /// A user as the storage row sees it.
    #[derive(Debug, Clone, PartialEq)]
    pub struct UserPersistenceProps {
        pub first_name: String,
        pub last_name: String,
        pub birthday_c: NaiveDate,
        pub username_c: String,
    }
}

tracked_shape! {
    /// A user entity extended with mentoring topics.
    ///
    /// `UserMapper::mentor_from_persistence` never assigns `mentoring_topics`.
    #[derive(Debug, Clone, PartialEq)]
    pub struct MentorEntityProps {
        pub first_name: String,
        pub last_name: String,
        pub birthday: NaiveDate,
        pub username: String,
        pub mentoring_topics: Vec<String>,
    }
}

/// Transformations between user shapes.
pub struct UserMapper;

impl UserMapper {
    /// Storage row → entity.
    pub fn from_persistence(persisted: &UserPersistenceProps) -> UserEntityProps {
        let mut user = UserEntityProps::new();
        if let Some(v) = persisted.first_name() {
            user.set_first_name(v.clone());
        }
        if let Some(v) = persisted.last_name() {
            user.set_last_name(v.clone());
        }
        if let Some(v) = persisted.birthday_c() {
            user.set_birthday(*v);
        }
        if let Some(v) = persisted.username_c() {
            user.set_username(v.clone());
        }
        user
    }

    /// Entity → storage row.
    pub fn to_persistence(user: &UserEntityProps) -> UserPersistenceProps {
        let mut persisted = UserPersistenceProps::new();
        if let Some(v) = user.first_name() {
            persisted.set_first_name(v.clone());
        }
        if let Some(v) = user.last_name() {
            persisted.set_last_name(v.clone());
        }
        if let Some(v) = user.birthday() {
            persisted.set_birthday_c(*v);
        }
        if let Some(v) = user.username() {
            persisted.set_username_c(v.clone());
        }
        persisted
    }

    /// Storage row → mentor entity. Leaves `mentoring_topics` unset.
    pub fn mentor_from_persistence(persisted: &UserPersistenceProps) -> MentorEntityProps {
        let mut mentor = MentorEntityProps::new();
        if let Some(v) = persisted.first_name() {
            mentor.set_first_name(v.clone());
        }
        if let Some(v) = persisted.last_name() {
            mentor.set_last_name(v.clone());
        }
        if let Some(v) = persisted.birthday_c() {
            mentor.set_birthday(*v);
        }
        if let Some(v) = persisted.username_c() {
            mentor.set_username(v.clone());
        }
        mentor
    }
}

/// The sample user: John Doe, born 1990-02-01.
pub fn sample_user() -> UserEntityProps {
    let mut user = UserEntityProps::new();
    user.set_first_name("John");
    user.set_last_name("Doe");
    if let Some(birthday) = NaiveDate::from_ymd_opt(1990, 2, 1) {
        user.set_birthday(birthday);
    }
    user.set_username("johndoe123");
    user
}

/// JSON view of a user entity, for output.
pub fn entity_json(user: &UserEntityProps) -> serde_json::Value {
    serde_json::json!({
        "first_name": user.first_name(),
        "last_name": user.last_name(),
        "birthday": user.birthday().map(|d| d.to_string()),
        "username": user.username(),
    })
}

/// JSON view of a storage row, for output.
pub fn persistence_json(row: &UserPersistenceProps) -> serde_json::Value {
    serde_json::json!({
        "first_name": row.first_name(),
        "last_name": row.last_name(),
        "birthday_c": row.birthday_c().map(|d| d.to_string()),
        "username_c": row.username_c(),
    })
}

// =============================================================================
// TESTS
// =============================================================================
