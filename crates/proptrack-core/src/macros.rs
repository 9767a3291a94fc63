//! # Static Shapes
//!
//! `tracked_shape!` turns one struct declaration into an instrumented type.
//! The field list is the single source for the struct's storage, its
//! accessors, and its FieldSet, so the three cannot drift apart.
//!
//! For every field `name: T` the macro generates:
//! - `name(&self) -> Option<&T>`
//! - `set_name(&mut self, impl Into<T>) -> Option<T>` (marks the field Set)
//! - `with_name(self, impl Into<T>) -> Self`
//!
//! Storage fields are always private; the visibility written on a field
//! applies to its accessors. Writing through the setter is the only way to
//! change a value, so every write is observed.
//!
//! ## Limitation
//!
//! Accessors exist only for the fields in the declaration. There is no
//! by-name write on these types, so a field that is not declared cannot be
//! stored or tracked. Shapes whose fields are only known at runtime use
//! `ShapeDefinition` and `Record` instead.
//!
//! Do not derive `Default` on a tracked shape; the macro provides it.
//!
//! ```
//! proptrack_core::tracked_shape! {
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub struct Account {
//!         pub id: u64,
//!         pub owner: String,
//!     }
//! }
//!
//! use proptrack_core::Tracked;
//!
//! let mut account = Account::new();
//! account.set_id(7_u64);
//! assert_eq!(account.missing_fields(), vec!["owner"]);
//! account.set_owner("ada");
//! assert!(account.is_complete());
//! ```

/// Declare a struct whose field assignments are tracked.
///
/// See the module documentation for the generated API.
#[macro_export]
macro_rules! tracked_shape {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $crate::paste::paste! {
            $(#[$meta])*
            $vis struct $name {
                $(
                    $(#[$field_meta])*
                    $field: ::core::option::Option<$ty>,
                )*
                __assignments: $crate::AssignmentState,
            }

            #[allow(non_camel_case_types, dead_code)]
            enum [<__ $name Field>] {
                $( $field, )*
            }

            const _: () = {
                assert!(
                    $name::FIELD_NAMES.len() <= $crate::primitives::MAX_FIELD_COUNT,
                    "tracked_shape: too many fields"
                );
                $(
                    assert!(
                        stringify!($field).len() <= $crate::primitives::MAX_FIELD_NAME_LENGTH,
                        "tracked_shape: field name too long"
                    );
                )*
            };

            #[allow(dead_code)]
            impl $name {
                /// Declared field names, in declaration order.
                pub const FIELD_NAMES: &'static [&'static str] = &[$(stringify!($field)),*];

                /// Create an instance with every declared field unset.
                pub fn new() -> Self {
                    Self {
                        $( $field: ::core::option::Option::None, )*
                        __assignments: $crate::AssignmentState::new(Self::FIELD_NAMES.len()),
                    }
                }

                /// The FieldSet shared by every instance of this shape.
                pub fn declared_fields() -> &'static $crate::FieldSet {
                    static FIELDS: ::std::sync::OnceLock<$crate::FieldSet> =
                        ::std::sync::OnceLock::new();
                    FIELDS.get_or_init(|| $crate::FieldSet::from_struct_fields($name::FIELD_NAMES))
                }

                $(
                    #[doc = concat!("Current value of `", stringify!($field), "`, if ever assigned.")]
                    $field_vis fn $field(&self) -> ::core::option::Option<&$ty> {
                        self.$field.as_ref()
                    }

                    #[doc = concat!("Assign `", stringify!($field), "` and return the previous value.")]
                    $field_vis fn [<set_ $field>](
                        &mut self,
                        value: impl ::core::convert::Into<$ty>,
                    ) -> ::core::option::Option<$ty> {
                        self.__assignments.mark([<__ $name Field>]::$field as usize);
                        self.$field.replace(value.into())
                    }

                    #[doc = concat!("Builder form of `set_", stringify!($field), "`.")]
                    #[allow(dead_code)]
                    #[must_use]
                    $field_vis fn [<with_ $field>](
                        mut self,
                        value: impl ::core::convert::Into<$ty>,
                    ) -> Self {
                        self.[<set_ $field>](value);
                        self
                    }
                )*
            }

            impl ::core::default::Default for $name {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl $crate::Tracked for $name {
                fn field_set(&self) -> &$crate::FieldSet {
                    Self::declared_fields()
                }

                fn assignment_state(&self) -> &$crate::AssignmentState {
                    &self.__assignments
                }
            }

            impl $crate::Inspect for $name {
                fn report(&self) -> ::core::option::Option<$crate::CompletenessReport> {
                    ::core::option::Option::Some($crate::Tracked::completeness(self))
                }
            }
        }
    };
}

/// Mark types as deliberately untracked.
///
/// The enforcement wrapper accepts their values unchanged and logs an
/// `UntrackedReturnWarning` for them.
#[macro_export]
macro_rules! untracked {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Inspect for $ty {
                fn report(&self) -> ::core::option::Option<$crate::CompletenessReport> {
                    ::core::option::Option::None
                }
            }
        )+
    };
}

// =============================================================================
// TESTS
// =============================================================================
