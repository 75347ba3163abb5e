//! Database-assigned identifiers for recipe resources.
//!
//! Tags, ingredients and recipes use positive 64-bit keys generated by
//! storage. Each gets its own newtype so a tag id can never be passed where a
//! recipe id is expected.

use std::fmt;

/// Error raised when an identifier is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be a positive integer, got {value}")]
pub struct InvalidIdError {
    /// Rejected value.
    pub value: i64,
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Validate a raw key.
            pub const fn new(value: i64) -> Result<Self, InvalidIdError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(InvalidIdError { value })
                }
            }

            /// Raw key for storage queries.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = InvalidIdError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

define_entity_id! {
    /// Identifier of a [`crate::domain::Tag`].
    TagId
}

define_entity_id! {
    /// Identifier of a [`crate::domain::Ingredient`].
    IngredientId
}

define_entity_id! {
    /// Identifier of a [`crate::domain::Recipe`].
    RecipeId
}
