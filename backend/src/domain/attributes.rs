//! Tags and ingredients: named attributes a user attaches to recipes.
//!
//! Both share the same naming rules and ownership model, so they share
//! [`AttributeName`]. They stay distinct types with distinct ids.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{IngredientId, TagId, UserId};

/// Maximum length of a tag or ingredient name.
pub const ATTRIBUTE_NAME_MAX: usize = 255;

/// Validation errors for [`AttributeName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeNameError {
    /// Name was blank once trimmed.
    #[error("name must not be blank")]
    Empty,
    /// Name exceeded [`ATTRIBUTE_NAME_MAX`].
    #[error("name must be at most {max} characters")]
    TooLong { max: usize },
}

/// Trimmed, non-blank name of a tag or ingredient.
///
/// # Examples
/// ```
/// use backend::domain::AttributeName;
///
/// let name = AttributeName::new("  Vegan ").expect("valid name");
/// assert_eq!(name.as_ref(), "Vegan");
/// assert!(AttributeName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttributeName(String);

impl AttributeName {
    /// Validate a name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, AttributeNameError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AttributeNameError::Empty);
        }
        if trimmed.chars().count() > ATTRIBUTE_NAME_MAX {
            return Err(AttributeNameError::TooLong {
                max: ATTRIBUTE_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for AttributeName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AttributeName> for String {
    fn from(value: AttributeName) -> Self {
        value.0
    }
}

impl TryFrom<String> for AttributeName {
    type Error = AttributeNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Tag used to categorise recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Storage-assigned identifier.
    pub id: TagId,
    /// Owning user.
    pub owner: UserId,
    /// Display name.
    pub name: AttributeName,
}

/// Ingredient referenced by recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    /// Storage-assigned identifier.
    pub id: IngredientId,
    /// Owning user.
    pub owner: UserId,
    /// Display name.
    pub name: AttributeName,
}

/// Sort attributes the way list endpoints return them: name descending,
/// ties broken by newest id first.
pub fn sort_by_name_descending<T, K: Ord + Copy>(
    items: &mut [T],
    key: impl Fn(&T) -> (&AttributeName, K),
) {
    items.sort_by(|left, right| {
        let (left_name, left_id) = key(left);
        let (right_name, right_id) = key(right);
        right_name
            .cmp(left_name)
            .then_with(|| right_id.cmp(&left_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", AttributeNameError::Empty)]
    #[case(" \t ", AttributeNameError::Empty)]
    fn blank_names_are_rejected(#[case] raw: &str, #[case] expected: AttributeNameError) {
        assert_eq!(AttributeName::new(raw), Err(expected));
    }

    #[rstest]
    fn long_names_are_rejected() {
        assert_eq!(
            AttributeName::new("n".repeat(ATTRIBUTE_NAME_MAX + 1)),
            Err(AttributeNameError::TooLong {
                max: ATTRIBUTE_NAME_MAX
            })
        );
    }

    #[rstest]
    fn sorting_orders_names_descending() {
        let owner = UserId::random();
        let tag = |id: i64, name: &str| Tag {
            id: TagId::new(id).expect("id"),
            owner: owner.clone(),
            name: AttributeName::new(name).expect("name"),
        };
        let mut tags = vec![tag(1, "Dessert"), tag(2, "Vegan"), tag(3, "Breakfast")];

        sort_by_name_descending(&mut tags, |t| (&t.name, t.id));

        let names: Vec<&str> = tags.iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(names, ["Vegan", "Dessert", "Breakfast"]);
    }
}
