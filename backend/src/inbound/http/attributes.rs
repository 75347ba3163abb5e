//! Request and response shapes shared by the tag and ingredient endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{AttributeName, Error, Ingredient, Tag};
use crate::inbound::http::validation::{FieldName, invalid_field_error, require};

const NAME: FieldName = FieldName::new("name");
const ASSIGNED_ONLY: FieldName = FieldName::new("assigned_only");

/// Body for creating a tag or ingredient.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct AttributeRequest {
    /// Tag or ingredient name.
    #[schema(example = "Vegan")]
    pub name: Option<String>,
}

impl AttributeRequest {
    pub(crate) fn into_name(self) -> Result<AttributeName, Error> {
        let raw = require(self.name, NAME)?;
        AttributeName::new(raw).map_err(|err| invalid_field_error(NAME, err))
    }
}

/// A tag or ingredient as returned to its owner.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttributeResponse {
    /// Identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Name as stored.
    #[schema(example = "Vegan")]
    pub name: String,
}

impl From<Tag> for AttributeResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id.get(),
            name: tag.name.into(),
        }
    }
}

impl From<Ingredient> for AttributeResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id.get(),
            name: ingredient.name.into(),
        }
    }
}

/// Query string accepted by the list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssignedOnlyQuery {
    /// `1` keeps only entries attached to at least one recipe.
    #[param(example = "1")]
    pub assigned_only: Option<String>,
}

impl AssignedOnlyQuery {
    pub(crate) fn flag(&self) -> Result<bool, Error> {
        match self.assigned_only.as_deref().map(str::trim) {
            None | Some("" | "0" | "false") => Ok(false),
            Some("1" | "true") => Ok(true),
            Some(_) => Err(invalid_field_error(
                ASSIGNED_ONLY,
                "assigned_only must be 0 or 1",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(None, false)]
    #[case(Some("0"), false)]
    #[case(Some("1"), true)]
    #[case(Some("true"), true)]
    fn assigned_only_accepts_numeric_and_boolean_flags(
        #[case] raw: Option<&str>,
        #[case] expected: bool,
    ) {
        let query = AssignedOnlyQuery {
            assigned_only: raw.map(str::to_owned),
        };

        assert_eq!(query.flag().expect("valid flag"), expected);
    }

    #[rstest]
    fn assigned_only_rejects_other_values() {
        let query = AssignedOnlyQuery {
            assigned_only: Some("yes please".to_owned()),
        };

        assert_eq!(
            query.flag().expect_err("invalid flag").code(),
            ErrorCode::InvalidRequest
        );
    }

    #[rstest]
    #[case(AttributeRequest { name: None })]
    #[case(AttributeRequest { name: Some("   ".to_owned()) })]
    fn blank_or_missing_names_are_rejected(#[case] request: AttributeRequest) {
        let error = request.into_name().expect_err("invalid name");

        assert_eq!(
            error.details().and_then(|d| d.get("field")),
            Some(&serde_json::json!("name"))
        );
    }
}
