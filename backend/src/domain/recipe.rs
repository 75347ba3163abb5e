//! Recipes and the value types they are built from.
//!
//! A recipe belongs to one user and may reference that user's tags and
//! ingredients. Prices are held as integer cents so arithmetic and storage
//! stay exact; the wire form is a two-decimal string such as `"5.50"`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use super::{Ingredient, IngredientId, RecipeId, Tag, TagId, UserId};

/// Maximum length of a recipe title.
pub const RECIPE_TITLE_MAX: usize = 255;
/// Maximum length of a recipe link.
pub const RECIPE_LINK_MAX: usize = 255;
/// Largest price accepted, in cents (999.99).
pub const PRICE_MAX_CENTS: u32 = 99_999;

/// Validation errors raised by recipe value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeValidationError {
    /// Title was blank.
    #[error("title must not be blank")]
    EmptyTitle,
    /// Title exceeded [`RECIPE_TITLE_MAX`].
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    /// Preparation time was zero.
    #[error("time_minutes must be at least 1")]
    NonPositiveTime,
    /// Preparation time does not fit storage.
    #[error("time_minutes is too large")]
    TimeTooLarge,
    /// Price text was not a decimal with at most two places.
    #[error("price must be a decimal number with at most two decimal places")]
    MalformedPrice,
    /// Price exceeded [`PRICE_MAX_CENTS`].
    #[error("price must not exceed 999.99")]
    PriceTooLarge,
    /// Link exceeded [`RECIPE_LINK_MAX`].
    #[error("link must be at most {max} characters")]
    LinkTooLong { max: usize },
}

/// Non-blank recipe title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeTitle(String);

impl RecipeTitle {
    /// Validate a title, trimming surrounding whitespace.
    pub fn new(title: impl AsRef<str>) -> Result<Self, RecipeValidationError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RecipeValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > RECIPE_TITLE_MAX {
            return Err(RecipeValidationError::TitleTooLong {
                max: RECIPE_TITLE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RecipeTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Preparation time in whole minutes, at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CookingTime(u32);

impl CookingTime {
    /// Validate a preparation time.
    pub fn new(minutes: i64) -> Result<Self, RecipeValidationError> {
        if minutes < 1 {
            return Err(RecipeValidationError::NonPositiveTime);
        }
        i32::try_from(minutes)
            .ok()
            .and_then(|value| u32::try_from(value).ok())
            .map(Self)
            .ok_or(RecipeValidationError::TimeTooLarge)
    }

    /// Minutes as an unsigned integer.
    pub const fn minutes(self) -> u32 {
        self.0
    }
}

/// Price in cents between 0 and 999.99.
///
/// # Examples
/// ```
/// use backend::domain::Price;
///
/// let price: Price = "5.5".parse().expect("valid price");
/// assert_eq!(price.cents(), 550);
/// assert_eq!(price.to_string(), "5.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(u32);

#[expect(
    clippy::expect_used,
    reason = "literal pattern is covered by the price parsing tests"
)]
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<whole>\d{1,3})(?:\.(?P<frac>\d{1,2}))?$").expect("valid price pattern")
});

impl Price {
    /// Construct from cents.
    pub fn from_cents(cents: u32) -> Result<Self, RecipeValidationError> {
        if cents > PRICE_MAX_CENTS {
            return Err(RecipeValidationError::PriceTooLarge);
        }
        Ok(Self(cents))
    }

    /// Amount in cents.
    pub const fn cents(self) -> u32 {
        self.0
    }
}

impl FromStr for Price {
    type Err = RecipeValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let Some(captures) = PRICE_RE.captures(trimmed) else {
            let digits_before_point = trimmed.split('.').next().unwrap_or_default();
            if !digits_before_point.is_empty()
                && digits_before_point.bytes().all(|b| b.is_ascii_digit())
                && digits_before_point.len() > 3
            {
                return Err(RecipeValidationError::PriceTooLarge);
            }
            return Err(RecipeValidationError::MalformedPrice);
        };

        let whole: u32 = captures
            .name("whole")
            .map(|m| m.as_str())
            .unwrap_or_default()
            .parse()
            .map_err(|_| RecipeValidationError::MalformedPrice)?;
        let frac: u32 = match captures.name("frac").map(|m| m.as_str()) {
            None => 0,
            Some(digits) if digits.len() == 1 => digits
                .parse::<u32>()
                .map_err(|_| RecipeValidationError::MalformedPrice)?
                .saturating_mul(10),
            Some(digits) => digits
                .parse()
                .map_err(|_| RecipeValidationError::MalformedPrice)?,
        };

        Self::from_cents(whole.saturating_mul(100).saturating_add(frac))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Optional external link; empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeLink(String);

impl RecipeLink {
    /// Validate a link, trimming surrounding whitespace.
    pub fn new(link: impl AsRef<str>) -> Result<Self, RecipeValidationError> {
        let trimmed = link.as_ref().trim();
        if trimmed.chars().count() > RECIPE_LINK_MAX {
            return Err(RecipeValidationError::LinkTooLong {
                max: RECIPE_LINK_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RecipeLink {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Stored recipe with its attributes resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Storage-assigned identifier.
    pub id: RecipeId,
    /// Owning user.
    pub owner: UserId,
    /// Title.
    pub title: RecipeTitle,
    /// Preparation time.
    pub time_minutes: CookingTime,
    /// Price.
    pub price: Price,
    /// External link, possibly empty.
    pub link: RecipeLink,
    /// Attached tags ordered by id.
    pub tags: Vec<Tag>,
    /// Attached ingredients ordered by id.
    pub ingredients: Vec<Ingredient>,
    /// Relative media path of the uploaded image.
    pub image: Option<String>,
}

impl Recipe {
    /// Snapshot of the writable fields, used as the base for updates.
    pub fn to_draft(&self) -> RecipeDraft {
        RecipeDraft {
            title: self.title.clone(),
            time_minutes: self.time_minutes,
            price: self.price,
            link: self.link.clone(),
            tags: self.tags.iter().map(|tag| tag.id).collect(),
            ingredients: self
                .ingredients
                .iter()
                .map(|ingredient| ingredient.id)
                .collect(),
        }
    }
}

/// Complete set of writable recipe fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    /// Title.
    pub title: RecipeTitle,
    /// Preparation time.
    pub time_minutes: CookingTime,
    /// Price.
    pub price: Price,
    /// External link.
    pub link: RecipeLink,
    /// Tags to attach.
    pub tags: Vec<TagId>,
    /// Ingredients to attach.
    pub ingredients: Vec<IngredientId>,
}

impl RecipeDraft {
    /// Remove duplicate attribute ids while keeping first-seen order.
    pub fn dedup_attributes(mut self) -> Self {
        dedup_in_place(&mut self.tags);
        dedup_in_place(&mut self.ingredients);
        self
    }
}

fn dedup_in_place<T: Ord + Copy>(ids: &mut Vec<T>) {
    let mut seen = std::collections::BTreeSet::new();
    ids.retain(|id| seen.insert(*id));
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeChanges {
    /// New title.
    pub title: Option<RecipeTitle>,
    /// New preparation time.
    pub time_minutes: Option<CookingTime>,
    /// New price.
    pub price: Option<Price>,
    /// New link.
    pub link: Option<RecipeLink>,
    /// Replacement tag set.
    pub tags: Option<Vec<TagId>>,
    /// Replacement ingredient set.
    pub ingredients: Option<Vec<IngredientId>>,
}

impl RecipeChanges {
    /// Apply the changes on top of `base`.
    pub fn apply_to(self, base: RecipeDraft) -> RecipeDraft {
        RecipeDraft {
            title: self.title.unwrap_or(base.title),
            time_minutes: self.time_minutes.unwrap_or(base.time_minutes),
            price: self.price.unwrap_or(base.price),
            link: self.link.unwrap_or(base.link),
            tags: self.tags.unwrap_or(base.tags),
            ingredients: self.ingredients.unwrap_or(base.ingredients),
        }
    }
}

/// Recipe list filter. A recipe matches when it carries any listed tag and
/// any listed ingredient; empty lists do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Tag ids, any of which must be attached.
    pub tags: Vec<TagId>,
    /// Ingredient ids, any of which must be attached.
    pub ingredients: Vec<IngredientId>,
}

impl RecipeFilter {
    /// Whether `recipe` satisfies the filter.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let tag_match =
            self.tags.is_empty() || recipe.tags.iter().any(|tag| self.tags.contains(&tag.id));
        let ingredient_match = self.ingredients.is_empty()
            || recipe
                .ingredients
                .iter()
                .any(|ingredient| self.ingredients.contains(&ingredient.id));
        tag_match && ingredient_match
    }
}
