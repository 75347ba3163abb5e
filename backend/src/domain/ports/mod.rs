//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`RecipeImageStore`]) are implemented by
//! outbound adapters and expose their own error enums. Driving ports
//! ([`UserAccounts`], [`TokenAuthenticator`], [`TagService`],
//! [`IngredientService`], [`RecipeService`]) are what inbound adapters call;
//! they speak [`crate::domain::Error`].

mod macros;
pub(crate) use macros::define_port_error;

mod attribute_repository;
mod attribute_service;
mod auth_token_repository;
mod recipe_image_store;
mod recipe_repository;
mod recipe_service;
mod token_authenticator;
mod user_accounts;
mod user_repository;

#[cfg(test)]
pub use attribute_repository::{MockIngredientRepository, MockTagRepository};
pub use attribute_repository::{AttributeRepositoryError, IngredientRepository, TagRepository};
#[cfg(test)]
pub use attribute_service::{MockIngredientService, MockTagService};
pub use attribute_service::{IngredientService, TagService};
#[cfg(test)]
pub use auth_token_repository::MockAuthTokenRepository;
pub use auth_token_repository::{AuthTokenRepository, AuthTokenRepositoryError};
#[cfg(test)]
pub use recipe_image_store::MockRecipeImageStore;
pub use recipe_image_store::{ImageStoreError, RecipeImageStore};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use recipe_service::MockRecipeService;
pub use recipe_service::{ImageUpload, RecipeService};
#[cfg(test)]
pub use token_authenticator::MockTokenAuthenticator;
pub use token_authenticator::TokenAuthenticator;
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::{NewAccount, ProfileChanges, UserAccounts};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
