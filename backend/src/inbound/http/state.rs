//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    IngredientService, RecipeService, TagService, TokenAuthenticator, UserAccounts,
};

/// Default public prefix for uploaded media.
pub const DEFAULT_MEDIA_URL: &str = "/media/";

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Registration, login and profile use-cases.
    pub accounts: Arc<dyn UserAccounts>,
    /// Resolves `Authorization` tokens to users.
    pub authenticator: Arc<dyn TokenAuthenticator>,
    /// Tag use-cases.
    pub tags: Arc<dyn TagService>,
    /// Ingredient use-cases.
    pub ingredients: Arc<dyn IngredientService>,
    /// Recipe and image use-cases.
    pub recipes: Arc<dyn RecipeService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login and profile use-cases.
    pub accounts: Arc<dyn UserAccounts>,
    /// Resolves `Authorization` tokens to users.
    pub authenticator: Arc<dyn TokenAuthenticator>,
    /// Tag use-cases.
    pub tags: Arc<dyn TagService>,
    /// Ingredient use-cases.
    pub ingredients: Arc<dyn IngredientService>,
    /// Recipe and image use-cases.
    pub recipes: Arc<dyn RecipeService>,
    media_url: String,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, DEFAULT_MEDIA_URL)
    }
}

impl HttpState {
    /// Construct state from a ports bundle and the public media prefix.
    ///
    /// The prefix always ends up with exactly one trailing slash.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::{
    ///     IngredientsService, RecipesService, TagsService, UserAccountsService,
    /// };
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use backend::outbound::memory::{InMemoryRecipeImageStore, InMemoryStore};
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let accounts = Arc::new(UserAccountsService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let ports = HttpStatePorts {
    ///     accounts: accounts.clone(),
    ///     authenticator: accounts,
    ///     tags: Arc::new(TagsService::new(store.clone())),
    ///     ingredients: Arc::new(IngredientsService::new(store.clone())),
    ///     recipes: Arc::new(RecipesService::new(
    ///         store.clone(),
    ///         store.clone(),
    ///         store,
    ///         Arc::new(InMemoryRecipeImageStore::default()),
    ///     )),
    /// };
    /// let state = HttpState::new(ports, "https://cdn.example.com/media");
    /// assert_eq!(
    ///     state.media_url_for("uploads/recipe/a.jpg"),
    ///     "https://cdn.example.com/media/uploads/recipe/a.jpg"
    /// );
    /// ```
    pub fn new(ports: HttpStatePorts, media_url: impl Into<String>) -> Self {
        let HttpStatePorts {
            accounts,
            authenticator,
            tags,
            ingredients,
            recipes,
        } = ports;
        let mut media_url = media_url.into().trim_end_matches('/').to_owned();
        media_url.push('/');
        Self {
            accounts,
            authenticator,
            tags,
            ingredients,
            recipes,
            media_url,
        }
    }

    /// Public URL for a media-relative path.
    pub fn media_url_for(&self, path: &str) -> String {
        format!("{}{}", self.media_url, path.trim_start_matches('/'))
    }
}
