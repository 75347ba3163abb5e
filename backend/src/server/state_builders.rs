//! Builders wiring domain services to the configured adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::ports::{
    AuthTokenRepository, IngredientRepository, RecipeImageStore, RecipeRepository, TagRepository,
    UserRepository,
};
use backend::domain::{IngredientsService, RecipesService, TagsService, UserAccountsService};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::InMemoryStore;
use backend::outbound::persistence::{
    DbPool, DieselAuthTokenRepository, DieselIngredientRepository, DieselRecipeRepository,
    DieselTagRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Repository adapters backing the services.
struct Repositories<U, T, Tg, In, R> {
    users: Arc<U>,
    tokens: Arc<T>,
    tags: Arc<Tg>,
    ingredients: Arc<In>,
    recipes: Arc<R>,
}

impl
    Repositories<
        DieselUserRepository,
        DieselAuthTokenRepository,
        DieselTagRepository,
        DieselIngredientRepository,
        DieselRecipeRepository,
    >
{
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            tokens: Arc::new(DieselAuthTokenRepository::new(pool.clone())),
            tags: Arc::new(DieselTagRepository::new(pool.clone())),
            ingredients: Arc::new(DieselIngredientRepository::new(pool.clone())),
            recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
        }
    }
}

impl Repositories<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore> {
    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::default());
        Self {
            users: Arc::clone(&store),
            tokens: Arc::clone(&store),
            tags: Arc::clone(&store),
            ingredients: Arc::clone(&store),
            recipes: store,
        }
    }
}

impl<U, T, Tg, In, R> Repositories<U, T, Tg, In, R>
where
    U: UserRepository + 'static,
    T: AuthTokenRepository + 'static,
    Tg: TagRepository + 'static,
    In: IngredientRepository + 'static,
    R: RecipeRepository + 'static,
{
    fn into_ports<Im>(self, images: Arc<Im>, clock: Arc<dyn Clock>) -> HttpStatePorts
    where
        Im: RecipeImageStore + 'static,
    {
        let accounts = Arc::new(UserAccountsService::new(self.users, self.tokens, clock));
        HttpStatePorts {
            accounts: accounts.clone(),
            authenticator: accounts,
            tags: Arc::new(TagsService::new(Arc::clone(&self.tags))),
            ingredients: Arc::new(IngredientsService::new(Arc::clone(&self.ingredients))),
            recipes: Arc::new(RecipesService::new(
                self.recipes,
                self.tags,
                self.ingredients,
                images,
            )),
        }
    }
}

/// Build the shared HTTP state.
///
/// PostgreSQL adapters are used when a pool is configured; otherwise every
/// repository port shares one in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let images = Arc::new(config.media_store.clone());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = match &config.db_pool {
        Some(pool) => Repositories::diesel(pool).into_ports(images, clock),
        None => Repositories::in_memory().into_ports(images, clock),
    };
    web::Data::new(HttpState::new(ports, config.media_url.clone()))
}
