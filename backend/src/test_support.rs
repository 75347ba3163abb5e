//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`,
//! through the `test-support` feature). Everything here wires real domain
//! services to the in-memory adapters so tests exercise the same code paths
//! as the server without a database.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::DefaultClock;

use crate::domain::{IngredientsService, RecipesService, TagsService, UserAccountsService};
use crate::inbound::http::health::HealthState;
use crate::inbound::http::routes::configure_api;
use crate::inbound::http::state::{DEFAULT_MEDIA_URL, HttpState, HttpStatePorts};
use crate::middleware::Trace;
use crate::outbound::memory::{InMemoryRecipeImageStore, InMemoryStore};

/// HTTP state backed by in-memory adapters, with handles on the stores so
/// tests can inspect what was written.
#[derive(Clone)]
pub struct InMemoryBackend {
    /// State handed to the handlers.
    pub state: HttpState,
    /// Users, tokens, tags, ingredients and recipes.
    pub store: Arc<InMemoryStore>,
    /// Uploaded image bytes keyed by relative path.
    pub images: Arc<InMemoryRecipeImageStore>,
}

impl InMemoryBackend {
    /// Wire every service to fresh in-memory stores.
    ///
    /// # Examples
    /// ```
    /// use backend::test_support::InMemoryBackend;
    ///
    /// let backend = InMemoryBackend::new();
    /// assert_eq!(backend.state.media_url_for("a.jpg"), "/media/a.jpg");
    /// ```
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let images = Arc::new(InMemoryRecipeImageStore::default());
        let accounts = Arc::new(UserAccountsService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::new(DefaultClock),
        ));
        let ports = HttpStatePorts {
            accounts: accounts.clone(),
            authenticator: accounts,
            tags: Arc::new(TagsService::new(Arc::clone(&store))),
            ingredients: Arc::new(IngredientsService::new(Arc::clone(&store))),
            recipes: Arc::new(RecipesService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&images),
            )),
        };
        Self {
            state: HttpState::new(ports, DEFAULT_MEDIA_URL),
            store,
            images,
        }
    }

    /// Build an application serving the full API and the health probes.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .app_data(health)
            .wrap(Trace)
            .configure(configure_api)
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}
