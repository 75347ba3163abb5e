//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use backend::outbound::media::CapStdRecipeImageStore;
use backend::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) media_store: CapStdRecipeImageStore,
    pub(crate) media_url: String,
    pub(crate) max_upload_bytes: usize,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration backed by in-memory repositories.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        media_store: CapStdRecipeImageStore,
        media_url: impl Into<String>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            bind_addr,
            media_store,
            media_url: media_url.into(),
            max_upload_bytes,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    ///
    /// Without a pool every repository port is served from memory and data
    /// is lost on restart.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
