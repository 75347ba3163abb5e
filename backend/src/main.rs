//! Backend entry-point: loads settings, prepares adapters and serves the API.

mod server;

use std::ffi::OsString;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::ServerSettings;
use backend::inbound::http::health::HealthState;
use backend::outbound::media::CapStdRecipeImageStore;
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use ortho_config::OrthoConfig;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args: Vec<OsString> = std::env::args_os().collect();
    let settings = ServerSettings::load_from_iter(args)
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    let media_store = CapStdRecipeImageStore::open(settings.media_root())?;
    let config = ServerConfig::new(
        settings.bind_addr(),
        media_store,
        settings.media_url(),
        settings.max_upload_bytes(),
    );
    let config = match settings.database_url() {
        Some(url) => config.with_db_pool(connect_database(url, &settings).await?),
        None => {
            warn!("no database configured; using in-memory storage");
            config
        }
    };

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(make_metrics());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(bind_addr = %settings.bind_addr(), "server listening");
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome
}

async fn connect_database(url: &str, settings: &ServerSettings) -> std::io::Result<DbPool> {
    if settings.run_migrations {
        run_pending_migrations(url)
            .await
            .map_err(std::io::Error::other)?;
    }
    let pool_config = PoolConfig::new(url).with_max_size(settings.db_max_connections());
    DbPool::new(pool_config)
        .await
        .map_err(std::io::Error::other)
}

#[cfg(feature = "metrics")]
fn make_metrics() -> Option<actix_web_prom::PrometheusMetrics> {
    match PrometheusMetricsBuilder::new("recipes")
        .endpoint("/metrics")
        .build()
    {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            warn!(error = %e, "metrics disabled: Prometheus setup failed");
            None
        }
    }
}
