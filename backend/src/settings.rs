//! Server settings loaded via OrthoConfig.
//!
//! Values come from `RECIPES_*` environment variables, an optional
//! configuration file, and command-line flags. Unset keys fall back to the
//! defaults exposed through the accessor methods.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::state::DEFAULT_MEDIA_URL;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MEDIA_ROOT: &str = "media";
/// 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Configuration for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPES")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection URL. In-memory adapters are used when unset.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Directory holding uploaded images.
    pub media_root: Option<PathBuf>,
    /// Public URL prefix for uploaded images.
    pub media_url: Option<String>,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: Option<usize>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl ServerSettings {
    /// Listen address, `0.0.0.0:8080` by default.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Database URL, if persistence is configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool size, at least one.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .max(1)
    }

    /// Media directory, `./media` by default.
    pub fn media_root(&self) -> &Path {
        self.media_root
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_MEDIA_ROOT))
    }

    /// Media URL prefix, `/media/` by default.
    pub fn media_url(&self) -> &str {
        self.media_url.as_deref().unwrap_or(DEFAULT_MEDIA_URL)
    }

    /// Upload limit, 5 MiB by default.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }
}
