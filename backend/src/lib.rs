//! Recipe API backend.
//!
//! Hexagonal layout: [`domain`] holds entities, ports and services;
//! [`inbound`] adapts HTTP onto the driving ports; [`outbound`] implements
//! the driven ports for PostgreSQL, memory and the filesystem.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
pub use settings::ServerSettings;
