//! HTTP inbound adapter exposing the REST endpoints.
//!
//! Handlers translate requests into calls on the driving ports held by
//! [`state::HttpState`] and map domain errors onto HTTP responses.

pub mod attributes;
pub mod auth;
pub mod error;
pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod routes;
pub mod schemas;
pub mod state;
pub mod tags;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
