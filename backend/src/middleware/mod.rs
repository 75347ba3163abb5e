//! Request middleware.
//!
//! Only request tracing lives here; authentication is an extractor in
//! `inbound::http::auth` so handlers opt in per route.

pub mod trace;

pub use trace::Trace;
