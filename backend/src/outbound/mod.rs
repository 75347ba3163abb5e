//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM.
//! - **memory**: in-memory repositories for database-less runs and tests.
//! - **media**: filesystem image storage confined with `cap-std`.
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod media;
pub mod memory;
pub mod persistence;
