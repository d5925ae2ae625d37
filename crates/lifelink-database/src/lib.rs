//! # lifelink-database
//!
//! PostgreSQL access layer: connection pool, embedded migrations, and the
//! repositories used by the services.

pub mod connection;
pub mod migration;
pub mod repositories;
