//! # lifelink-entity
//!
//! Domain entities for LifeLink: blood types, users/donors, blood requests
//! with their embedded match entries, donations, and notifications.
//!
//! All entities derive `serde` and `sqlx` traits so they map directly to
//! API responses and database rows. Pure lifecycle logic (aggregate status
//! derivation, transition legality) lives next to the types it governs.

pub mod blood;
pub mod donation;
pub mod notification;
pub mod request;
pub mod user;
