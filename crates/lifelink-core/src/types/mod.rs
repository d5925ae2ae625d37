//! Shared types used across LifeLink crates.

pub mod geo;
pub mod pagination;
