//! # lifelink-core
//!
//! Core crate for the LifeLink blood-donation coordination service.
//! Contains configuration schemas, shared types (pagination, geographic
//! points), and the unified error system.
//!
//! This crate has **no** internal dependencies on other LifeLink crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
