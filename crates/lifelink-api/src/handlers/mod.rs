//! HTTP request handlers, organized by domain.

pub mod auth;
pub mod donor;
pub mod health;
pub mod notification;
pub mod request;
pub mod user;
