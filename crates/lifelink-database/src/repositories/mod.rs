//! Repository implementations, one per aggregate.

pub mod donation;
pub mod notification;
pub mod request;
pub mod user;
