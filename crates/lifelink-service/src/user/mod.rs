//! User registration, login, and profile management.

pub mod service;

pub use service::{AuthenticatedUser, RegisterUser, UserService};
