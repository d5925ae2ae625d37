//! User entities and roles.

pub mod model;
pub mod role;

pub use model::{CreateUser, DonorCandidate, UpdateProfile, User};
pub use role::UserRole;
