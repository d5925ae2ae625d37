//! Donation records.

pub mod model;

pub use model::{CreateDonation, Donation};
