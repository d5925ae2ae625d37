//! Blood request lifecycle.

pub mod service;

pub use service::{CreateRequestInput, RecordDonationInput, RequestService};
