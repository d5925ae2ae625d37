//! Donor matching engine: compatibility policy and candidate search.

pub mod compatibility;
pub mod matcher;

pub use compatibility::compatible_donor_types;
pub use matcher::DonorMatcher;
