//! Blood type enumeration.

pub mod blood_type;

pub use blood_type::BloodType;
