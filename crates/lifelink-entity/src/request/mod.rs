//! Blood request entity, its match entries, urgency tiers, and status
//! lifecycle.

pub mod match_entry;
pub mod model;
pub mod status;
pub mod urgency;

pub use match_entry::{MatchDecision, MatchEntry, MatchStatus};
pub use model::{BloodRequest, BloodRequestDetail, CreateBloodRequest, DonorRequestView};
pub use status::RequestStatus;
pub use urgency::Urgency;
