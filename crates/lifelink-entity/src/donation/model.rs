//! Donation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A completed donation against a blood request.
///
/// Created when the requester records that an accepted donor donated;
/// the donated units count toward the request's quantity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Donation {
    /// Unique donation identifier.
    pub id: Uuid,
    /// The donating user.
    pub donor_id: Uuid,
    /// The request this donation fulfils.
    pub request_id: Uuid,
    /// When the donation took place.
    pub donation_date: DateTime<Utc>,
    /// Units donated (>= 1).
    pub units_donated: i32,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to record a donation; the target request is passed
/// alongside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDonation {
    /// The donating user.
    pub donor_id: Uuid,
    /// Units donated.
    pub units_donated: i32,
    /// Free-form notes.
    pub notes: Option<String>,
}
