//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::blood::BloodType;

use super::role::UserRole;

/// A registered user in the LifeLink system.
///
/// Donors carry the fields the matching engine filters on: blood type,
/// location, `availability`, and `is_active`. The candidate query only
/// surfaces donors with both flags set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Full name.
    pub name: String,
    /// Email address (unique, lowercased).
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// User role.
    pub role: UserRole,
    /// Blood type (donors).
    pub blood_type: Option<BloodType>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Location longitude in degrees.
    pub longitude: Option<f64>,
    /// Location latitude in degrees.
    pub latitude: Option<f64>,
    /// Whether the donor is currently willing to donate.
    pub availability: bool,
    /// When the donor last donated.
    pub last_donation_date: Option<DateTime<Utc>>,
    /// Whether the account is active.
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Assigned role.
    pub role: UserRole,
    /// Blood type (donors).
    pub blood_type: Option<BloodType>,
}

/// Data for updating an existing user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfile {
    /// The user ID to update.
    pub id: Uuid,
    /// New phone number.
    pub phone: Option<String>,
    /// New blood type.
    pub blood_type: Option<BloodType>,
    /// New street address.
    pub address: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New longitude.
    pub longitude: Option<f64>,
    /// New latitude.
    pub latitude: Option<f64>,
    /// New availability flag.
    pub availability: Option<bool>,
}

/// A donor surfaced by the matching engine, with its distance from the
/// request origin when the request carried coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DonorCandidate {
    /// Donor user ID.
    pub id: Uuid,
    /// Donor name.
    pub name: String,
    /// Donor email.
    pub email: String,
    /// Donor phone.
    pub phone: Option<String>,
    /// Donor blood type.
    pub blood_type: BloodType,
    /// Donor longitude.
    pub longitude: Option<f64>,
    /// Donor latitude.
    pub latitude: Option<f64>,
    /// Distance from the request origin in meters, when geo-ranked.
    pub distance_meters: Option<f64>,
}
