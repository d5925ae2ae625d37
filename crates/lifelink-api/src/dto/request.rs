//! Request DTOs.
//!
//! Enum-valued fields (role, blood type, urgency, decision) arrive as
//! strings and are parsed through the entity `FromStr` impls, so DTOs
//! reject unknown values with a validation error instead of a 422 from
//! the JSON layer.

use std::str::FromStr;

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use lifelink_core::error::AppError;
use lifelink_core::types::geo::GeoPoint;
use lifelink_entity::blood::BloodType;
use lifelink_entity::request::{MatchDecision, Urgency};
use lifelink_entity::user::{UpdateProfile, UserRole};
use lifelink_service::request::{CreateRequestInput, RecordDonationInput};
use lifelink_service::user::RegisterUser;

/// POST /api/auth/register
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Full name.
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// Email address.
    #[validate(email)]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Requested role.
    pub role: String,
    /// Blood type (donors).
    pub blood_type: Option<String>,
}

impl RegisterRequest {
    /// Parses the string-typed fields into a service input.
    pub fn into_input(self) -> Result<RegisterUser, AppError> {
        let role = UserRole::from_str(&self.role)?;
        let blood_type = self
            .blood_type
            .as_deref()
            .map(BloodType::from_str)
            .transpose()?;
        Ok(RegisterUser {
            name: self.name,
            email: self.email,
            password: self.password,
            phone: self.phone,
            role,
            blood_type,
        })
    }
}

/// POST /api/auth/login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email)]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// PUT /api/users/me
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New phone number.
    pub phone: Option<String>,
    /// New blood type.
    pub blood_type: Option<String>,
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

impl UpdateProfileRequest {
    /// Parses into an entity update; the user ID is filled in by the
    /// service from the request context.
    pub fn into_update(self) -> Result<UpdateProfile, AppError> {
        let blood_type = self
            .blood_type
            .as_deref()
            .map(BloodType::from_str)
            .transpose()?;
        Ok(UpdateProfile {
            id: Uuid::nil(),
            phone: self.phone,
            blood_type,
            address: self.address,
            city: self.city,
            longitude: self.longitude,
            latitude: self.latitude,
            availability: self.availability,
        })
    }
}

/// PUT /api/users/me/availability
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityRequest {
    /// Whether the donor is willing to donate.
    pub available: bool,
}

/// POST /api/requests
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRequestRequest {
    /// Name of the patient needing blood.
    pub patient_name: Option<String>,
    /// Requested blood type.
    pub blood_type: String,
    /// Units required.
    #[validate(range(min = 1, max = 100))]
    pub quantity: i32,
    /// Urgency tier (defaults to medium).
    pub urgency: Option<String>,
    /// Origin longitude.
    pub longitude: Option<f64>,
    /// Origin latitude.
    pub latitude: Option<f64>,
}

impl CreateRequestRequest {
    /// Parses the string-typed fields into a service input.
    pub fn into_input(self) -> Result<CreateRequestInput, AppError> {
        let blood_type = BloodType::from_str(&self.blood_type)?;
        let urgency = self
            .urgency
            .as_deref()
            .map(Urgency::from_str)
            .transpose()?
            .unwrap_or_default();
        let origin = match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => Some(GeoPoint::new(lon, lat)?),
            (None, None) => None,
            _ => {
                return Err(AppError::validation(
                    "Longitude and latitude must be provided together",
                ));
            }
        };
        Ok(CreateRequestInput {
            patient_name: self.patient_name,
            blood_type,
            quantity: self.quantity,
            urgency,
            origin,
        })
    }
}

/// POST /api/requests/{id}/respond
#[derive(Debug, Clone, Deserialize)]
pub struct RespondRequest {
    /// The donor's decision: "accepted" or "declined".
    pub decision: String,
}

impl RespondRequest {
    /// Parses the decision string.
    pub fn into_decision(self) -> Result<MatchDecision, AppError> {
        match self.decision.to_lowercase().as_str() {
            "accepted" | "accept" => Ok(MatchDecision::Accepted),
            "declined" | "decline" => Ok(MatchDecision::Declined),
            other => Err(AppError::validation(format!(
                "Unknown decision '{other}', expected 'accepted' or 'declined'"
            ))),
        }
    }
}

/// POST /api/requests/{id}/donations
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordDonationRequest {
    /// The donor who donated.
    pub donor_id: Uuid,
    /// Units donated.
    #[validate(range(min = 1, max = 100))]
    pub units_donated: i32,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl RecordDonationRequest {
    /// Converts into a service input.
    pub fn into_input(self) -> RecordDonationInput {
        RecordDonationInput {
            donor_id: self.donor_id,
            units_donated: self.units_donated,
            notes: self.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(
        longitude: Option<f64>,
        latitude: Option<f64>,
        urgency: Option<&str>,
    ) -> CreateRequestRequest {
        CreateRequestRequest {
            patient_name: None,
            blood_type: "A+".to_string(),
            quantity: 2,
            urgency: urgency.map(String::from),
            longitude,
            latitude,
        }
    }

    #[test]
    fn test_decision_parsing() {
        let accept = RespondRequest {
            decision: "Accepted".to_string(),
        };
        assert_eq!(accept.into_decision().unwrap(), MatchDecision::Accepted);

        let decline = RespondRequest {
            decision: "decline".to_string(),
        };
        assert_eq!(decline.into_decision().unwrap(), MatchDecision::Declined);

        let bogus = RespondRequest {
            decision: "maybe".to_string(),
        };
        assert!(bogus.into_decision().is_err());
    }

    #[test]
    fn test_create_request_parses_types_and_defaults_urgency() {
        let input = create_request(Some(10.0), Some(45.0), None).into_input().unwrap();
        assert_eq!(input.blood_type, BloodType::APositive);
        assert_eq!(input.urgency, Urgency::Medium);
        assert!(input.origin.is_some());
    }

    #[test]
    fn test_create_request_rejects_partial_coordinates() {
        assert!(create_request(Some(10.0), None, None).into_input().is_err());
        assert!(create_request(None, Some(45.0), None).into_input().is_err());
    }

    #[test]
    fn test_create_request_rejects_unknown_urgency() {
        assert!(create_request(None, None, Some("asap")).into_input().is_err());
        assert!(create_request(None, None, Some("critical")).into_input().is_ok());
    }

    #[test]
    fn test_register_rejects_unknown_role() {
        let req = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
            phone: None,
            role: "superuser".to_string(),
            blood_type: None,
        };
        assert!(req.into_input().is_err());
    }
}
