//! Blood request entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use lifelink_core::types::geo::GeoPoint;

use crate::blood::BloodType;
use crate::user::UserRole;

use super::match_entry::MatchEntry;
use super::status::RequestStatus;
use super::urgency::Urgency;

/// A need for blood units raised by a hospital or patient.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BloodRequest {
    /// Unique request identifier.
    pub id: Uuid,
    /// The user who raised the request.
    pub requester_id: Uuid,
    /// Role of the requester (hospital or patient).
    pub requester_role: UserRole,
    /// Name of the patient needing blood.
    pub patient_name: Option<String>,
    /// Requested blood type.
    pub blood_type: BloodType,
    /// Units required (>= 1).
    pub quantity: i32,
    /// Urgency tier.
    pub urgency: Urgency,
    /// Origin longitude in degrees.
    pub longitude: Option<f64>,
    /// Origin latitude in degrees.
    pub latitude: Option<f64>,
    /// Aggregate lifecycle status.
    pub status: RequestStatus,
    /// Stamped exactly once, at the transition into completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the request was last updated.
    pub updated_at: DateTime<Utc>,
}

impl BloodRequest {
    /// The geographic origin, when both coordinates are present and valid.
    ///
    /// Malformed coordinates degrade to "no geographic filter" rather than
    /// failing the request.
    pub fn origin(&self) -> Option<GeoPoint> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => GeoPoint::new(lon, lat).ok(),
            _ => None,
        }
    }
}

/// Data required to create a new blood request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBloodRequest {
    /// The requesting user.
    pub requester_id: Uuid,
    /// Role of the requester.
    pub requester_role: UserRole,
    /// Name of the patient needing blood.
    pub patient_name: Option<String>,
    /// Requested blood type.
    pub blood_type: BloodType,
    /// Units required.
    pub quantity: i32,
    /// Urgency tier.
    pub urgency: Urgency,
    /// Origin coordinates, if known.
    pub origin: Option<GeoPoint>,
}

/// A donor's view of a request they were matched with.
///
/// One row per match entry, joined with the request it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DonorRequestView {
    /// The match entry identifier.
    pub match_id: Uuid,
    /// The donor's current response status.
    pub match_status: super::match_entry::MatchStatus,
    /// When the donor responded, if they have.
    pub response_date: Option<DateTime<Utc>>,
    /// The request identifier.
    pub request_id: Uuid,
    /// Name of the patient needing blood.
    pub patient_name: Option<String>,
    /// Requested blood type.
    pub blood_type: BloodType,
    /// Units required.
    pub quantity: i32,
    /// Urgency tier.
    pub urgency: Urgency,
    /// Aggregate lifecycle status of the request.
    pub status: RequestStatus,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
}

/// A request together with its match-entry list, as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodRequestDetail {
    /// The request itself.
    #[serde(flatten)]
    pub request: BloodRequest,
    /// The ordered match-entry list.
    pub matched_donors: Vec<MatchEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::match_entry::MatchStatus;

    fn request(longitude: Option<f64>, latitude: Option<f64>) -> BloodRequest {
        BloodRequest {
            id: Uuid::new_v4(),
            requester_id: Uuid::new_v4(),
            requester_role: UserRole::Hospital,
            patient_name: None,
            blood_type: BloodType::OPositive,
            quantity: 1,
            urgency: Urgency::Medium,
            longitude,
            latitude,
            status: RequestStatus::Open,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_origin_requires_both_coordinates() {
        assert!(request(Some(10.0), Some(45.0)).origin().is_some());
        assert!(request(Some(10.0), None).origin().is_none());
        assert!(request(None, None).origin().is_none());
    }

    #[test]
    fn test_malformed_origin_degrades_to_none() {
        assert!(request(Some(500.0), Some(45.0)).origin().is_none());
    }

    #[test]
    fn test_detail_serializes_flattened() {
        let detail = BloodRequestDetail {
            request: request(None, None),
            matched_donors: vec![MatchEntry {
                id: Uuid::new_v4(),
                request_id: Uuid::new_v4(),
                donor_id: Uuid::new_v4(),
                status: MatchStatus::Pending,
                response_date: None,
                created_at: Utc::now(),
            }],
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["status"], "open");
        assert_eq!(value["matched_donors"][0]["status"], "pending");
    }
}
