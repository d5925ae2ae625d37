//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// A user eligible to supply blood.
    Donor,
    /// A hospital raising blood requests.
    Hospital,
    /// A patient raising blood requests on their own behalf.
    Patient,
    /// Full system administrator.
    Admin,
}

impl UserRole {
    /// Check if this role may raise blood requests.
    pub fn can_request(&self) -> bool {
        matches!(self, Self::Hospital | Self::Patient | Self::Admin)
    }

    /// Check if this role may respond to match entries.
    pub fn is_donor(&self) -> bool {
        matches!(self, Self::Donor)
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::Hospital => "hospital",
            Self::Patient => "patient",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = lifelink_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "donor" => Ok(Self::Donor),
            "hospital" => Ok(Self::Hospital),
            "patient" => Ok(Self::Patient),
            "admin" => Ok(Self::Admin),
            _ => Err(lifelink_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: donor, hospital, patient, admin"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("donor".parse::<UserRole>().unwrap(), UserRole::Donor);
        assert_eq!("HOSPITAL".parse::<UserRole>().unwrap(), UserRole::Hospital);
        assert!("nurse".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_request_permissions() {
        assert!(UserRole::Hospital.can_request());
        assert!(UserRole::Patient.can_request());
        assert!(!UserRole::Donor.can_request());
        assert!(UserRole::Donor.is_donor());
    }
}
