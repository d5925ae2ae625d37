//! The eight ABO/Rh blood types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ABO blood group with Rh factor.
///
/// Stored in PostgreSQL as the `blood_type` enum with the conventional
/// labels (`A+`, `O-`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "blood_type")]
pub enum BloodType {
    /// A positive.
    #[sqlx(rename = "A+")]
    #[serde(rename = "A+")]
    APositive,
    /// A negative.
    #[sqlx(rename = "A-")]
    #[serde(rename = "A-")]
    ANegative,
    /// B positive.
    #[sqlx(rename = "B+")]
    #[serde(rename = "B+")]
    BPositive,
    /// B negative.
    #[sqlx(rename = "B-")]
    #[serde(rename = "B-")]
    BNegative,
    /// AB positive.
    #[sqlx(rename = "AB+")]
    #[serde(rename = "AB+")]
    AbPositive,
    /// AB negative.
    #[sqlx(rename = "AB-")]
    #[serde(rename = "AB-")]
    AbNegative,
    /// O positive.
    #[sqlx(rename = "O+")]
    #[serde(rename = "O+")]
    OPositive,
    /// O negative.
    #[sqlx(rename = "O-")]
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    /// All eight blood types.
    pub const ALL: [BloodType; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::AbPositive,
        Self::AbNegative,
        Self::OPositive,
        Self::ONegative,
    ];

    /// Returns the conventional label (e.g. `"A+"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = lifelink_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A+" => Ok(Self::APositive),
            "A-" => Ok(Self::ANegative),
            "B+" => Ok(Self::BPositive),
            "B-" => Ok(Self::BNegative),
            "AB+" => Ok(Self::AbPositive),
            "AB-" => Ok(Self::AbNegative),
            "O+" => Ok(Self::OPositive),
            "O-" => Ok(Self::ONegative),
            _ => Err(lifelink_core::AppError::validation(format!(
                "Invalid blood type: '{s}'. Expected one of: A+, A-, B+, B-, AB+, AB-, O+, O-"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_labels() {
        for bt in BloodType::ALL {
            assert_eq!(bt.as_str().parse::<BloodType>().unwrap(), bt);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("ab+".parse::<BloodType>().unwrap(), BloodType::AbPositive);
        assert_eq!("o-".parse::<BloodType>().unwrap(), BloodType::ONegative);
    }

    #[test]
    fn test_rejects_unknown_label() {
        assert!("C+".parse::<BloodType>().is_err());
        assert!("".parse::<BloodType>().is_err());
    }
}
