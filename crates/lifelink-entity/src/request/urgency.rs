//! Request urgency tiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Priority tier of a blood request.
///
/// Ordered low to high; `High` and `Critical` form the urgent tier that
/// narrows the matching radius.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "urgency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Routine replenishment.
    Low,
    /// Standard need.
    Medium,
    /// Needed soon.
    High,
    /// Life-threatening need.
    Critical,
}

impl Urgency {
    /// Whether this urgency belongs to the urgent tier.
    pub fn is_urgent(&self) -> bool {
        *self >= Self::High
    }

    /// Return the urgency as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl Default for Urgency {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = lifelink_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            // "normal" is the legacy label for the default tier
            "medium" | "normal" => Ok(Self::Medium),
            // "urgent" is the legacy label for the urgent tier
            "high" | "urgent" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(lifelink_core::AppError::validation(format!(
                "Invalid urgency: '{s}'. Expected one of: low, medium, high, critical"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Urgency::Low < Urgency::Medium);
        assert!(Urgency::Medium < Urgency::High);
        assert!(Urgency::High < Urgency::Critical);
    }

    #[test]
    fn test_urgent_tier() {
        assert!(!Urgency::Low.is_urgent());
        assert!(!Urgency::Medium.is_urgent());
        assert!(Urgency::High.is_urgent());
        assert!(Urgency::Critical.is_urgent());
    }

    #[test]
    fn test_legacy_labels_parse() {
        assert_eq!("normal".parse::<Urgency>().unwrap(), Urgency::Medium);
        assert_eq!("Urgent".parse::<Urgency>().unwrap(), Urgency::High);
    }
}
