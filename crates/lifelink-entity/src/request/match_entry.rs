//! Per-donor match entries attached to a blood request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A donor's tracked response to one request.
///
/// Created in bulk when the request is matched; each entry's status is
/// mutated only by that donor's own response action. Entries are never
/// deleted, only transitioned.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchEntry {
    /// Unique entry identifier.
    pub id: Uuid,
    /// The request this entry belongs to.
    pub request_id: Uuid,
    /// The matched donor.
    pub donor_id: Uuid,
    /// The donor's response status.
    pub status: MatchStatus,
    /// Set on the first non-pending transition.
    pub response_date: Option<DateTime<Utc>>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

/// Status of a single match entry.
///
/// Transitions are monotone: `Pending -> {Accepted, Declined}` and
/// `Accepted -> Donated`. `Declined` and `Donated` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Awaiting the donor's response.
    Pending,
    /// The donor agreed to donate.
    Accepted,
    /// The donor declined.
    Declined,
    /// The donor completed a donation for this request.
    Donated,
}

impl MatchStatus {
    /// Whether a transition to `next` is legal.
    pub fn can_transition_to(&self, next: MatchStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted)
                | (Self::Pending, Self::Declined)
                | (Self::Accepted, Self::Donated)
        )
    }

    /// Whether this status is terminal for the entry.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Declined | Self::Donated)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Donated => "donated",
        }
    }
}

/// A donor's decision on a pending match entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchDecision {
    /// Accept the request.
    Accepted,
    /// Decline the request.
    Declined,
}

impl MatchDecision {
    /// The match status this decision transitions the entry to.
    pub fn as_status(&self) -> MatchStatus {
        match self {
            Self::Accepted => MatchStatus::Accepted,
            Self::Declined => MatchStatus::Declined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_are_monotone() {
        assert!(MatchStatus::Pending.can_transition_to(MatchStatus::Accepted));
        assert!(MatchStatus::Pending.can_transition_to(MatchStatus::Declined));
        assert!(MatchStatus::Accepted.can_transition_to(MatchStatus::Donated));

        assert!(!MatchStatus::Accepted.can_transition_to(MatchStatus::Pending));
        assert!(!MatchStatus::Declined.can_transition_to(MatchStatus::Accepted));
        assert!(!MatchStatus::Donated.can_transition_to(MatchStatus::Accepted));
        assert!(!MatchStatus::Pending.can_transition_to(MatchStatus::Donated));
    }

    #[test]
    fn test_terminal_states() {
        assert!(MatchStatus::Declined.is_terminal());
        assert!(MatchStatus::Donated.is_terminal());
        assert!(!MatchStatus::Pending.is_terminal());
        assert!(!MatchStatus::Accepted.is_terminal());
    }
}
