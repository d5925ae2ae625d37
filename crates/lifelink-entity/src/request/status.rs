//! Aggregate request status, derived from the match-entry list.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::match_entry::{MatchEntry, MatchStatus};

/// Aggregate lifecycle state of a blood request.
///
/// Derived, not independently settable: except for `Cancelled`, the status
/// is always recomputed from the full match-entry list and the donated unit
/// total via [`RequestStatus::derive`]. It is never incrementally patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// No entries, or all entries pending or declined.
    Open,
    /// At least one donor accepted; quantity not yet fulfilled.
    Matched,
    /// Donated units reached the requested quantity. Terminal.
    Completed,
    /// Explicitly cancelled by the requester. Terminal.
    Cancelled,
}

impl RequestStatus {
    /// Recompute the aggregate status from the full entry list.
    ///
    /// `donated_units` is the sum of units across donation records for the
    /// request; the request is complete once it covers `quantity`.
    /// Cancellation is not derivable from entries and is handled by the
    /// caller before this runs.
    pub fn derive(entries: &[MatchEntry], donated_units: i64, quantity: i32) -> RequestStatus {
        if donated_units >= i64::from(quantity) {
            return Self::Completed;
        }
        let any_committed = entries
            .iter()
            .any(|e| matches!(e.status, MatchStatus::Accepted | MatchStatus::Donated));
        if any_committed {
            Self::Matched
        } else {
            Self::Open
        }
    }

    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Matched => "matched",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn entry(status: MatchStatus) -> MatchEntry {
        MatchEntry {
            id: Uuid::new_v4(),
            request_id: Uuid::new_v4(),
            donor_id: Uuid::new_v4(),
            status,
            response_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_entry_list_is_open() {
        assert_eq!(RequestStatus::derive(&[], 0, 2), RequestStatus::Open);
    }

    #[test]
    fn test_all_pending_is_open() {
        let entries = vec![entry(MatchStatus::Pending), entry(MatchStatus::Pending)];
        assert_eq!(RequestStatus::derive(&entries, 0, 2), RequestStatus::Open);
    }

    #[test]
    fn test_declines_alone_keep_request_open() {
        let entries = vec![entry(MatchStatus::Declined), entry(MatchStatus::Pending)];
        assert_eq!(RequestStatus::derive(&entries, 0, 2), RequestStatus::Open);
    }

    #[test]
    fn test_first_accept_moves_to_matched() {
        let entries = vec![entry(MatchStatus::Accepted), entry(MatchStatus::Pending)];
        assert_eq!(
            RequestStatus::derive(&entries, 0, 2),
            RequestStatus::Matched
        );
    }

    #[test]
    fn test_partial_donation_stays_matched() {
        let entries = vec![entry(MatchStatus::Donated), entry(MatchStatus::Pending)];
        assert_eq!(
            RequestStatus::derive(&entries, 1, 3),
            RequestStatus::Matched
        );
    }

    #[test]
    fn test_fulfilled_quantity_completes() {
        let entries = vec![entry(MatchStatus::Donated), entry(MatchStatus::Accepted)];
        assert_eq!(
            RequestStatus::derive(&entries, 3, 3),
            RequestStatus::Completed
        );
        assert_eq!(
            RequestStatus::derive(&entries, 5, 3),
            RequestStatus::Completed
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(RequestStatus::Completed.is_terminal());
        assert!(RequestStatus::Cancelled.is_terminal());
        assert!(!RequestStatus::Open.is_terminal());
        assert!(!RequestStatus::Matched.is_terminal());
    }
}
