//! Blood request lifecycle: creation and matching, donor responses,
//! donation recording, cancellation.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use lifelink_core::error::AppError;
use lifelink_core::types::geo::GeoPoint;
use lifelink_core::types::pagination::{PageRequest, PageResponse};
use lifelink_database::repositories::donation::DonationRepository;
use lifelink_database::repositories::request::RequestRepository;
use lifelink_entity::blood::BloodType;
use lifelink_entity::donation::{CreateDonation, Donation};
use lifelink_entity::notification::NotificationMessage;
use lifelink_entity::request::{
    BloodRequest, BloodRequestDetail, CreateBloodRequest, DonorRequestView, MatchDecision,
    MatchEntry, MatchStatus, RequestStatus, Urgency,
};

use crate::context::RequestContext;
use crate::matching::DonorMatcher;
use crate::notification::NotificationDispatcher;

/// Input for raising a new blood request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRequestInput {
    /// Name of the patient needing blood.
    pub patient_name: Option<String>,
    /// Requested blood type.
    pub blood_type: BloodType,
    /// Units required (>= 1).
    pub quantity: i32,
    /// Urgency tier.
    pub urgency: Urgency,
    /// Origin coordinates, if known.
    pub origin: Option<GeoPoint>,
}

/// Input for recording a completed donation.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordDonationInput {
    /// The donor who donated.
    pub donor_id: Uuid,
    /// Units donated (>= 1).
    pub units_donated: i32,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Orchestrates the blood request lifecycle.
///
/// Matching failures degrade: a request is always created even when the
/// matching pass errors out, and can be re-matched later. Notification
/// fan-out runs detached and never blocks or fails the operation that
/// triggered it.
#[derive(Clone)]
pub struct RequestService {
    request_repo: Arc<RequestRepository>,
    donation_repo: Arc<DonationRepository>,
    matcher: Arc<DonorMatcher>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl RequestService {
    /// Creates a new request service.
    pub fn new(
        request_repo: Arc<RequestRepository>,
        donation_repo: Arc<DonationRepository>,
        matcher: Arc<DonorMatcher>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            request_repo,
            donation_repo,
            matcher,
            dispatcher,
        }
    }

    /// Raises a new blood request, runs the initial matching pass, and
    /// notifies the matched donors.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateRequestInput,
    ) -> Result<BloodRequestDetail, AppError> {
        if !ctx.can_request() {
            return Err(AppError::forbidden(
                "Only hospitals and patients can raise blood requests",
            ));
        }
        if input.quantity < 1 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }

        let request = self
            .request_repo
            .create(&CreateBloodRequest {
                requester_id: ctx.user_id,
                requester_role: ctx.role,
                patient_name: input.patient_name,
                blood_type: input.blood_type,
                quantity: input.quantity,
                urgency: input.urgency,
                origin: input.origin,
            })
            .await?;

        info!(
            request_id = %request.id,
            blood_type = %request.blood_type,
            urgency = %request.urgency,
            "Blood request created"
        );

        let matched_donors = self.run_matching_pass(&request).await?;
        Ok(BloodRequestDetail {
            request,
            matched_donors,
        })
    }

    /// Re-runs matching on an existing request, attaching only donors not
    /// already matched.
    pub async fn rematch(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
    ) -> Result<BloodRequestDetail, AppError> {
        let request = self.load_owned(ctx, request_id).await?;
        if request.status.is_terminal() {
            return Err(AppError::invalid_state(format!(
                "Cannot re-match a {} request",
                request.status
            )));
        }

        self.run_matching_pass(&request).await?;
        let matched_donors = self.request_repo.find_matches(request.id).await?;
        Ok(BloodRequestDetail {
            request,
            matched_donors,
        })
    }

    /// Gets a request with its match entries.
    ///
    /// Visible to its requester, to any donor with a match entry on it,
    /// and to admins.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
    ) -> Result<BloodRequestDetail, AppError> {
        let request = self.load(request_id).await?;
        let matched_donors = self.request_repo.find_matches(request_id).await?;

        let is_matched_donor = matched_donors.iter().any(|e| e.donor_id == ctx.user_id);
        if request.requester_id != ctx.user_id && !is_matched_donor && !ctx.is_admin() {
            return Err(AppError::forbidden("Not allowed to view this request"));
        }

        Ok(BloodRequestDetail {
            request,
            matched_donors,
        })
    }

    /// Pages through the current user's own requests.
    pub async fn list_mine(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> Result<PageResponse<BloodRequest>, AppError> {
        self.request_repo.list_by_requester(ctx.user_id, page).await
    }

    /// Pages through the current donor's pending match entries.
    pub async fn list_pending_for_donor(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> Result<PageResponse<DonorRequestView>, AppError> {
        if !ctx.is_donor() {
            return Err(AppError::forbidden("Only donors have pending matches"));
        }
        self.request_repo.list_pending_for_donor(ctx.user_id, page).await
    }

    /// Pages through the current donor's full match history.
    pub async fn list_history_for_donor(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> Result<PageResponse<DonorRequestView>, AppError> {
        if !ctx.is_donor() {
            return Err(AppError::forbidden("Only donors have a match history"));
        }
        self.request_repo.list_history_for_donor(ctx.user_id, page).await
    }

    /// Pages through the current donor's donation records.
    pub async fn list_donations_for_donor(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> Result<PageResponse<Donation>, AppError> {
        if !ctx.is_donor() {
            return Err(AppError::forbidden("Only donors have donation records"));
        }
        self.donation_repo.list_by_donor(ctx.user_id, page).await
    }

    /// Records the current donor's response to a pending match.
    ///
    /// The transition is a compare-and-set on the pending status, so a
    /// donor double-submitting (or racing themselves) changes the entry
    /// exactly once. A donor with no pending entry, whether never matched
    /// or already responded, gets not-found.
    pub async fn respond(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
        decision: MatchDecision,
    ) -> Result<BloodRequestDetail, AppError> {
        let request = self.load(request_id).await?;
        if request.status.is_terminal() {
            return Err(AppError::invalid_state(format!(
                "Request is already {}",
                request.status
            )));
        }

        let updated = self
            .request_repo
            .update_match_status(
                request_id,
                ctx.user_id,
                MatchStatus::Pending,
                decision.as_status(),
            )
            .await?;

        if updated.is_none() {
            let entry = self.request_repo.find_match(request_id, ctx.user_id).await?;
            return Err(Self::no_pending_match_error(entry.as_ref()));
        }

        info!(
            request_id = %request_id,
            donor_id = %ctx.user_id,
            decision = ?decision,
            "Donor responded to match"
        );

        let request = self.recompute_status(&request).await?;

        let accepted = decision == MatchDecision::Accepted;
        let message = NotificationMessage::donor_response(request_id, &ctx.name, accepted);
        let dispatcher = Arc::clone(&self.dispatcher);
        let requester_id = request.requester_id;
        tokio::spawn(async move {
            dispatcher.notify_one(requester_id, &message).await;
        });

        let matched_donors = self.request_repo.find_matches(request_id).await?;
        Ok(BloodRequestDetail {
            request,
            matched_donors,
        })
    }

    /// Records that an accepted donor completed a donation.
    ///
    /// Only the requester (or an admin) records donations. The entry must
    /// currently be accepted; the donated units count toward the request's
    /// quantity and may complete it.
    pub async fn record_donation(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
        input: RecordDonationInput,
    ) -> Result<BloodRequestDetail, AppError> {
        if input.units_donated < 1 {
            return Err(AppError::validation("Units donated must be at least 1"));
        }
        let request = self.load_owned(ctx, request_id).await?;
        if request.status.is_terminal() {
            return Err(AppError::invalid_state(format!(
                "Request is already {}",
                request.status
            )));
        }

        let entry = self
            .request_repo
            .find_match(request_id, input.donor_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Donor {} is not matched with this request",
                    input.donor_id
                ))
            })?;

        if entry.status != MatchStatus::Accepted {
            return Err(AppError::invalid_state(format!(
                "Donation requires an accepted match; match is {}",
                entry.status.as_str()
            )));
        }

        // The repository re-checks the accepted status inside the
        // transaction, so an entry that moved since the read above loses
        // the race cleanly instead of being double-recorded.
        let donation = self
            .request_repo
            .record_donation(
                &request,
                &CreateDonation {
                    donor_id: input.donor_id,
                    units_donated: input.units_donated,
                    notes: input.notes,
                },
            )
            .await?;
        if donation.is_none() {
            return Err(AppError::conflict(
                "Match entry changed concurrently; retry the operation",
            ));
        }

        info!(
            request_id = %request_id,
            donor_id = %input.donor_id,
            units = input.units_donated,
            "Donation recorded"
        );

        let request = self.load(request_id).await?;
        let matched_donors = self.request_repo.find_matches(request_id).await?;
        Ok(BloodRequestDetail {
            request,
            matched_donors,
        })
    }

    /// Cancels an active request.
    pub async fn cancel(&self, ctx: &RequestContext, request_id: Uuid) -> Result<BloodRequest, AppError> {
        let request = self.load_owned(ctx, request_id).await?;
        if request.status.is_terminal() {
            return Err(AppError::invalid_state(format!(
                "Request is already {}",
                request.status
            )));
        }

        let cancelled = self.request_repo.cancel(request_id).await?;
        if !cancelled {
            // Lost a race against completion or another cancel.
            return Err(AppError::invalid_state(
                "Request reached a terminal state concurrently",
            ));
        }

        info!(request_id = %request_id, "Blood request cancelled");
        self.load(request_id).await
    }

    /// Runs one matching pass: find candidates, attach entries, notify
    /// the newly attached donors.
    ///
    /// A failed candidate search is logged and degrades to zero matches
    /// rather than failing the surrounding operation.
    async fn run_matching_pass(
        &self,
        request: &BloodRequest,
    ) -> Result<Vec<MatchEntry>, AppError> {
        let candidates = match self.matcher.find_candidates(request).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(
                    request_id = %request.id,
                    error = %e,
                    "Matching pass failed; request left unmatched"
                );
                return Ok(Vec::new());
            }
        };

        let donor_ids: Vec<Uuid> = candidates.iter().map(|c| c.id).collect();
        let attached = self.request_repo.attach_matches(request.id, &donor_ids).await?;

        if !attached.is_empty() {
            let recipients: Vec<Uuid> = attached.iter().map(|e| e.donor_id).collect();
            let message = NotificationMessage::blood_request_match(
                request.id,
                request.blood_type.as_str(),
                request.quantity,
                request.urgency.is_urgent(),
            );
            let dispatcher = Arc::clone(&self.dispatcher);
            tokio::spawn(async move {
                dispatcher.notify_all(&recipients, &message).await;
            });
        }

        Ok(attached)
    }

    /// Recomputes the aggregate status from the full entry list and the
    /// donated unit total, then stores it (terminal states are immovable).
    async fn recompute_status(&self, request: &BloodRequest) -> Result<BloodRequest, AppError> {
        let entries = self.request_repo.find_matches(request.id).await?;
        let donated_units = self.donation_repo.sum_units_for_request(request.id).await?;
        let status = RequestStatus::derive(&entries, donated_units, request.quantity);

        self.request_repo.apply_status(request.id, status).await?;
        self.load(request.id).await
    }

    /// The error for a respond call that found no pending entry: the
    /// donor was never matched, or has already responded. Both cases
    /// surface as not-found.
    fn no_pending_match_error(entry: Option<&MatchEntry>) -> AppError {
        match entry {
            None => AppError::not_found("You are not matched with this request"),
            Some(entry) => AppError::not_found(format!(
                "No pending match to respond to; your response is already recorded as {}",
                entry.status.as_str()
            )),
        }
    }

    async fn load(&self, request_id: Uuid) -> Result<BloodRequest, AppError> {
        self.request_repo
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Request {request_id} not found")))
    }

    /// Loads a request and checks the caller owns it (or is an admin).
    async fn load_owned(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
    ) -> Result<BloodRequest, AppError> {
        let request = self.load(request_id).await?;
        if request.requester_id != ctx.user_id && !ctx.is_admin() {
            return Err(AppError::forbidden("Not allowed to manage this request"));
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lifelink_core::error::ErrorKind;

    fn entry_with_status(status: MatchStatus) -> MatchEntry {
        MatchEntry {
            id: Uuid::new_v4(),
            request_id: Uuid::new_v4(),
            donor_id: Uuid::new_v4(),
            status,
            response_date: Some(Utc::now()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_responding_without_any_match_is_not_found() {
        let err = RequestService::no_pending_match_error(None);
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_responding_twice_is_not_found() {
        for status in [
            MatchStatus::Accepted,
            MatchStatus::Declined,
            MatchStatus::Donated,
        ] {
            let entry = entry_with_status(status);
            let err = RequestService::no_pending_match_error(Some(&entry));
            assert_eq!(err.kind, ErrorKind::NotFound);
            assert!(err.message.contains(status.as_str()));
        }
    }
}
