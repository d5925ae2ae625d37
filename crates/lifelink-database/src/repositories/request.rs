//! Blood request repository: request rows, their match entries, and the
//! conditional updates that keep lifecycle transitions race-free.

use sqlx::PgPool;
use uuid::Uuid;

use lifelink_core::error::{AppError, ErrorKind};
use lifelink_core::result::AppResult;
use lifelink_core::types::pagination::{PageRequest, PageResponse};
use lifelink_entity::donation::{CreateDonation, Donation};
use lifelink_entity::request::{
    BloodRequest, CreateBloodRequest, DonorRequestView, MatchEntry, MatchStatus, RequestStatus,
};

/// Repository for blood requests and their match entries.
#[derive(Debug, Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    /// Create a new request repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new blood request in the open state.
    pub async fn create(&self, data: &CreateBloodRequest) -> AppResult<BloodRequest> {
        sqlx::query_as::<_, BloodRequest>(
            "INSERT INTO blood_requests \
                 (requester_id, requester_role, patient_name, blood_type, quantity, urgency, \
                  longitude, latitude) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING *",
        )
        .bind(data.requester_id)
        .bind(data.requester_role)
        .bind(&data.patient_name)
        .bind(data.blood_type)
        .bind(data.quantity)
        .bind(data.urgency)
        .bind(data.origin.map(|p| p.longitude))
        .bind(data.origin.map(|p| p.latitude))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create blood request", e))
    }

    /// Find a request by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BloodRequest>> {
        sqlx::query_as::<_, BloodRequest>("SELECT * FROM blood_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find request", e))
    }

    /// All match entries for a request, oldest first.
    pub async fn find_matches(&self, request_id: Uuid) -> AppResult<Vec<MatchEntry>> {
        sqlx::query_as::<_, MatchEntry>(
            "SELECT * FROM request_matches WHERE request_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load match entries", e))
    }

    /// The match entry for a specific donor on a request, if any.
    pub async fn find_match(
        &self,
        request_id: Uuid,
        donor_id: Uuid,
    ) -> AppResult<Option<MatchEntry>> {
        sqlx::query_as::<_, MatchEntry>(
            "SELECT * FROM request_matches WHERE request_id = $1 AND donor_id = $2",
        )
        .bind(request_id)
        .bind(donor_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load match entry", e))
    }

    /// Attach the given donors to a request as pending match entries.
    ///
    /// Donors that already have an entry on this request are skipped via
    /// `ON CONFLICT DO NOTHING`, so re-matching never duplicates or
    /// overwrites an existing response. Returns the entries actually
    /// inserted.
    pub async fn attach_matches(
        &self,
        request_id: Uuid,
        donor_ids: &[Uuid],
    ) -> AppResult<Vec<MatchEntry>> {
        if donor_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, MatchEntry>(
            "INSERT INTO request_matches (request_id, donor_id) \
             SELECT $1::uuid, donor_id FROM unnest($2::uuid[]) AS t(donor_id) \
             ON CONFLICT ON CONSTRAINT request_matches_request_donor_key DO NOTHING \
             RETURNING *",
        )
        .bind(request_id)
        .bind(donor_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to attach matches", e))
    }

    /// Transition a donor's match entry, conditional on its current status.
    ///
    /// The `WHERE status = expected` clause makes the transition a
    /// compare-and-set: when two responses race, exactly one sees the
    /// expected prior status and wins; the other gets `None` and is
    /// reported as a state conflict by the caller.
    pub async fn update_match_status(
        &self,
        request_id: Uuid,
        donor_id: Uuid,
        expected: MatchStatus,
        next: MatchStatus,
    ) -> AppResult<Option<MatchEntry>> {
        sqlx::query_as::<_, MatchEntry>(
            "UPDATE request_matches \
             SET status = $4, response_date = COALESCE(response_date, NOW()) \
             WHERE request_id = $1 AND donor_id = $2 AND status = $3 \
             RETURNING *",
        )
        .bind(request_id)
        .bind(donor_id)
        .bind(expected)
        .bind(next)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update match entry", e))
    }

    /// Record a donation against an accepted match entry, atomically.
    ///
    /// One transaction covers the whole write path: the compare-and-set of
    /// the entry from accepted to donated, the donation row, the donor's
    /// `last_donation_date`, and the re-derived request status. A failure
    /// at any step rolls everything back, so an entry can never end up
    /// donated without its donation row.
    ///
    /// Returns `None`, with nothing written, when the entry is not
    /// currently accepted.
    pub async fn record_donation(
        &self,
        request: &BloodRequest,
        data: &CreateDonation,
    ) -> AppResult<Option<Donation>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to start transaction", e)
        })?;

        let entry = sqlx::query_as::<_, MatchEntry>(
            "UPDATE request_matches \
             SET status = 'donated', response_date = COALESCE(response_date, NOW()) \
             WHERE request_id = $1 AND donor_id = $2 AND status = 'accepted' \
             RETURNING *",
        )
        .bind(request.id)
        .bind(data.donor_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update match entry", e))?;

        if entry.is_none() {
            // Dropping the transaction rolls it back.
            return Ok(None);
        }

        let donation = sqlx::query_as::<_, Donation>(
            "INSERT INTO donations (donor_id, request_id, units_donated, notes) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(data.donor_id)
        .bind(request.id)
        .bind(data.units_donated)
        .bind(&data.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record donation", e))?;

        sqlx::query("UPDATE users SET last_donation_date = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(data.donor_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update last donation", e)
            })?;

        let entries = sqlx::query_as::<_, MatchEntry>(
            "SELECT * FROM request_matches WHERE request_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(request.id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load match entries", e))?;

        let donated_units: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(units_donated), 0) FROM donations WHERE request_id = $1",
        )
        .bind(request.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to sum donated units", e))?;

        let status = RequestStatus::derive(&entries, donated_units, request.quantity);
        sqlx::query(
            "UPDATE blood_requests \
             SET status = $2, \
                 completed_at = CASE WHEN $2 = 'completed'::request_status \
                                     THEN COALESCE(completed_at, NOW()) \
                                     ELSE completed_at END, \
                 updated_at = NOW() \
             WHERE id = $1 AND status NOT IN ('completed', 'cancelled')",
        )
        .bind(request.id)
        .bind(status)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update request status", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;
        Ok(Some(donation))
    }

    /// Store a freshly recomputed aggregate status.
    ///
    /// Terminal states are guarded in SQL: a request that reached
    /// completed or cancelled never moves again, regardless of what the
    /// recomputation produced. `completed_at` is stamped exactly once.
    pub async fn apply_status(&self, request_id: Uuid, status: RequestStatus) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE blood_requests \
             SET status = $2, \
                 completed_at = CASE WHEN $2 = 'completed'::request_status \
                                     THEN COALESCE(completed_at, NOW()) \
                                     ELSE completed_at END, \
                 updated_at = NOW() \
             WHERE id = $1 AND status NOT IN ('completed', 'cancelled')",
        )
        .bind(request_id)
        .bind(status)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update request status", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Cancel a request if it has not already reached a terminal state.
    ///
    /// Returns `false` when the request exists but was already completed
    /// or cancelled.
    pub async fn cancel(&self, request_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE blood_requests \
             SET status = 'cancelled', updated_at = NOW() \
             WHERE id = $1 AND status NOT IN ('completed', 'cancelled')",
        )
        .bind(request_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to cancel request", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Page through a requester's own requests, newest first.
    pub async fn list_by_requester(
        &self,
        requester_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<BloodRequest>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM blood_requests WHERE requester_id = $1",
        )
        .bind(requester_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count requests", e))?;

        let items = sqlx::query_as::<_, BloodRequest>(
            "SELECT * FROM blood_requests WHERE requester_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(requester_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list requests", e))?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Page through a donor's pending match entries, most urgent and
    /// newest first.
    pub async fn list_pending_for_donor(
        &self,
        donor_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DonorRequestView>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM request_matches m \
             JOIN blood_requests r ON r.id = m.request_id \
             WHERE m.donor_id = $1 AND m.status = 'pending' \
               AND r.status NOT IN ('completed', 'cancelled')",
        )
        .bind(donor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count pending matches", e)
        })?;

        let items = sqlx::query_as::<_, DonorRequestView>(
            "SELECT m.id AS match_id, m.status AS match_status, m.response_date, \
                    r.id AS request_id, r.patient_name, r.blood_type, r.quantity, \
                    r.urgency, r.status, r.created_at \
             FROM request_matches m \
             JOIN blood_requests r ON r.id = m.request_id \
             WHERE m.donor_id = $1 AND m.status = 'pending' \
               AND r.status NOT IN ('completed', 'cancelled') \
             ORDER BY r.urgency DESC, r.created_at DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(donor_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list pending matches", e)
        })?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Page through a donor's full match history, newest first.
    pub async fn list_history_for_donor(
        &self,
        donor_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DonorRequestView>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM request_matches WHERE donor_id = $1")
                .bind(donor_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count match history", e)
                })?;

        let items = sqlx::query_as::<_, DonorRequestView>(
            "SELECT m.id AS match_id, m.status AS match_status, m.response_date, \
                    r.id AS request_id, r.patient_name, r.blood_type, r.quantity, \
                    r.urgency, r.status, r.created_at \
             FROM request_matches m \
             JOIN blood_requests r ON r.id = m.request_id \
             WHERE m.donor_id = $1 \
             ORDER BY m.created_at DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(donor_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list match history", e)
        })?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
