//! Donation repository.

use sqlx::PgPool;
use uuid::Uuid;

use lifelink_core::error::{AppError, ErrorKind};
use lifelink_core::result::AppResult;
use lifelink_core::types::pagination::{PageRequest, PageResponse};
use lifelink_entity::donation::Donation;

/// Repository for reading donation records.
///
/// Donations are written through `RequestRepository::record_donation`,
/// inside the same transaction as the match entry transition.
#[derive(Debug, Clone)]
pub struct DonationRepository {
    pool: PgPool,
}

impl DonationRepository {
    /// Create a new donation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Total units donated against a request so far.
    pub async fn sum_units_for_request(&self, request_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(units_donated), 0) FROM donations WHERE request_id = $1",
        )
        .bind(request_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to sum donated units", e))
    }

    /// Page through a donor's donation history, newest first.
    pub async fn list_by_donor(
        &self,
        donor_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Donation>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM donations WHERE donor_id = $1")
            .bind(donor_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count donations", e)
            })?;

        let items = sqlx::query_as::<_, Donation>(
            "SELECT * FROM donations WHERE donor_id = $1 \
             ORDER BY donation_date DESC LIMIT $2 OFFSET $3",
        )
        .bind(donor_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list donations", e))?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
