//! Candidate search for a blood request.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use lifelink_core::config::matching::MatchingConfig;
use lifelink_core::error::AppError;
use lifelink_core::result::AppResult;
use lifelink_database::repositories::user::UserRepository;
use lifelink_entity::request::{BloodRequest, Urgency};
use lifelink_entity::user::DonorCandidate;

use super::compatibility::compatible_donor_types;

/// Finds eligible donors for a blood request.
///
/// All eligibility rules (blood type, availability, activity, radius) are
/// pushed into a single bounded repository query; the matcher decides the
/// policy inputs — compatible types and search radius — and enforces the
/// query timeout.
#[derive(Debug, Clone)]
pub struct DonorMatcher {
    /// User repository for the candidate query.
    user_repo: Arc<UserRepository>,
    /// Matching tunables.
    config: MatchingConfig,
}

impl DonorMatcher {
    /// Creates a new matcher.
    pub fn new(user_repo: Arc<UserRepository>, config: MatchingConfig) -> Self {
        Self { user_repo, config }
    }

    /// Search radius for an urgency tier, in meters.
    ///
    /// Urgent-tier requests (high or critical) search a narrower radius so
    /// the surfaced donors are faster to reach.
    pub fn radius_for(&self, urgency: Urgency) -> f64 {
        if urgency.is_urgent() {
            self.config.urgent_radius_meters
        } else {
            self.config.normal_radius_meters
        }
    }

    /// Find candidate donors for a request.
    ///
    /// Requests without a usable origin skip the radius filter and fall
    /// back to compatibility-only matching. The query runs under a
    /// timeout; exceeding it surfaces as a retrieval error for the caller
    /// to degrade on.
    pub async fn find_candidates(&self, request: &BloodRequest) -> AppResult<Vec<DonorCandidate>> {
        let compatible = compatible_donor_types(request.blood_type);
        let origin = request.origin();
        let radius = self.radius_for(request.urgency);

        if origin.is_none() {
            debug!(request_id = %request.id, "Request has no origin; matching without radius filter");
        }

        let query = self.user_repo.find_donor_candidates(
            &compatible,
            origin,
            radius,
            request.id,
            self.config.max_results,
        );

        let candidates =
            match tokio::time::timeout(Duration::from_secs(self.config.match_timeout_seconds), query)
                .await
            {
                Ok(result) => result?,
                Err(_) => {
                    warn!(
                        request_id = %request.id,
                        timeout_seconds = self.config.match_timeout_seconds,
                        "Donor candidate query timed out"
                    );
                    return Err(AppError::retrieval("Donor candidate query timed out"));
                }
            };

        debug!(
            request_id = %request.id,
            candidates = candidates.len(),
            radius_meters = radius,
            "Matching pass finished"
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> DonorMatcher {
        let pool = sqlx::postgres::PgPoolOptions::new().connect_lazy("postgres://localhost/unused");
        DonorMatcher::new(
            Arc::new(UserRepository::new(pool.unwrap())),
            MatchingConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_urgent_tiers_get_the_narrow_radius() {
        let m = matcher();
        assert_eq!(m.radius_for(Urgency::High), 50_000.0);
        assert_eq!(m.radius_for(Urgency::Critical), 50_000.0);
    }

    #[tokio::test]
    async fn test_normal_tiers_get_the_wide_radius() {
        let m = matcher();
        assert_eq!(m.radius_for(Urgency::Low), 100_000.0);
        assert_eq!(m.radius_for(Urgency::Medium), 100_000.0);
    }
}
