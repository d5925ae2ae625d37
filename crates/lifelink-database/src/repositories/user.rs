//! User repository implementation, including the bounded donor-candidate
//! query used by the matching engine.

use sqlx::PgPool;
use uuid::Uuid;

use lifelink_core::error::{AppError, ErrorKind};
use lifelink_core::result::AppResult;
use lifelink_core::types::geo::GeoPoint;
use lifelink_entity::blood::BloodType;
use lifelink_entity::user::{CreateUser, DonorCandidate, UpdateProfile, User};

/// Repository for user CRUD and donor queries.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    /// Create a new user.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, phone, role, blood_type) \
             VALUES ($1, LOWER($2), $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.phone)
        .bind(data.role)
        .bind(data.blood_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::conflict("Email already in use".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }

    /// Update a user's profile fields.
    pub async fn update_profile(&self, data: &UpdateProfile) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET phone = COALESCE($2, phone), \
                              blood_type = COALESCE($3, blood_type), \
                              address = COALESCE($4, address), \
                              city = COALESCE($5, city), \
                              longitude = COALESCE($6, longitude), \
                              latitude = COALESCE($7, latitude), \
                              availability = COALESCE($8, availability), \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(data.id)
        .bind(&data.phone)
        .bind(data.blood_type)
        .bind(&data.address)
        .bind(&data.city)
        .bind(data.longitude)
        .bind(data.latitude)
        .bind(data.availability)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update profile", e))?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", data.id)))
    }

    /// Find matchable donor candidates for a request, bounded and ordered.
    ///
    /// A single query combines the compatibility/availability/activity
    /// filters with the geographic radius, so the full donor population is
    /// never scanned in process. With an origin, candidates are ordered by
    /// ascending haversine distance (donor id breaks ties); without one the
    /// radius filter is skipped and ordering falls back to donor id.
    ///
    /// Donors that already have a match entry on `request_id` are excluded,
    /// which both prevents duplicates on re-matching and guarantees a donor
    /// who declined or donated is never re-surfaced.
    pub async fn find_donor_candidates(
        &self,
        compatible_types: &[BloodType],
        origin: Option<GeoPoint>,
        radius_meters: f64,
        exclude_request: Uuid,
        limit: i64,
    ) -> AppResult<Vec<DonorCandidate>> {
        let rows = match origin {
            Some(point) => {
                sqlx::query_as::<_, DonorCandidate>(
                    "SELECT id, name, email, phone, blood_type, longitude, latitude, distance_meters \
                     FROM ( \
                         SELECT u.id, u.name, u.email, u.phone, u.blood_type, u.longitude, u.latitude, \
                                2.0 * 6371000.0 * asin(sqrt( \
                                    pow(sin(radians(u.latitude - $2) / 2.0), 2) + \
                                    cos(radians($2)) * cos(radians(u.latitude)) * \
                                    pow(sin(radians(u.longitude - $3) / 2.0), 2))) AS distance_meters \
                         FROM users u \
                         WHERE u.role = 'donor' \
                           AND u.blood_type = ANY($1) \
                           AND u.availability = TRUE \
                           AND u.is_active = TRUE \
                           AND u.latitude IS NOT NULL \
                           AND u.longitude IS NOT NULL \
                           AND NOT EXISTS ( \
                               SELECT 1 FROM request_matches m \
                               WHERE m.request_id = $4 AND m.donor_id = u.id) \
                     ) candidates \
                     WHERE distance_meters <= $5 \
                     ORDER BY distance_meters ASC, id ASC \
                     LIMIT $6",
                )
                .bind(compatible_types)
                .bind(point.latitude)
                .bind(point.longitude)
                .bind(exclude_request)
                .bind(radius_meters)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, DonorCandidate>(
                    "SELECT u.id, u.name, u.email, u.phone, u.blood_type, u.longitude, u.latitude, \
                            NULL::double precision AS distance_meters \
                     FROM users u \
                     WHERE u.role = 'donor' \
                       AND u.blood_type = ANY($1) \
                       AND u.availability = TRUE \
                       AND u.is_active = TRUE \
                       AND NOT EXISTS ( \
                           SELECT 1 FROM request_matches m \
                           WHERE m.request_id = $2 AND m.donor_id = u.id) \
                     ORDER BY u.id ASC \
                     LIMIT $3",
                )
                .bind(compatible_types)
                .bind(exclude_request)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        };

        rows.map_err(|e| {
            AppError::with_source(ErrorKind::Retrieval, "Donor candidate query failed", e)
        })
    }
}
