//! User self-service handlers.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use lifelink_entity::user::User;

use crate::dto::request::{AvailabilityRequest, UpdateProfileRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.user_service.get_profile(&auth).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/users/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    req.validate()?;
    let user = state
        .user_service
        .update_profile(&auth, req.into_update()?)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/users/me/availability
pub async fn set_availability(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AvailabilityRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .user_service
        .set_availability(&auth, req.available)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}
