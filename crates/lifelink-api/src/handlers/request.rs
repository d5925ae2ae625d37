//! Blood request handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use lifelink_core::types::pagination::PageResponse;
use lifelink_entity::request::{BloodRequest, BloodRequestDetail};

use crate::dto::request::{CreateRequestRequest, RecordDonationRequest, RespondRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/requests
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateRequestRequest>,
) -> Result<Json<ApiResponse<BloodRequestDetail>>, ApiError> {
    req.validate()?;
    let detail = state.request_service.create(&auth, req.into_input()?).await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// GET /api/requests
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<BloodRequest>>>, ApiError> {
    let page = params.into_page_request();
    let result = state.request_service.list_mine(&auth, &page).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/requests/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BloodRequestDetail>>, ApiError> {
    let detail = state.request_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// POST /api/requests/{id}/respond
pub async fn respond(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RespondRequest>,
) -> Result<Json<ApiResponse<BloodRequestDetail>>, ApiError> {
    let decision = req.into_decision()?;
    let detail = state.request_service.respond(&auth, id, decision).await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// POST /api/requests/{id}/donations
pub async fn record_donation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RecordDonationRequest>,
) -> Result<Json<ApiResponse<BloodRequestDetail>>, ApiError> {
    req.validate()?;
    let detail = state
        .request_service
        .record_donation(&auth, id, req.into_input())
        .await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// POST /api/requests/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BloodRequest>>, ApiError> {
    let request = state.request_service.cancel(&auth, id).await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// POST /api/requests/{id}/rematch
pub async fn rematch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BloodRequestDetail>>, ApiError> {
    let detail = state.request_service.rematch(&auth, id).await?;
    Ok(Json(ApiResponse::ok(detail)))
}
