//! Donor-facing handlers: pending matches, match history, donations.

use axum::Json;
use axum::extract::{Query, State};

use lifelink_core::types::pagination::PageResponse;
use lifelink_entity::donation::Donation;
use lifelink_entity::request::DonorRequestView;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/donors/me/pending
pub async fn list_pending(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<DonorRequestView>>>, ApiError> {
    let page = params.into_page_request();
    let result = state
        .request_service
        .list_pending_for_donor(&auth, &page)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/donors/me/matches
pub async fn list_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<DonorRequestView>>>, ApiError> {
    let page = params.into_page_request();
    let result = state
        .request_service
        .list_history_for_donor(&auth, &page)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/donors/me/donations
pub async fn list_donations(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Donation>>>, ApiError> {
    let page = params.into_page_request();
    let result = state
        .request_service
        .list_donations_for_donor(&auth, &page)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}
