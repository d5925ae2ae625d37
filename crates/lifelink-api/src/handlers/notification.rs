//! Notification inbox handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use lifelink_core::types::pagination::PageResponse;
use lifelink_entity::notification::Notification;

use crate::dto::response::{ApiResponse, MessageResponse, UnreadCountResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// Extra query parameters for notification listing.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationFilter {
    /// Only return unread notifications.
    #[serde(default)]
    pub unread_only: bool,
}

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<NotificationFilter>,
) -> Result<Json<ApiResponse<PageResponse<Notification>>>, ApiError> {
    let page = params.into_page_request();
    let result = state
        .notification_service
        .list_notifications(&auth, &page, filter.unread_only)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UnreadCountResponse>>, ApiError> {
    let unread = state.notification_service.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(UnreadCountResponse { unread })))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.notification_service.mark_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Notification marked as read".to_string(),
    })))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let updated = state.notification_service.mark_all_read(&auth).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: format!("{updated} notifications marked as read"),
    })))
}

/// DELETE /api/notifications/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.notification_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Notification deleted".to_string(),
    })))
}
