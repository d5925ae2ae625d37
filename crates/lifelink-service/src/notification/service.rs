//! Notification inbox management.

use std::sync::Arc;

use uuid::Uuid;

use lifelink_core::error::AppError;
use lifelink_core::types::pagination::{PageRequest, PageResponse};
use lifelink_database::repositories::notification::NotificationRepository;
use lifelink_entity::notification::Notification;

use crate::context::RequestContext;

/// Manages a user's notification inbox.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification repository.
    notif_repo: Arc<NotificationRepository>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notif_repo: Arc<NotificationRepository>) -> Self {
        Self { notif_repo }
    }

    /// Lists notifications for the current user.
    pub async fn list_notifications(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
        unread_only: bool,
    ) -> Result<PageResponse<Notification>, AppError> {
        self.notif_repo
            .find_by_user(ctx.user_id, page, unread_only)
            .await
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> Result<i64, AppError> {
        self.notif_repo.count_unread(ctx.user_id).await
    }

    /// Marks a notification as read.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: Uuid,
    ) -> Result<(), AppError> {
        let updated = self.notif_repo.mark_read(notification_id, ctx.user_id).await?;
        if !updated {
            return Err(AppError::not_found(format!(
                "Notification {notification_id} not found"
            )));
        }
        Ok(())
    }

    /// Marks all notifications as read for the current user.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        self.notif_repo.mark_all_read(ctx.user_id).await
    }

    /// Deletes a notification from the user's inbox.
    pub async fn delete(&self, ctx: &RequestContext, notification_id: Uuid) -> Result<(), AppError> {
        let deleted = self.notif_repo.delete(notification_id, ctx.user_id).await?;
        if !deleted {
            return Err(AppError::not_found(format!(
                "Notification {notification_id} not found"
            )));
        }
        Ok(())
    }
}
