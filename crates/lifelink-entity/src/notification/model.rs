//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::category::NotificationCategory;

/// A notification delivered to a user's inbox.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user.
    pub user_id: Uuid,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Category tag.
    pub category: NotificationCategory,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// Related entity ID (e.g. the blood request), if any.
    pub related_entity: Option<Uuid>,
    /// Related entity type ("blood_request", "user", "donation").
    pub related_entity_type: Option<String>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// The content of a notification, before it is addressed to a recipient.
///
/// The fan-out dispatcher turns one message into one notification per
/// recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Category tag.
    pub category: NotificationCategory,
    /// Related entity ID, if any.
    pub related_entity: Option<Uuid>,
    /// Related entity type, if any.
    pub related_entity_type: Option<String>,
}

impl NotificationMessage {
    /// Message sent to each matched donor when a request needs their blood
    /// type.
    pub fn blood_request_match(
        request_id: Uuid,
        blood_type: &str,
        quantity: i32,
        urgent: bool,
    ) -> Self {
        let title = if urgent {
            format!("Urgent: {blood_type} blood needed")
        } else {
            format!("{blood_type} blood needed")
        };
        Self {
            title,
            message: format!(
                "A nearby request needs {quantity} unit(s) of {blood_type} blood. \
                 Open the request to accept or decline."
            ),
            category: NotificationCategory::Request,
            related_entity: Some(request_id),
            related_entity_type: Some("blood_request".to_string()),
        }
    }

    /// Message sent to the requester when a donor responds.
    pub fn donor_response(request_id: Uuid, donor_name: &str, accepted: bool) -> Self {
        let (title, category) = if accepted {
            (
                format!("{donor_name} accepted your blood request"),
                NotificationCategory::Success,
            )
        } else {
            (
                format!("{donor_name} declined your blood request"),
                NotificationCategory::Info,
            )
        };
        Self {
            title,
            message: "Open the request to see the current matching status.".to_string(),
            category,
            related_entity: Some(request_id),
            related_entity_type: Some("blood_request".to_string()),
        }
    }

    /// Welcome message created on registration.
    pub fn welcome(name: &str) -> Self {
        Self {
            title: format!("Welcome to LifeLink, {name}"),
            message: "Complete your profile, set your availability, and explore \
                      blood requests in your area."
                .to_string(),
            category: NotificationCategory::Info,
            related_entity: None,
            related_entity_type: None,
        }
    }
}
