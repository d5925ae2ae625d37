//! Notification category tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category tag shown in the notification inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    /// General information.
    Info,
    /// Attention required.
    Alert,
    /// A blood request event.
    Request,
    /// A positive outcome.
    Success,
    /// A cautionary note.
    Warning,
}

impl NotificationCategory {
    /// Return the category as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Alert => "alert",
            Self::Request => "request",
            Self::Success => "success",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
