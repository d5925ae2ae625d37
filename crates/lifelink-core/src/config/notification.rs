//! Notification dispatch configuration.

use serde::{Deserialize, Serialize};

/// Tunables for notification fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Timeout for delivering a single notification, in seconds.
    #[serde(default = "default_delivery_timeout")]
    pub delivery_timeout_seconds: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            delivery_timeout_seconds: default_delivery_timeout(),
        }
    }
}

fn default_delivery_timeout() -> u64 {
    5
}
