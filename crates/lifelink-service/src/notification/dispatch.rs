//! Notification fan-out to a set of recipients.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use lifelink_core::config::notification::NotificationConfig;
use lifelink_core::result::AppResult;
use lifelink_database::repositories::notification::NotificationRepository;
use lifelink_entity::notification::NotificationMessage;

/// A channel that can deliver one notification to one recipient.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Deliver `message` to `user_id`.
    async fn deliver(&self, user_id: Uuid, message: &NotificationMessage) -> AppResult<()>;
}

/// Delivery into the recipient's in-app inbox.
#[derive(Debug, Clone)]
pub struct InAppChannel {
    notif_repo: Arc<NotificationRepository>,
}

impl InAppChannel {
    /// Creates a new in-app channel.
    pub fn new(notif_repo: Arc<NotificationRepository>) -> Self {
        Self { notif_repo }
    }
}

#[async_trait]
impl DeliveryChannel for InAppChannel {
    async fn deliver(&self, user_id: Uuid, message: &NotificationMessage) -> AppResult<()> {
        self.notif_repo.create(user_id, message).await?;
        Ok(())
    }
}

/// Outcome of one fan-out batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Recipients delivered to.
    pub sent: usize,
    /// Recipients whose delivery failed or timed out.
    pub failed: Vec<Uuid>,
}

impl DispatchReport {
    /// Whether every recipient was delivered to.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fans one message out to many recipients.
///
/// Fan-out is best-effort: each recipient is attempted independently
/// under its own timeout, failures are logged and counted but never
/// propagate to the caller. A notification batch must not fail the
/// operation that triggered it.
#[derive(Clone)]
pub struct NotificationDispatcher {
    channel: Arc<dyn DeliveryChannel>,
    delivery_timeout: Duration,
}

impl NotificationDispatcher {
    /// Creates a new dispatcher over the given channel.
    pub fn new(channel: Arc<dyn DeliveryChannel>, config: &NotificationConfig) -> Self {
        Self {
            channel,
            delivery_timeout: Duration::from_secs(config.delivery_timeout_seconds),
        }
    }

    /// Deliver `message` to every recipient, concurrently.
    pub async fn notify_all(
        &self,
        recipients: &[Uuid],
        message: &NotificationMessage,
    ) -> DispatchReport {
        let deliveries = recipients.iter().map(|&user_id| async move {
            let attempt = self.channel.deliver(user_id, message);
            match tokio::time::timeout(self.delivery_timeout, attempt).await {
                Ok(Ok(())) => None,
                Ok(Err(e)) => {
                    warn!(%user_id, error = %e, "Notification delivery failed");
                    Some(user_id)
                }
                Err(_) => {
                    warn!(%user_id, "Notification delivery timed out");
                    Some(user_id)
                }
            }
        });

        let failed: Vec<Uuid> = futures::future::join_all(deliveries)
            .await
            .into_iter()
            .flatten()
            .collect();

        let report = DispatchReport {
            sent: recipients.len() - failed.len(),
            failed,
        };
        info!(
            sent = report.sent,
            failed = report.failed.len(),
            title = %message.title,
            "Notification fan-out finished"
        );
        report
    }

    /// Deliver `message` to a single recipient, best-effort.
    pub async fn notify_one(&self, user_id: Uuid, message: &NotificationMessage) -> DispatchReport {
        self.notify_all(&[user_id], message).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use lifelink_core::error::AppError;
    use lifelink_entity::notification::NotificationCategory;

    struct MockChannel {
        delivered: Mutex<Vec<Uuid>>,
        fail_for: Vec<Uuid>,
        hang_for: Vec<Uuid>,
    }

    impl MockChannel {
        fn new() -> Self {
            Self {
                delivered: Mutex::new(Vec::new()),
                fail_for: Vec::new(),
                hang_for: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl DeliveryChannel for MockChannel {
        async fn deliver(&self, user_id: Uuid, _message: &NotificationMessage) -> AppResult<()> {
            if self.hang_for.contains(&user_id) {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            if self.fail_for.contains(&user_id) {
                return Err(AppError::delivery("mock delivery failure"));
            }
            self.delivered.lock().unwrap().push(user_id);
            Ok(())
        }
    }

    fn message() -> NotificationMessage {
        NotificationMessage {
            title: "test".to_string(),
            message: "test".to_string(),
            category: NotificationCategory::Info,
            related_entity: None,
            related_entity_type: None,
        }
    }

    fn dispatcher(channel: MockChannel) -> NotificationDispatcher {
        NotificationDispatcher::new(
            Arc::new(channel),
            &NotificationConfig {
                delivery_timeout_seconds: 1,
            },
        )
    }

    #[tokio::test]
    async fn test_all_recipients_delivered() {
        let recipients: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let report = dispatcher(MockChannel::new())
            .notify_all(&recipients, &message())
            .await;
        assert_eq!(report.sent, 3);
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_partial_failure_is_reported_not_raised() {
        let ok = Uuid::new_v4();
        let bad = Uuid::new_v4();
        let mut channel = MockChannel::new();
        channel.fail_for.push(bad);

        let report = dispatcher(channel).notify_all(&[ok, bad], &message()).await;
        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, vec![bad]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_delivery_times_out() {
        let slow = Uuid::new_v4();
        let fast = Uuid::new_v4();
        let mut channel = MockChannel::new();
        channel.hang_for.push(slow);

        let report = dispatcher(channel)
            .notify_all(&[slow, fast], &message())
            .await;
        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, vec![slow]);
    }

    #[tokio::test]
    async fn test_empty_recipient_list_is_a_noop() {
        let report = dispatcher(MockChannel::new()).notify_all(&[], &message()).await;
        assert_eq!(report.sent, 0);
        assert!(report.is_complete());
    }
}
