//! Notification fan-out and inbox management.

pub mod dispatch;
pub mod service;

pub use dispatch::{DeliveryChannel, DispatchReport, InAppChannel, NotificationDispatcher};
pub use service::NotificationService;
