//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use lifelink_auth::jwt::decoder::JwtDecoder;
use lifelink_core::config::AppConfig;
use lifelink_service::notification::NotificationService;
use lifelink_service::request::RequestService;
use lifelink_service::user::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// JWT token decoder and validator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Account and profile service.
    pub user_service: Arc<UserService>,
    /// Blood request lifecycle service.
    pub request_service: Arc<RequestService>,
    /// Notification inbox service.
    pub notification_service: Arc<NotificationService>,
}
