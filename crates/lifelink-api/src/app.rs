//! Application builder — wires repositories, services, router, and
//! middleware into a running Axum server.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use lifelink_auth::jwt::decoder::JwtDecoder;
use lifelink_auth::jwt::encoder::JwtEncoder;
use lifelink_auth::password::hasher::PasswordHasher;
use lifelink_core::config::AppConfig;
use lifelink_core::error::AppError;
use lifelink_database::repositories::donation::DonationRepository;
use lifelink_database::repositories::notification::NotificationRepository;
use lifelink_database::repositories::request::RequestRepository;
use lifelink_database::repositories::user::UserRepository;
use lifelink_service::matching::DonorMatcher;
use lifelink_service::notification::{
    DeliveryChannel, InAppChannel, NotificationDispatcher, NotificationService,
};
use lifelink_service::request::RequestService;
use lifelink_service::user::UserService;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes as usize;
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
}

/// Wires all dependencies into an `AppState`.
///
/// Construction is explicit dependency injection: repositories first,
/// then auth primitives, then the matcher and dispatcher, then services.
pub fn build_state(config: AppConfig, db_pool: PgPool) -> AppState {
    let config = Arc::new(config);

    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let request_repo = Arc::new(RequestRepository::new(db_pool.clone()));
    let donation_repo = Arc::new(DonationRepository::new(db_pool.clone()));
    let notification_repo = Arc::new(NotificationRepository::new(db_pool.clone()));

    let password_hasher = PasswordHasher::new(config.auth.min_password_length);
    let jwt_encoder = JwtEncoder::new(&config.auth);
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    let matcher = Arc::new(DonorMatcher::new(
        Arc::clone(&user_repo),
        config.matching.clone(),
    ));
    let channel: Arc<dyn DeliveryChannel> =
        Arc::new(InAppChannel::new(Arc::clone(&notification_repo)));
    let dispatcher = Arc::new(NotificationDispatcher::new(channel, &config.notifications));

    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&dispatcher),
        password_hasher,
        jwt_encoder,
    ));
    let request_service = Arc::new(RequestService::new(
        Arc::clone(&request_repo),
        Arc::clone(&donation_repo),
        matcher,
        dispatcher,
    ));
    let notification_service = Arc::new(NotificationService::new(notification_repo));

    AppState {
        config,
        db_pool,
        jwt_decoder,
        user_service,
        request_service,
        notification_service,
    }
}

/// Runs the LifeLink server with the given configuration and database pool.
///
/// Serves until SIGINT/SIGTERM, then drains in-flight requests.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    let state = build_state(config, db_pool);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {bind_addr}: {e}")))?;

    tracing::info!(addr = %bind_addr, "LifeLink server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Server shut down cleanly");
    Ok(())
}

/// Resolves when SIGINT (Ctrl+C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
