//! Route definitions for the LifeLink HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(request_routes())
        .merge(donor_routes())
        .merge(notification_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Auth endpoints: register, login, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

/// User self-service endpoints
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(handlers::user::get_profile))
        .route("/users/me", put(handlers::user::update_profile))
        .route(
            "/users/me/availability",
            put(handlers::user::set_availability),
        )
}

/// Blood request lifecycle endpoints
fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/requests", post(handlers::request::create))
        .route("/requests", get(handlers::request::list_mine))
        .route("/requests/{id}", get(handlers::request::get))
        .route("/requests/{id}/respond", post(handlers::request::respond))
        .route(
            "/requests/{id}/donations",
            post(handlers::request::record_donation),
        )
        .route("/requests/{id}/cancel", post(handlers::request::cancel))
        .route("/requests/{id}/rematch", post(handlers::request::rematch))
}

/// Donor-facing views
fn donor_routes() -> Router<AppState> {
    Router::new()
        .route("/donors/me/pending", get(handlers::donor::list_pending))
        .route("/donors/me/matches", get(handlers::donor::list_history))
        .route("/donors/me/donations", get(handlers::donor::list_donations))
}

/// Notification inbox endpoints
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notification::list))
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::notification::delete),
        )
}

/// Health endpoints
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
