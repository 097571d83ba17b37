//! smt-ui library - suspended-member tracker web service
//!
//! Serves the roster HTTP API: login, CSV upload and reconciliation, and
//! roster annotation, scoped per business location.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;

/// Request bodies above this size are rejected to bound memory use
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
///
/// Member routes require a bearer token; login, health, and build info do
/// not.
pub fn build_router(state: AppState) -> Router {
    use axum::extract::DefaultBodyLimit;
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require authentication)
    let protected = Router::new()
        .route(
            "/api/members/:location",
            get(api::get_members)
                .put(api::replace_members)
                .delete(api::clear_members),
        )
        .route("/api/members/:location/upload", post(api::upload_roster))
        .route("/api/members/:location/annotate", post(api::annotate_member))
        .route("/api/members/:location/delete", post(api::delete_member))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/auth/login", post(api::login))
        .route("/api/build-info", get(api::get_build_info))
        .merge(api::health_routes());

    // Combine routers
    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
