//! Login endpoint and authentication middleware
//!
//! A successful login mints a bearer token; the middleware resolves that
//! token to the owning account and attaches it to the request, so every
//! handler works with an explicit identity instead of ambient state.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use smt_common::db::{sessions, users, User};
use tracing::warn;

use crate::AppState;

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response: bearer token plus the account it belongs to
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/login
///
/// Verifies the credentials and mints a session token. Unknown usernames
/// and wrong passwords are indistinguishable to the client.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let user = users::authenticate(&state.db, &request.username, &request.password)
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or_else(|| {
            warn!("Failed login attempt for '{}'", request.username);
            AuthError::InvalidCredentials
        })?;

    let token = sessions::create_session(&state.db, &user.guid)
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    Ok(Json(LoginResponse { token, user }))
}

/// Authentication middleware for member routes.
///
/// Resolves `Authorization: Bearer <token>` to a [`User`] and inserts it
/// into request extensions. Returns 401 for missing, unknown, or expired
/// tokens. Location-level access is checked per handler, after this.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)?;

    let user = sessions::lookup_user(&state.db, token)
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or(AuthError::InvalidToken)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    MissingCredentials,
    InvalidCredentials,
    MissingToken,
    InvalidToken,
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => (
                StatusCode::BAD_REQUEST,
                "Username and password are required".to_string(),
            ),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".to_string(),
            ),
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired session".to_string(),
            ),
            AuthError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Authentication error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
