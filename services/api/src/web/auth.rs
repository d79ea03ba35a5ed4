//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for registration, login, logout and session status.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use bytes::Bytes;
use chrono::{Duration, Utc};
use paper_shelf_core::AuthSession;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::extract::JsonBody;
use crate::web::middleware::{current_session, session_id_from_headers, SESSION_COOKIE};
use crate::web::rest::{MessageResponse, SessionResponse};
use crate::web::state::AppState;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema, Default)]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

//=========================================================================================
// Cookie Helpers
//=========================================================================================

fn session_cookie(state: &AppState, session_id: &str) -> String {
    let max_age = Duration::days(state.config.session_ttl_days).num_seconds();
    let secure = if state.config.cookie_secure { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
        SESSION_COOKIE, session_id, max_age, secure
    )
}

fn cleared_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /register - Create a new user account
#[utoipa::path(
    post,
    path = "/register",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "User registered", body = MessageResponse),
        (status = 400, description = "Weak password, email taken or missing fields", body = MessageResponse),
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let user = state.accounts().register(&email, &password).await?;
    info!("Registered user {}", user.id);

    Ok(Json(MessageResponse::new(
        "Registration successful! Please log in.",
    )))
}

/// POST /login - Login with existing account
///
/// A caller that already holds a valid session is told so without re-authenticating.
#[utoipa::path(
    post,
    path = "/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login successful or already logged in", body = SessionResponse),
        (status = 400, description = "Missing email or password", body = MessageResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    // 1. Short-circuit on an existing session
    if let Some(existing) = current_session(&state, &headers).await? {
        return Ok(Json(SessionResponse {
            message: "Already logged in.".to_string(),
            user_id: Some(existing.user_id),
        })
        .into_response());
    }

    // 2. An empty or unreadable body is the same as missing credentials
    let req: CredentialsRequest = serde_json::from_slice(&body).unwrap_or_default();
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    // 3. Verify credentials
    let user = state.accounts().authenticate(&email, &password).await?;

    // 4. Create auth session in database
    let session = AuthSession {
        id: Uuid::new_v4().to_string(),
        user_id: user.id,
        expires_at: Utc::now() + Duration::days(state.config.session_ttl_days),
    };
    state.db.create_auth_session(&session).await.map_err(|e| {
        error!("Failed to create auth session: {:?}", e);
        ApiError::from(e)
    })?;
    info!("User {} logged in", user.id);

    // 5. Return response with cookie
    Ok((
        [(header::SET_COOKIE, session_cookie(&state, &session.id))],
        Json(SessionResponse {
            message: "Login successful.".to_string(),
            user_id: Some(user.id),
        }),
    )
        .into_response())
}

/// GET /logout - Clear the session and go back to the index page
#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 303, description = "Session cleared; redirects to /"),
    )
)]
pub async fn logout_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(session_id) = session_id_from_headers(&headers) {
        if let Err(e) = state.db.delete_auth_session(session_id).await {
            error!("Failed to delete auth session: {:?}", e);
        }
    }

    ([(header::SET_COOKIE, cleared_cookie())], Redirect::to("/")).into_response()
}

/// POST /auth/status - Report whether the caller holds a valid session
#[utoipa::path(
    post,
    path = "/auth/status",
    responses(
        (status = 200, description = "Session state", body = SessionResponse),
    )
)]
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, ApiError> {
    let response = match current_session(&state, &headers).await? {
        Some(user) => SessionResponse {
            message: "Already logged in.".to_string(),
            user_id: Some(user.user_id),
        },
        None => SessionResponse {
            message: "Not logged in.".to_string(),
            user_id: None,
        },
    };
    Ok(Json(response))
}
