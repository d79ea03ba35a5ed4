//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes, plus the cookie helpers the
//! public auth endpoints share with it.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use paper_shelf_core::{ports::PortError, SessionUser};
use std::sync::Arc;
use tracing::error;

use crate::error::ApiError;
use crate::web::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Pulls the session id out of the `Cookie` header(s), if any.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|h| h.split(';'))
        .find_map(|c| {
            let (name, value) = c.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then_some(value)
        })
}

/// Resolves the caller's session without requiring one.
pub async fn current_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<SessionUser>, ApiError> {
    let Some(session_id) = session_id_from_headers(headers) else {
        return Ok(None);
    };

    match state.db.validate_auth_session(session_id).await {
        Ok(user) => Ok(Some(user)),
        Err(PortError::NotFound(_)) => Ok(None),
        Err(e) => {
            error!("Failed to validate auth session: {:?}", e);
            Err(e.into())
        }
    }
}

/// Middleware that validates the auth session cookie and extracts the caller.
///
/// If valid, inserts the `SessionUser` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = current_session(&state, req.headers())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Authentication required.".to_string()))?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
