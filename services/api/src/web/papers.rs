//! services/api/src/web/papers.rs
//!
//! Reading-list endpoints. The acting user always comes from the session; a
//! `userId` in the body is only checked against it.

use axum::{extract::State, Extension, Json};
use paper_shelf_core::{NewPaper, PortError, SessionUser, UserId};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::extract::{JsonBody, PathParam};
use crate::web::rest::{MessageResponse, PapersResponse, SavedPaperResponse};
use crate::web::state::AppState;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SavePaperRequest {
    pub paper_title: Option<String>,
    pub doi: Option<String>,
    pub paper_link: Option<String>,
    pub published: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// Optional; must match the session's user when present.
    #[serde(rename = "userId")]
    #[schema(value_type = Option<i64>)]
    pub user_id: Option<Value>,
    pub doi: Option<String>,
    /// One of `pending`, `in_progress`, `completed`.
    pub status: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateRatingRequest {
    /// Optional; must match the session's user when present.
    #[serde(rename = "userId")]
    #[schema(value_type = Option<i64>)]
    pub user_id: Option<Value>,
    pub doi: Option<String>,
    /// Clamped into 0..=5.
    #[schema(value_type = Option<i64>)]
    pub rating: Option<Value>,
}

#[derive(Deserialize, ToSchema)]
pub struct RemovePaperRequest {
    pub doi: Option<String>,
}

//=========================================================================================
// Payload Helpers
//=========================================================================================

/// Accepts a JSON number or a numeric string.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.round() as i64),
        _ => None,
    }
}

/// Refuses a body that names a different user than the session does.
fn ensure_same_user(claimed: Option<&Value>, session: &SessionUser) -> Result<(), ApiError> {
    match claimed {
        None | Some(Value::Null) => Ok(()),
        Some(value) => match as_integer(value) {
            Some(id) if id == session.user_id => Ok(()),
            Some(_) => Err(ApiError::Forbidden(
                "Not authorized to modify this paper.".to_string(),
            )),
            None => Err(ApiError::Validation("userId must be a number.".to_string())),
        },
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Save a search result to the caller's reading list.
#[utoipa::path(
    post,
    path = "/save_paper",
    request_body = SavePaperRequest,
    responses(
        (status = 200, description = "Paper saved", body = MessageResponse),
        (status = 400, description = "Already saved, or title/link missing", body = MessageResponse),
        (status = 401, description = "No session", body = MessageResponse),
    )
)]
pub async fn save_paper_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    JsonBody(req): JsonBody<SavePaperRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let paper = NewPaper {
        title: req.paper_title.unwrap_or_default(),
        doi: req.doi.unwrap_or_default(),
        link: req.paper_link.unwrap_or_default(),
        published: req.published.filter(|p| !p.trim().is_empty()),
    };

    state.reading_list().save_paper(user.user_id, paper).await?;

    Ok(Json(MessageResponse::new("Paper saved successfully!")))
}

/// Move a saved paper to another workflow status.
#[utoipa::path(
    post,
    path = "/update_status",
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
        (status = 400, description = "Invalid status value", body = MessageResponse),
        (status = 403, description = "userId does not match the session", body = MessageResponse),
        (status = 404, description = "Paper not found", body = MessageResponse),
    )
)]
pub async fn update_status_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    JsonBody(req): JsonBody<UpdateStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    ensure_same_user(req.user_id.as_ref(), &user)?;

    let doi = req.doi.unwrap_or_default();
    let status = req.status.unwrap_or_default();
    state
        .reading_list()
        .update_status(user.user_id, &doi, &status)
        .await?;

    Ok(Json(MessageResponse::new("Status updated successfully!")))
}

/// Rate a saved paper.
#[utoipa::path(
    post,
    path = "/update_rating",
    request_body = UpdateRatingRequest,
    responses(
        (status = 200, description = "Rating updated", body = MessageResponse),
        (status = 400, description = "Missing doi or rating", body = MessageResponse),
        (status = 403, description = "userId does not match the session", body = MessageResponse),
        (status = 404, description = "Paper not found", body = MessageResponse),
    )
)]
pub async fn update_rating_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    JsonBody(req): JsonBody<UpdateRatingRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    ensure_same_user(req.user_id.as_ref(), &user)?;

    let doi = req.doi.unwrap_or_default();
    let rating = req.rating.as_ref().and_then(as_integer);
    let Some(rating) = rating.filter(|_| !doi.trim().is_empty()) else {
        return Err(ApiError::Validation(
            "Paper DOI and rating are required.".to_string(),
        ));
    };

    state
        .reading_list()
        .update_rating(user.user_id, &doi, rating)
        .await?;

    Ok(Json(MessageResponse::new("Rating updated successfully!")))
}

/// Drop a paper from the caller's reading list.
#[utoipa::path(
    post,
    path = "/remove_one_paper",
    request_body = RemovePaperRequest,
    responses(
        (status = 200, description = "Paper removed", body = MessageResponse),
        (status = 400, description = "Missing doi", body = MessageResponse),
        (status = 404, description = "Paper not found or not owned by user", body = MessageResponse),
    )
)]
pub async fn remove_one_paper_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    JsonBody(req): JsonBody<RemovePaperRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let doi = req.doi.unwrap_or_default();
    state.reading_list().remove_paper(user.user_id, &doi).await?;

    Ok(Json(MessageResponse::new("Paper removed successfully!")))
}

/// List a user's reading list. Only the session owner may read it.
#[utoipa::path(
    get,
    path = "/{user_id}/papers/",
    params(
        ("user_id" = i64, Path, description = "The owner of the reading list.")
    ),
    responses(
        (status = 200, description = "The user's saved papers", body = PapersResponse),
        (status = 401, description = "No session", body = MessageResponse),
        (status = 403, description = "Another user's list", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse),
    )
)]
pub async fn list_user_papers_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    PathParam(user_id): PathParam<UserId>,
) -> Result<Json<PapersResponse>, ApiError> {
    if user_id != user.user_id {
        return Err(ApiError::Forbidden(
            "Not authorized to access these papers.".to_string(),
        ));
    }

    match state.db.get_user(user_id).await {
        Ok(_) => {}
        Err(PortError::NotFound(_)) => return Err(ApiError::NotFound("User not found".to_string())),
        Err(e) => return Err(e.into()),
    }

    let papers = state.reading_list().list_papers(user_id).await?;

    Ok(Json(PapersResponse {
        papers: papers.into_iter().map(SavedPaperResponse::from).collect(),
    }))
}
