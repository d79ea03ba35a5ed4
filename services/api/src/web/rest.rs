//! services/api/src/web/rest.rs
//!
//! The response payloads shared across handlers and the master definition for
//! the OpenAPI specification.

use chrono::{DateTime, Utc};
use paper_shelf_core::{PaperSummary, SavedPaper, UserId};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::web::{auth, papers, search};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        search::search_handler,
        auth::register_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::status_handler,
        papers::save_paper_handler,
        papers::update_status_handler,
        papers::update_rating_handler,
        papers::remove_one_paper_handler,
        papers::list_user_papers_handler,
    ),
    components(
        schemas(
            MessageResponse,
            SessionResponse,
            PaperSummaryResponse,
            SavedPaperResponse,
            PapersResponse,
            search::SearchForm,
            auth::CredentialsRequest,
            papers::SavePaperRequest,
            papers::UpdateStatusRequest,
            papers::UpdateRatingRequest,
            papers::RemovePaperRequest,
        )
    ),
    tags(
        (name = "Paper Shelf API", description = "Search arXiv and keep a personal reading list.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Structs
//=========================================================================================

/// The body of every plain success or error response.
#[derive(Serialize, ToSchema, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Returned by login and the session status check.
#[derive(Serialize, ToSchema, Debug)]
pub struct SessionResponse {
    pub message: String,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

/// One arXiv search hit.
#[derive(Serialize, ToSchema)]
pub struct PaperSummaryResponse {
    pub title: String,
    pub link: String,
    pub doi: String,
    pub published: String,
    pub summary: String,
    pub first_author: String,
    pub author_affiliation: String,
    /// Always `pending`; a search hit has not been saved yet.
    pub status: String,
}

impl From<PaperSummary> for PaperSummaryResponse {
    fn from(p: PaperSummary) -> Self {
        Self {
            title: p.title,
            link: p.link,
            doi: p.doi,
            published: p.published,
            summary: p.summary,
            first_author: p.first_author,
            author_affiliation: p.author_affiliation,
            status: "pending".to_string(),
        }
    }
}

/// A paper on the caller's reading list.
#[derive(Serialize, ToSchema)]
pub struct SavedPaperResponse {
    pub id: i64,
    pub title: String,
    pub link: String,
    pub doi: String,
    pub published: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub rating: i64,
}

impl From<SavedPaper> for SavedPaperResponse {
    fn from(p: SavedPaper) -> Self {
        Self {
            id: p.id,
            title: p.title,
            link: p.link,
            doi: p.doi,
            published: p.published,
            status: p.status.to_string(),
            created_at: p.created_at,
            updated_at: p.updated_at,
            rating: p.rating,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PapersResponse {
    pub papers: Vec<SavedPaperResponse>,
}
