//! services/api/src/web/search.rs
//!
//! Keyword search against the external paper source.

use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::extract::FormBody;
use crate::web::rest::{MessageResponse, PaperSummaryResponse};
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema, Default)]
pub struct SearchForm {
    pub keyword: Option<String>,
    /// Positive integer; falls back to the configured default.
    pub max_results: Option<String>,
}

fn parse_max_results(raw: Option<&str>, default: u32) -> Result<u32, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                ApiError::Validation("max_results must be a positive integer.".to_string())
            }),
    }
}

/// POST /search - Query arXiv for papers matching a keyword
#[utoipa::path(
    post,
    path = "/search",
    request_body(content = SearchForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Matching papers, newest submission first", body = [PaperSummaryResponse]),
        (status = 400, description = "Missing keyword or bad max_results", body = MessageResponse),
        (status = 500, description = "The paper source failed", body = MessageResponse),
    )
)]
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    FormBody(form): FormBody<SearchForm>,
) -> Result<Json<Vec<PaperSummaryResponse>>, ApiError> {
    let keyword = form.keyword.as_deref().map(str::trim).unwrap_or_default();
    if keyword.is_empty() {
        return Err(ApiError::Validation("Keyword is required.".to_string()));
    }
    let max_results =
        parse_max_results(form.max_results.as_deref(), state.config.default_max_results)?;

    let papers = state.paper_source.search(keyword, max_results).await?;
    info!("Search for '{}' returned {} papers", keyword, papers.len());

    Ok(Json(
        papers.into_iter().map(PaperSummaryResponse::from).collect(),
    ))
}
