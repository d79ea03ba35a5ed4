//! services/api/src/web/pages.rs
//!
//! The single HTML entry page. The browser client does the rest over the JSON API.

use axum::{extract::State, http::HeaderMap, response::Html};
use handlebars::Handlebars;
use paper_shelf_core::{SessionUser, UserId};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::error::ApiError;
use crate::web::middleware::current_session;
use crate::web::state::AppState;

const INDEX: &str = "index";

/// Holds the compiled page templates. Values are HTML-escaped on render.
pub struct PageRenderer(Handlebars<'static>);

impl PageRenderer {
    pub fn new() -> Result<Self, ApiError> {
        let mut hb = Handlebars::new();
        hb.set_strict_mode(true);
        hb.register_template_string(INDEX, include_str!("../../templates/index.html"))
            .map_err(|e| ApiError::Internal(format!("Invalid page template: {}", e)))?;
        Ok(Self(hb))
    }

    pub fn index(&self, user: Option<&SessionUser>) -> Result<String, ApiError> {
        #[derive(Serialize)]
        struct Ctx<'a> {
            logged_in: bool,
            user_id: Option<UserId>,
            email: Option<&'a str>,
        }

        let ctx = Ctx {
            logged_in: user.is_some(),
            user_id: user.map(|u| u.user_id),
            email: user.map(|u| u.email.as_str()),
        };
        self.0.render(INDEX, &ctx).map_err(|e| {
            error!("Failed to render index page: {}", e);
            ApiError::Internal(e.to_string())
        })
    }
}

/// GET / and GET /my-papers
pub async fn index_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Html<String>, ApiError> {
    let user = current_session(&state, &headers).await?;
    Ok(Html(state.pages.index(user.as_ref())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_reflects_login_state_and_escapes_email() {
        let pages = PageRenderer::new().unwrap();

        let anonymous = pages.index(None).unwrap();
        assert!(anonymous.contains("Not logged in."));
        assert!(!anonymous.contains("/logout"));

        let user = SessionUser {
            user_id: 7,
            email: "<b>@x.com".to_string(),
        };
        let signed_in = pages.index(Some(&user)).unwrap();
        assert!(signed_in.contains(r#"data-user-id="7""#));
        assert!(signed_in.contains("&lt;b&gt;@x.com"));
        assert!(!signed_in.contains("<b>@x.com"));
        assert!(signed_in.contains("/logout"));
    }
}
