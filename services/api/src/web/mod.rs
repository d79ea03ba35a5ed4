pub mod auth;
pub mod extract;
pub mod middleware;
pub mod pages;
pub mod papers;
pub mod rest;
pub mod search;
pub mod state;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use middleware::require_auth;
use rest::ApiDoc;
use state::AppState;

/// Builds the full application router: public pages and auth, the
/// session-protected reading list, and the Swagger UI.
pub fn router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(app_state.config.cors_origin.clone())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(pages::index_handler))
        .route("/my-papers", get(pages::index_handler))
        .route("/search", post(search::search_handler))
        .route("/register", post(auth::register_handler))
        .route("/login", post(auth::login_handler))
        .route("/logout", get(auth::logout_handler))
        .route("/auth/status", post(auth::status_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/save_paper", post(papers::save_paper_handler))
        .route("/update_status", post(papers::update_status_handler))
        .route("/update_rating", post(papers::update_rating_handler))
        .route("/remove_one_paper", post(papers::remove_one_paper_handler))
        .route("/{user_id}/papers/", get(papers::list_user_papers_handler))
        .route("/{user_id}/papers", get(papers::list_user_papers_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
