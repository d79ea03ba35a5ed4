//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service, and how each
//! variant is turned into an HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use paper_shelf_core::{error::ShelfError, ports::PortError};
use tracing::error;

use crate::config::ConfigError;
use crate::web::rest::MessageResponse;

const UPSTREAM_MESSAGE: &str = "Failed to fetch papers. Please try again later.";
const INTERNAL_MESSAGE: &str = "An unexpected error occurred.";

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A domain rule rejected the request.
    #[error(transparent)]
    Shelf(#[from] ShelfError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad or missing input caught at the HTTP boundary.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    /// The caller named a user other than the one in their session.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
            ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ApiError::Shelf(e) => match e {
                ShelfError::WeakPassword
                | ShelfError::EmailTaken
                | ShelfError::MissingCredentials
                | ShelfError::DuplicateForUser
                | ShelfError::MissingPaperFields
                | ShelfError::InvalidStatus(_)
                | ShelfError::MissingIdentifier => (StatusCode::BAD_REQUEST, e.to_string()),
                ShelfError::InvalidCredentials => (StatusCode::UNAUTHORIZED, e.to_string()),
                ShelfError::NotFound => (StatusCode::NOT_FOUND, e.to_string()),
                ShelfError::Port(port) => port_status_and_message(port),
            },
            ApiError::Port(port) => port_status_and_message(port),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string()),
        }
    }
}

fn port_status_and_message(e: &PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found.".to_string()),
        PortError::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            "Authentication required.".to_string(),
        ),
        PortError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_MESSAGE.to_string()),
        PortError::Conflict(_) | PortError::Unexpected(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_MESSAGE.to_string(),
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(MessageResponse::new(message))).into_response()
    }
}
