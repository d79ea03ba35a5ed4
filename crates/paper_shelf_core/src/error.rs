//! crates/paper_shelf_core/src/error.rs
//!
//! The domain error taxonomy returned by the account and reading-list services.
//! The display strings double as the user-facing messages.

use crate::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    #[error("Password must be at least 8 characters long, contain at least one uppercase letter and one number.")]
    WeakPassword,
    #[error("Email already registered.")]
    EmailTaken,
    #[error("Email and password are required.")]
    MissingCredentials,
    #[error("Invalid credentials, please try again.")]
    InvalidCredentials,
    #[error("Paper already saved for this user.")]
    DuplicateForUser,
    #[error("Paper title and link are required.")]
    MissingPaperFields,
    #[error("Invalid status value")]
    InvalidStatus(String),
    #[error("Paper DOI is required.")]
    MissingIdentifier,
    /// Covers both a missing paper and one owned by someone else.
    #[error("Paper not found or not owned by user.")]
    NotFound,
    #[error(transparent)]
    Port(#[from] PortError),
}

pub type ShelfResult<T> = Result<T, ShelfError>;
