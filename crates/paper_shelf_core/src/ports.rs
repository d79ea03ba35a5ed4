//! crates/paper_shelf_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AuthSession, NewPaper, PaperSummary, ReadingStatus, SavedPaper, SessionUser, User,
    UserCredentials, UserId,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A storage-level uniqueness constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The external paper source failed or answered with something unusable.
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    /// Inserts a user. A duplicate email yields `PortError::Conflict`.
    async fn create_user(&self, email: &str, hashed_password: &str) -> PortResult<User>;

    async fn get_user(&self, user_id: UserId) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    // --- Auth Sessions ---
    async fn create_auth_session(&self, session: &AuthSession) -> PortResult<()>;

    /// Resolves a live session. Unknown and expired sessions are `NotFound`.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<SessionUser>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Reading List ---
    /// Inserts a paper. A duplicate (user, doi) pair yields `PortError::Conflict`.
    async fn insert_paper(&self, user_id: UserId, paper: &NewPaper) -> PortResult<SavedPaper>;

    async fn find_paper(&self, user_id: UserId, doi: &str) -> PortResult<Option<SavedPaper>>;

    async fn list_papers(&self, user_id: UserId) -> PortResult<Vec<SavedPaper>>;

    /// Returns `false` when no row owned by `user_id` matched.
    async fn update_paper_status(
        &self,
        user_id: UserId,
        doi: &str,
        status: ReadingStatus,
        updated_at: DateTime<Utc>,
    ) -> PortResult<bool>;

    /// Returns `false` when no row owned by `user_id` matched.
    async fn update_paper_rating(
        &self,
        user_id: UserId,
        doi: &str,
        rating: i64,
        updated_at: DateTime<Utc>,
    ) -> PortResult<bool>;

    /// Returns `false` when no row owned by `user_id` matched.
    async fn delete_paper(&self, user_id: UserId, doi: &str) -> PortResult<bool>;
}

#[async_trait]
pub trait PaperSourceService: Send + Sync {
    /// Searches the external index for an exact phrase, newest submissions first.
    async fn search(&self, keyword: &str, max_results: u32) -> PortResult<Vec<PaperSummary>>;
}

pub trait PasswordHasherService: Send + Sync {
    /// Produces a salted, one-way hash of the password.
    fn hash_password(&self, password: &str) -> PortResult<String>;

    /// Checks a password against a stored hash in constant time.
    fn verify_password(&self, password: &str, hashed_password: &str) -> PortResult<bool>;
}
