//! crates/paper_shelf_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

pub type UserId = i64;
pub type PaperId = i64;

pub const DEFAULT_RATING: i64 = 2;
pub const MIN_RATING: i64 = 0;
pub const MAX_RATING: i64 = 5;

// Represents a user - used throughout app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: UserId,
    pub email: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// The identity resolved from a valid session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: UserId,
    pub email: String,
}

/// Where a saved paper sits in the reader's workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl ReadingStatus {
    pub const ALL: [ReadingStatus; 3] = [
        ReadingStatus::Pending,
        ReadingStatus::InProgress,
        ReadingStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Pending => "pending",
            ReadingStatus::InProgress => "in_progress",
            ReadingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known reading statuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reading status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ReadingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReadingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A paper on a user's reading list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPaper {
    pub id: PaperId,
    pub user_id: UserId,
    pub title: String,
    /// External identifier; empty when the source had none.
    pub doi: String,
    pub link: String,
    pub published: Option<String>,
    pub status: ReadingStatus,
    pub rating: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields a caller supplies when saving a paper.
#[derive(Debug, Clone, Default)]
pub struct NewPaper {
    pub title: String,
    pub doi: String,
    pub link: String,
    pub published: Option<String>,
}

/// One search hit from the external paper source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperSummary {
    pub title: String,
    pub link: String,
    pub doi: String,
    pub published: String,
    pub summary: String,
    pub first_author: String,
    pub author_affiliation: String,
}
