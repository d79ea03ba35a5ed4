//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the SQLite database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use paper_shelf_core::domain::{
    AuthSession, NewPaper, ReadingStatus, SavedPaper, SessionUser, User, UserCredentials, UserId,
};
use paper_shelf_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use tracing::warn;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: SqlitePool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database at `database_url` with foreign keys on.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    /// A private, migrated database that lives as long as the adapter.
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let adapter = Self::new(pool);
        adapter.run_migrations().await?;
        Ok(adapter)
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: i64,
    email: String,
    created_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: i64,
    email: String,
    password: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.id,
            email: self.email,
            hashed_password: self.password,
        }
    }
}

#[derive(FromRow)]
struct SessionRecord {
    user_id: i64,
    email: String,
    expires_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct PaperRecord {
    id: i64,
    user_id: i64,
    paper_title: String,
    doi: String,
    paper_link: String,
    published: Option<String>,
    status: String,
    rating: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl PaperRecord {
    fn to_domain(self) -> PortResult<SavedPaper> {
        let status = self
            .status
            .parse::<ReadingStatus>()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(SavedPaper {
            id: self.id,
            user_id: self.user_id,
            title: self.paper_title,
            doi: self.doi,
            link: self.paper_link,
            published: self.published,
            status,
            rating: self.rating,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const PAPER_COLUMNS: &str =
    "id, user_id, paper_title, doi, paper_link, published, status, rating, created_at, updated_at";

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(&self, email: &str, hashed_password: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (email, password, created_at) VALUES (?, ?, ?) RETURNING id, email, created_at",
        )
        .bind(email)
        .bind(hashed_password)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::Conflict(format!("Email {} already registered", email))
            } else {
                PortError::Unexpected(e.to_string())
            }
        })?;
        Ok(record.to_domain())
    }

    async fn get_user(&self, user_id: UserId) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, created_at FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", user_id)),
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, password FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound("User not found".to_string()),
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(record.to_domain())
    }

    async fn create_auth_session(&self, session: &AuthSession) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(&session.id)
            .bind(session.user_id)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<SessionUser> {
        let record = sqlx::query_as::<_, SessionRecord>(
            "SELECT s.user_id, u.email, s.expires_at
             FROM auth_sessions s JOIN users u ON u.id = s.user_id
             WHERE s.id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?
        .ok_or_else(|| PortError::NotFound("Session not found".to_string()))?;

        if record.expires_at <= Utc::now() {
            warn!("Rejected expired session for user {}", record.user_id);
            self.delete_auth_session(session_id).await?;
            return Err(PortError::NotFound("Session expired".to_string()));
        }

        Ok(SessionUser {
            user_id: record.user_id,
            email: record.email,
        })
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn insert_paper(&self, user_id: UserId, paper: &NewPaper) -> PortResult<SavedPaper> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO user_paper_todo (user_id, paper_title, doi, paper_link, published, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            PAPER_COLUMNS
        );
        let record = sqlx::query_as::<_, PaperRecord>(&sql)
            .bind(user_id)
            .bind(&paper.title)
            .bind(&paper.doi)
            .bind(&paper.link)
            .bind(&paper.published)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    PortError::Conflict(format!("Paper {} already saved", paper.doi))
                } else {
                    PortError::Unexpected(e.to_string())
                }
            })?;
        record.to_domain()
    }

    async fn find_paper(&self, user_id: UserId, doi: &str) -> PortResult<Option<SavedPaper>> {
        let sql = format!(
            "SELECT {} FROM user_paper_todo WHERE user_id = ? AND doi = ?",
            PAPER_COLUMNS
        );
        sqlx::query_as::<_, PaperRecord>(&sql)
            .bind(user_id)
            .bind(doi)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .map(PaperRecord::to_domain)
            .transpose()
    }

    async fn list_papers(&self, user_id: UserId) -> PortResult<Vec<SavedPaper>> {
        let sql = format!(
            "SELECT {} FROM user_paper_todo WHERE user_id = ? ORDER BY created_at DESC, id DESC",
            PAPER_COLUMNS
        );
        let records = sqlx::query_as::<_, PaperRecord>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn update_paper_status(
        &self,
        user_id: UserId,
        doi: &str,
        status: ReadingStatus,
        updated_at: DateTime<Utc>,
    ) -> PortResult<bool> {
        let result = sqlx::query(
            "UPDATE user_paper_todo SET status = ?, updated_at = ? WHERE user_id = ? AND doi = ?",
        )
        .bind(status.as_str())
        .bind(updated_at)
        .bind(user_id)
        .bind(doi)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_paper_rating(
        &self,
        user_id: UserId,
        doi: &str,
        rating: i64,
        updated_at: DateTime<Utc>,
    ) -> PortResult<bool> {
        let result = sqlx::query(
            "UPDATE user_paper_todo SET rating = ?, updated_at = ? WHERE user_id = ? AND doi = ?",
        )
        .bind(rating)
        .bind(updated_at)
        .bind(user_id)
        .bind(doi)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_paper(&self, user_id: UserId, doi: &str) -> PortResult<bool> {
        let result = sqlx::query("DELETE FROM user_paper_todo WHERE user_id = ? AND doi = ?")
            .bind(user_id)
            .bind(doi)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }
}
