//! crates/paper_shelf_core/src/reading_list.rs
//!
//! Per-user reading list operations. Every lookup is keyed by (user, doi), so a
//! row owned by someone else is reported exactly like a missing one.

use chrono::Utc;

use crate::domain::{NewPaper, ReadingStatus, SavedPaper, UserId, MAX_RATING, MIN_RATING};
use crate::error::{ShelfError, ShelfResult};
use crate::ports::{DatabaseService, PortError};

pub struct ReadingList<'a> {
    db: &'a dyn DatabaseService,
}

impl<'a> ReadingList<'a> {
    pub fn new(db: &'a dyn DatabaseService) -> Self {
        Self { db }
    }

    pub async fn save_paper(&self, user_id: UserId, paper: NewPaper) -> ShelfResult<SavedPaper> {
        let paper = NewPaper {
            title: paper.title.trim().to_string(),
            doi: paper.doi.trim().to_string(),
            link: paper.link.trim().to_string(),
            published: paper.published,
        };
        if paper.title.is_empty() || paper.link.is_empty() {
            return Err(ShelfError::MissingPaperFields);
        }
        // Status, rating and removal are all keyed by doi, so a row without one
        // could never be touched again.
        if paper.doi.is_empty() {
            return Err(ShelfError::MissingIdentifier);
        }

        if self.db.find_paper(user_id, &paper.doi).await?.is_some() {
            return Err(ShelfError::DuplicateForUser);
        }

        self.db
            .insert_paper(user_id, &paper)
            .await
            .map_err(|e| match e {
                PortError::Conflict(_) => ShelfError::DuplicateForUser,
                other => other.into(),
            })
    }

    pub async fn list_papers(&self, user_id: UserId) -> ShelfResult<Vec<SavedPaper>> {
        Ok(self.db.list_papers(user_id).await?)
    }

    /// Sets the status and always refreshes `updated_at`, whichever status was chosen.
    pub async fn update_status(&self, user_id: UserId, doi: &str, status: &str) -> ShelfResult<()> {
        let status: ReadingStatus = status
            .parse()
            .map_err(|_| ShelfError::InvalidStatus(status.to_string()))?;
        let doi = doi.trim();
        if doi.is_empty() {
            return Err(ShelfError::MissingIdentifier);
        }

        let updated = self
            .db
            .update_paper_status(user_id, doi, status, Utc::now())
            .await?;
        if !updated {
            return Err(ShelfError::NotFound);
        }
        Ok(())
    }

    /// Stores the rating clamped into the five-star range. Returns the stored value.
    pub async fn update_rating(&self, user_id: UserId, doi: &str, rating: i64) -> ShelfResult<i64> {
        let doi = doi.trim();
        if doi.is_empty() {
            return Err(ShelfError::MissingIdentifier);
        }

        let rating = rating.clamp(MIN_RATING, MAX_RATING);
        let updated = self
            .db
            .update_paper_rating(user_id, doi, rating, Utc::now())
            .await?;
        if !updated {
            return Err(ShelfError::NotFound);
        }
        Ok(rating)
    }

    pub async fn remove_paper(&self, user_id: UserId, doi: &str) -> ShelfResult<()> {
        let doi = doi.trim();
        if doi.is_empty() {
            return Err(ShelfError::MissingIdentifier);
        }

        if !self.db.delete_paper(user_id, doi).await? {
            return Err(ShelfError::NotFound);
        }
        Ok(())
    }
}
