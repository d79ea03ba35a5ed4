//! In-memory port implementations for the core's unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AuthSession, NewPaper, ReadingStatus, SavedPaper, SessionUser, User, UserCredentials, UserId,
    DEFAULT_RATING,
};
use crate::ports::{DatabaseService, PasswordHasherService, PortError, PortResult};

#[derive(Default)]
struct Tables {
    users: Vec<(User, String)>,
    sessions: Vec<(String, UserId, DateTime<Utc>)>,
    papers: Vec<SavedPaper>,
    hidden_emails: HashSet<String>,
}

/// Mirrors the SQL schema's constraints closely enough for the domain tests.
#[derive(Default)]
pub struct InMemoryDb {
    tables: Mutex<Tables>,
    paper_calls: AtomicUsize,
}

impl InMemoryDb {
    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    /// Number of reading-list calls that reached the store.
    pub fn store_calls(&self) -> usize {
        self.paper_calls.load(Ordering::SeqCst)
    }

    /// Makes `get_user_by_email` miss this email, simulating a concurrent registration.
    pub fn fail_lookups_for(&self, email: &str) {
        self.tables
            .lock()
            .unwrap()
            .hidden_emails
            .insert(email.to_string());
    }

    fn touch(&self) {
        self.paper_calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DatabaseService for InMemoryDb {
    async fn create_user(&self, email: &str, hashed_password: &str) -> PortResult<User> {
        let mut t = self.tables.lock().unwrap();
        if t.users.iter().any(|(u, _)| u.email == email) {
            return Err(PortError::Conflict(format!("email {email}")));
        }
        let user = User {
            id: t.users.len() as UserId + 1,
            email: email.to_string(),
            created_at: Utc::now(),
        };
        t.users.push((user.clone(), hashed_password.to_string()));
        Ok(user)
    }

    async fn get_user(&self, user_id: UserId) -> PortResult<User> {
        let t = self.tables.lock().unwrap();
        t.users
            .iter()
            .find(|(u, _)| u.id == user_id)
            .map(|(u, _)| u.clone())
            .ok_or_else(|| PortError::NotFound(format!("User {user_id} not found")))
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let t = self.tables.lock().unwrap();
        if t.hidden_emails.contains(email) {
            return Err(PortError::NotFound(email.to_string()));
        }
        t.users
            .iter()
            .find(|(u, _)| u.email == email)
            .map(|(u, hash)| UserCredentials {
                user_id: u.id,
                email: u.email.clone(),
                hashed_password: hash.clone(),
            })
            .ok_or_else(|| PortError::NotFound(email.to_string()))
    }

    async fn create_auth_session(&self, session: &AuthSession) -> PortResult<()> {
        let mut t = self.tables.lock().unwrap();
        t.sessions
            .push((session.id.clone(), session.user_id, session.expires_at));
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<SessionUser> {
        let t = self.tables.lock().unwrap();
        let (_, user_id, _) = t
            .sessions
            .iter()
            .find(|(id, _, exp)| id == session_id && *exp > Utc::now())
            .ok_or_else(|| PortError::NotFound(session_id.to_string()))?;
        let (user, _) = t
            .users
            .iter()
            .find(|(u, _)| u.id == *user_id)
            .ok_or_else(|| PortError::NotFound(session_id.to_string()))?;
        Ok(SessionUser {
            user_id: user.id,
            email: user.email.clone(),
        })
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        let mut t = self.tables.lock().unwrap();
        t.sessions.retain(|(id, _, _)| id != session_id);
        Ok(())
    }

    async fn insert_paper(&self, user_id: UserId, paper: &NewPaper) -> PortResult<SavedPaper> {
        self.touch();
        let mut t = self.tables.lock().unwrap();
        if t.papers
            .iter()
            .any(|p| p.user_id == user_id && p.doi == paper.doi)
        {
            return Err(PortError::Conflict(paper.doi.clone()));
        }
        let now = Utc::now();
        let saved = SavedPaper {
            id: t.papers.iter().map(|p| p.id).max().unwrap_or(0) + 1,
            user_id,
            title: paper.title.clone(),
            doi: paper.doi.clone(),
            link: paper.link.clone(),
            published: paper.published.clone(),
            status: ReadingStatus::Pending,
            rating: DEFAULT_RATING,
            created_at: now,
            updated_at: now,
        };
        t.papers.push(saved.clone());
        Ok(saved)
    }

    async fn find_paper(&self, user_id: UserId, doi: &str) -> PortResult<Option<SavedPaper>> {
        self.touch();
        let t = self.tables.lock().unwrap();
        Ok(t.papers
            .iter()
            .find(|p| p.user_id == user_id && p.doi == doi)
            .cloned())
    }

    async fn list_papers(&self, user_id: UserId) -> PortResult<Vec<SavedPaper>> {
        let t = self.tables.lock().unwrap();
        let mut papers: Vec<_> = t
            .papers
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        papers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(papers)
    }

    async fn update_paper_status(
        &self,
        user_id: UserId,
        doi: &str,
        status: ReadingStatus,
        updated_at: DateTime<Utc>,
    ) -> PortResult<bool> {
        self.touch();
        let mut t = self.tables.lock().unwrap();
        match t
            .papers
            .iter_mut()
            .find(|p| p.user_id == user_id && p.doi == doi)
        {
            Some(p) => {
                p.status = status;
                p.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_paper_rating(
        &self,
        user_id: UserId,
        doi: &str,
        rating: i64,
        updated_at: DateTime<Utc>,
    ) -> PortResult<bool> {
        self.touch();
        let mut t = self.tables.lock().unwrap();
        match t
            .papers
            .iter_mut()
            .find(|p| p.user_id == user_id && p.doi == doi)
        {
            Some(p) => {
                p.rating = rating;
                p.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_paper(&self, user_id: UserId, doi: &str) -> PortResult<bool> {
        self.touch();
        let mut t = self.tables.lock().unwrap();
        let before = t.papers.len();
        t.papers.retain(|p| !(p.user_id == user_id && p.doi == doi));
        Ok(t.papers.len() != before)
    }
}

/// Not a real hash. Good enough to prove plaintext never reaches the store.
pub struct ReversingHasher;

impl PasswordHasherService for ReversingHasher {
    fn hash_password(&self, password: &str) -> PortResult<String> {
        Ok(format!("rev${}", password.chars().rev().collect::<String>()))
    }

    fn verify_password(&self, password: &str, hashed_password: &str) -> PortResult<bool> {
        Ok(self.hash_password(password)? == hashed_password)
    }
}
