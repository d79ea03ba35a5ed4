//! crates/paper_shelf_core/src/accounts.rs
//!
//! Registration and credential checks. Session issuance lives in the web layer;
//! this module only decides who a caller is.

use crate::domain::User;
use crate::error::{ShelfError, ShelfResult};
use crate::ports::{DatabaseService, PasswordHasherService, PortError};

pub const MIN_PASSWORD_LEN: usize = 8;

/// At least 8 characters, one ASCII uppercase letter and one digit.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

pub struct Accounts<'a> {
    db: &'a dyn DatabaseService,
    hasher: &'a dyn PasswordHasherService,
}

impl<'a> Accounts<'a> {
    pub fn new(db: &'a dyn DatabaseService, hasher: &'a dyn PasswordHasherService) -> Self {
        Self { db, hasher }
    }

    /// Creates an account. The password policy is checked before anything is hashed.
    pub async fn register(&self, email: &str, password: &str) -> ShelfResult<User> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ShelfError::MissingCredentials);
        }
        if !is_valid_password(password) {
            return Err(ShelfError::WeakPassword);
        }

        match self.db.get_user_by_email(email).await {
            Ok(_) => return Err(ShelfError::EmailTaken),
            Err(PortError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let hashed_password = self.hasher.hash_password(password)?;

        // The unique index is the real guard; the lookup above only exists for the message.
        self.db
            .create_user(email, &hashed_password)
            .await
            .map_err(|e| match e {
                PortError::Conflict(_) => ShelfError::EmailTaken,
                other => other.into(),
            })
    }

    /// Checks an email/password pair. Unknown emails and wrong passwords are indistinguishable.
    pub async fn authenticate(&self, email: &str, password: &str) -> ShelfResult<User> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ShelfError::MissingCredentials);
        }

        let creds = match self.db.get_user_by_email(email).await {
            Ok(creds) => creds,
            Err(PortError::NotFound(_)) => return Err(ShelfError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if !self
            .hasher
            .verify_password(password, &creds.hashed_password)?
        {
            return Err(ShelfError::InvalidCredentials);
        }

        Ok(self.db.get_user(creds.user_id).await?)
    }
}
