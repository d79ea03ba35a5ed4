//! services/api/src/adapters/password.rs
//!
//! Argon2id implementation of the `PasswordHasherService` port. Hashes are stored
//! as PHC strings, so the salt and parameters travel with the hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use paper_shelf_core::ports::{PasswordHasherService, PortError, PortResult};
use tracing::error;

#[derive(Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasherService for Argon2Hasher {
    fn hash_password(&self, password: &str) -> PortResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!("Failed to hash password: {:?}", e);
                PortError::Unexpected("Failed to hash password".to_string())
            })
    }

    fn verify_password(&self, password: &str, hashed_password: &str) -> PortResult<bool> {
        let parsed_hash = PasswordHash::new(hashed_password).map_err(|e| {
            error!("Failed to parse password hash: {:?}", e);
            PortError::Unexpected("Authentication error".to_string())
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => {
                error!("Failed to verify password: {:?}", e);
                Err(PortError::Unexpected("Authentication error".to_string()))
            }
        }
    }
}
