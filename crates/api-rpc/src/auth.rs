//! Access Keys
//!
//! Argon2-hashed secrets keyed by access key name.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use courier_core::error::{AppError, Result};
use courier_core::port::CredentialVerifier;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Credential store backing `CredentialVerifier`
#[derive(Debug, Default)]
pub struct KeyManager {
    keys: HashMap<String, String>,
}

impl KeyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `secret` with a fresh salt and store it under `name`
    pub fn add_key(&mut self, name: impl Into<String>, secret: &str) -> Result<()> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AppError::Config(format!("Failed to hash secret: {}", e)))?;

        self.keys.insert(name.into(), hash.to_string());
        Ok(())
    }

    /// Store a pre-computed PHC hash string.
    ///
    /// A hash that does not parse is rejected here rather than silently
    /// never verifying.
    pub fn add_hashed_credentials(&mut self, name: impl Into<String>, hash: impl Into<String>) -> Result<()> {
        let name = name.into();
        let hash = hash.into();
        PasswordHash::new(&hash)
            .map_err(|e| AppError::Config(format!("Invalid password hash for key '{}': {}", name, e)))?;

        self.keys.insert(name, hash);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl CredentialVerifier for KeyManager {
    fn valid_credentials(&self, name: &str, secret: &str) -> bool {
        let Some(stored) = self.keys.get(name) else {
            debug!(access_key = name, "Unknown access key");
            return false;
        };

        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(access_key = name, error = %e, "Stored hash does not parse");
                return false;
            }
        };

        Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }
}
