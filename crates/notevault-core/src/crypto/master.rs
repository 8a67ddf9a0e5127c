//! Master credential used to clear a lockout.
//!
//! The credential is held as an Argon2 PHC string. It is either supplied
//! pre-hashed from configuration or hashed once at startup from a password
//! supplied by the environment. Verification goes through the
//! `password-hash` verifier, which compares digests in constant time.

use std::fmt;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{Result, VaultError};

const SALT_LENGTH: usize = 16;

/// Externally supplied reauthorization credential.
#[derive(Clone)]
pub struct MasterSecret {
    phc: String,
}

impl MasterSecret {
    /// Use an existing Argon2 PHC string (`$argon2id$v=19$...`).
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Config` if the string is not a valid PHC hash.
    pub fn from_phc(phc: &str) -> Result<Self> {
        let phc = phc.trim();
        PasswordHash::new(phc)
            .map_err(|e| VaultError::Config(format!("Invalid master password hash: {}", e)))?;
        Ok(Self {
            phc: phc.to_string(),
        })
    }

    /// Hash a plaintext master password with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Config` if the password is empty, or
    /// `VaultError::Crypto` if hashing fails.
    pub fn from_password(password: &SecretString) -> Result<Self> {
        Ok(Self {
            phc: hash_master_password(password)?,
        })
    }

    /// The PHC string, suitable for writing to configuration.
    pub fn phc(&self) -> &str {
        &self.phc
    }

    /// Check a candidate password against the credential.
    pub fn verify(&self, candidate: &str) -> bool {
        match PasswordHash::new(&self.phc) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterSecret")
            .field("phc", &"[REDACTED]")
            .finish()
    }
}

/// Produce an Argon2id PHC string for a master password.
pub fn hash_master_password(password: &SecretString) -> Result<String> {
    let password = password.expose_secret();
    if password.is_empty() {
        return Err(VaultError::Config(
            "Master password cannot be empty".to_string(),
        ));
    }

    let mut salt_bytes = [0u8; SALT_LENGTH];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|e| VaultError::Crypto(format!("Failed to generate salt: {}", e)))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| VaultError::Crypto(format!("Failed to encode salt: {}", e)))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| VaultError::Crypto(format!("Master password hashing failed: {}", e)))
}
