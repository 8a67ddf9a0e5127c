//! Error types for NoteVault core operations.
//!
//! This module defines the error hierarchy for all vault operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-facing messages and machine-readable codes.

use std::time::Duration;

use thiserror::Error;

use crate::storage::RecordId;

/// Result type alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Core error type for vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Malformed or missing input; the caller can correct it immediately
    #[error("Validation error: {0}")]
    Validation(String),

    /// Retrieval targeted an id that does not exist (counted as a failed attempt)
    #[error(
        "No record matches that id and passkey ({} remaining)",
        plural_attempts(.attempts_remaining)
    )]
    NotFound { attempts_remaining: u32 },

    /// Passkey did not verify or did not decrypt (counted as a failed attempt)
    #[error(
        "No record matches that id and passkey ({} remaining)",
        plural_attempts(.attempts_remaining)
    )]
    PasskeyMismatch { attempts_remaining: u32 },

    /// Retrieval refused because the vault is locked
    #[error(
        "Vault is locked after too many failed attempts; reauthorize ({}s cooldown remaining)",
        wait_secs(.cooldown_remaining)
    )]
    Locked { cooldown_remaining: Duration },

    /// Reauthorization attempted before the cooldown elapsed
    #[error(
        "Please wait {} seconds before reauthorizing",
        wait_secs(.cooldown_remaining)
    )]
    TooSoon { cooldown_remaining: Duration },

    /// Master password did not match
    #[error("Incorrect master password")]
    Auth,

    /// A record with this id already exists
    #[error("Duplicate record id: {0}")]
    DuplicateId(RecordId),

    /// Ciphertext could not be authenticated or decoded under the given key
    #[error("Decryption failed")]
    Decryption,

    /// Key derivation or randomness failure
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Vault state unavailable
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid policy, KDF parameters, or master credential
    #[error("Configuration error: {0}")]
    Config(String),
}

impl VaultError {
    /// Whether this error was counted against the failed-attempt budget.
    pub fn is_failed_attempt(&self) -> bool {
        matches!(
            self,
            VaultError::NotFound { .. } | VaultError::PasskeyMismatch { .. }
        )
    }

    /// Attempts left before lockout, for errors that carry it.
    pub fn attempts_remaining(&self) -> Option<u32> {
        match self {
            VaultError::NotFound { attempts_remaining }
            | VaultError::PasskeyMismatch { attempts_remaining } => Some(*attempts_remaining),
            VaultError::Locked { .. } => Some(0),
            _ => None,
        }
    }

    /// Cooldown left before reauthorization, for state-gate rejections.
    pub fn cooldown_remaining(&self) -> Option<Duration> {
        match self {
            VaultError::Locked { cooldown_remaining }
            | VaultError::TooSoon { cooldown_remaining } => Some(*cooldown_remaining),
            _ => None,
        }
    }
}

/// Whole seconds, rounded up so a non-zero wait never displays as zero.
pub fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

fn wait_secs(duration: &Duration) -> u64 {
    ceil_secs(*duration)
}

fn plural_attempts(count: &u32) -> String {
    format!("{} attempt{}", count, if *count == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_and_mismatch_render_identically() {
        let not_found = VaultError::NotFound {
            attempts_remaining: 2,
        };
        let mismatch = VaultError::PasskeyMismatch {
            attempts_remaining: 2,
        };
        assert_eq!(not_found.to_string(), mismatch.to_string());
        assert!(not_found.to_string().contains("2 attempts remaining"));
    }

    #[test]
    fn test_singular_attempt_message() {
        let err = VaultError::PasskeyMismatch {
            attempts_remaining: 1,
        };
        assert!(err.to_string().contains("1 attempt remaining"));
    }

    #[test]
    fn test_failed_attempt_classification() {
        assert!(VaultError::NotFound {
            attempts_remaining: 0
        }
        .is_failed_attempt());
        assert!(!VaultError::Auth.is_failed_attempt());
        assert!(!VaultError::Locked {
            cooldown_remaining: Duration::from_secs(3)
        }
        .is_failed_attempt());
    }

    #[test]
    fn test_cooldown_rounds_up() {
        let err = VaultError::TooSoon {
            cooldown_remaining: Duration::from_millis(4_200),
        };
        assert_eq!(err.cooldown_remaining(), Some(Duration::from_millis(4_200)));
        assert!(err.to_string().contains("wait 5 seconds"));
    }

    #[test]
    fn test_ceil_secs() {
        assert_eq!(ceil_secs(Duration::ZERO), 0);
        assert_eq!(ceil_secs(Duration::from_secs(10)), 10);
        assert_eq!(ceil_secs(Duration::from_millis(1)), 1);
    }
}
