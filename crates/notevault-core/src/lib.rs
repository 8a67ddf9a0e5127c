//! # NoteVault Core
//!
//! Core library for NoteVault - an in-memory vault of passkey-encrypted notes.
//!
//! This crate provides key derivation, encryption, record storage and the
//! lockout state machine, independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **crypto**: Passkey derivation, note encryption, master credential
//! - **storage**: Record types and the in-memory record store
//! - **guard**: Failed-attempt counting and lockout
//! - **clock**: Injectable time source for cooldowns
//! - **service**: The store / retrieve / reauthorize workflow
//!
//! ## Example
//!
//! ```
//! use notevault_core::{KdfParams, MasterSecret, VaultService};
//! use secrecy::SecretString;
//!
//! let master = MasterSecret::from_password(&SecretString::from("admin123".to_string())).unwrap();
//! let vault = VaultService::builder(master)
//!     .kdf_params(KdfParams::new(1024, 1, 1).unwrap())
//!     .build();
//!
//! let id = vault.store("hello world", "pw1", "pw1").unwrap();
//! assert_eq!(vault.retrieve(&id.to_string(), "pw1").unwrap(), "hello world");
//! ```

pub mod clock;
pub mod crypto;
pub mod error;
pub mod guard;
pub mod service;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use crypto::{hash_master_password, KdfParams, MasterSecret};
pub use error::{Result, VaultError};
pub use guard::{AttemptGuard, AttemptState, LockState, LockoutPolicy};
pub use service::{VaultService, VaultServiceBuilder, VaultStatus};
pub use storage::{MemoryStore, Record, RecordId, RecordStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
