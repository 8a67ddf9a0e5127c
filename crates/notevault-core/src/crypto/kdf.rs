//! Passkey key derivation using Argon2id.
//!
//! A passkey is stretched once with Argon2id, then split with BLAKE3
//! `derive_key` into two independent values:
//!
//! - a [`VerificationHash`], stored with a record and compared on retrieval
//! - a [`SymmetricKey`], used by the cipher and never stored
//!
//! Both are pure functions of the passkey string, so a passkey that verifies
//! is always the passkey whose key encrypted the record.

use std::fmt;
use std::time::Instant;

use argon2::Argon2;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::error::{Result, VaultError};

/// Default Argon2id parameters.
///
/// - Memory: 64 MB (64 * 1024 KB)
/// - Iterations: 3
/// - Parallelism: 1
const ARGON2_MEMORY_KB: u32 = 64 * 1024;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;

/// Length of derived keys and digests in bytes (256 bits).
pub const KEY_LENGTH: usize = 32;

/// Application salt. Derivation must be reproducible from the passkey alone,
/// so the salt is fixed rather than stored per record.
const PASSKEY_SALT: &[u8] = b"notevault.passkey.stretch.v1";

const VERIFICATION_CONTEXT: &str = "notevault 2025-01 passkey verification hash v1";
const ENCRYPTION_CONTEXT: &str = "notevault 2025-01 record encryption key v1";

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: ARGON2_MEMORY_KB,
            iterations: ARGON2_ITERATIONS,
            parallelism: ARGON2_PARALLELISM,
        }
    }
}

impl KdfParams {
    /// Create validated parameters.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Config` if Argon2 rejects the combination
    /// (for example memory below `8 * parallelism` KiB).
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        let params = Self {
            memory_kib,
            iterations,
            parallelism,
        };
        params.argon2_params()?;
        Ok(params)
    }

    fn argon2_params(&self) -> Result<argon2::Params> {
        argon2::Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LENGTH),
        )
        .map_err(|e| VaultError::Config(format!("Invalid Argon2 parameters: {}", e)))
    }
}

/// A symmetric encryption key derived from a passkey.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SymmetricKey {
    key: [u8; KEY_LENGTH],
}

impl SymmetricKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate cipher operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// One-way digest of a passkey, stored alongside a record.
///
/// Equality is evaluated in constant time.
#[derive(Clone, Eq)]
pub struct VerificationHash([u8; KEY_LENGTH]);

impl VerificationHash {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }
}

impl PartialEq for VerificationHash {
    fn eq(&self, other: &Self) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

impl fmt::Debug for VerificationHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VerificationHash")
            .field(&"[REDACTED]")
            .finish()
    }
}

/// Key and verifier derived together from one passkey.
#[derive(Debug, Clone)]
pub struct PasskeyMaterial {
    pub key: SymmetricKey,
    pub verification: VerificationHash,
}

/// Derives keys and verification hashes from passkeys.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyDeriver {
    params: KdfParams,
}

impl KeyDeriver {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Deterministic one-way hash of the passkey, for equality checks only.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Validation` if the passkey is empty.
    pub fn verification_hash(&self, passkey: &str) -> Result<VerificationHash> {
        let stretched = self.stretch(passkey)?;
        Ok(verification_from(&stretched))
    }

    /// Deterministic symmetric key for the passkey.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Validation` if the passkey is empty.
    pub fn encryption_key(&self, passkey: &str) -> Result<SymmetricKey> {
        let stretched = self.stretch(passkey)?;
        Ok(key_from(&stretched))
    }

    /// Derive both the key and the verifier from a single Argon2id pass.
    ///
    /// Equivalent to calling [`Self::encryption_key`] and
    /// [`Self::verification_hash`] with the same passkey.
    pub fn derive(&self, passkey: &str) -> Result<PasskeyMaterial> {
        let stretched = self.stretch(passkey)?;
        Ok(PasskeyMaterial {
            key: key_from(&stretched),
            verification: verification_from(&stretched),
        })
    }

    fn stretch(&self, passkey: &str) -> Result<Zeroizing<[u8; KEY_LENGTH]>> {
        if passkey.is_empty() {
            return Err(VaultError::Validation(
                "Passkey cannot be empty".to_string(),
            ));
        }

        let argon2 = Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            self.params.argon2_params()?,
        );

        let started = Instant::now();
        let mut stretched = Zeroizing::new([0u8; KEY_LENGTH]);
        argon2
            .hash_password_into(passkey.as_bytes(), PASSKEY_SALT, &mut stretched[..])
            .map_err(|e| VaultError::Crypto(format!("Key derivation failed: {}", e)))?;
        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            memory_kib = self.params.memory_kib,
            "derived passkey material"
        );

        Ok(stretched)
    }
}

fn verification_from(stretched: &[u8; KEY_LENGTH]) -> VerificationHash {
    VerificationHash::from_bytes(blake3::derive_key(VERIFICATION_CONTEXT, stretched))
}

fn key_from(stretched: &[u8; KEY_LENGTH]) -> SymmetricKey {
    SymmetricKey::from_bytes(blake3::derive_key(ENCRYPTION_CONTEXT, stretched))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> KeyDeriver {
        KeyDeriver::new(KdfParams::new(1024, 1, 1).unwrap())
    }

    #[test]
    fn test_verification_hash_deterministic() {
        let kdf = fast();
        let first = kdf.verification_hash("pw1").unwrap();
        let second = kdf.verification_hash("pw1").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_encryption_key_deterministic() {
        let kdf = fast();
        let first = kdf.encryption_key("pw1").unwrap();
        let second = kdf.encryption_key("pw1").unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_derive_matches_individual_functions() {
        let kdf = fast();
        let material = kdf.derive("correct horse").unwrap();
        assert_eq!(
            material.key.as_bytes(),
            kdf.encryption_key("correct horse").unwrap().as_bytes()
        );
        assert_eq!(
            material.verification,
            kdf.verification_hash("correct horse").unwrap()
        );
    }

    #[test]
    fn test_key_and_verifier_are_domain_separated() {
        let material = fast().derive("pw1").unwrap();
        assert_ne!(material.key.as_bytes(), material.verification.as_bytes());
    }

    #[test]
    fn test_different_passkey_different_outputs() {
        let kdf = fast();
        let one = kdf.derive("passkey-one").unwrap();
        let two = kdf.derive("passkey-two").unwrap();
        assert_ne!(one.verification, two.verification);
        assert_ne!(one.key.as_bytes(), two.key.as_bytes());
    }

    #[test]
    fn test_cost_parameters_change_outputs() {
        let cheap = fast().verification_hash("pw1").unwrap();
        let other = KeyDeriver::new(KdfParams::new(2048, 1, 1).unwrap())
            .verification_hash("pw1")
            .unwrap();
        assert_ne!(cheap, other);
    }

    #[test]
    fn test_empty_passkey_rejected() {
        let result = fast().derive("");
        assert!(matches!(result, Err(VaultError::Validation(_))));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Passkey cannot be empty"));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = KdfParams::new(1, 1, 4);
        assert!(matches!(result, Err(VaultError::Config(_))));
    }

    #[test]
    fn test_default_params() {
        let params = KdfParams::default();
        assert_eq!(params.memory_kib, 64 * 1024);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.parallelism, 1);
    }

    #[test]
    fn test_key_debug_redacts() {
        let material = fast().derive("pw1").unwrap();

        let key_debug = format!("{:?}", material.key);
        assert!(key_debug.contains("REDACTED"));
        let key_hex = hex::encode(&material.key.as_bytes()[..4]);
        assert!(!key_debug.contains(&key_hex));

        let hash_debug = format!("{:?}", material.verification);
        assert!(hash_debug.contains("REDACTED"));
    }
}
