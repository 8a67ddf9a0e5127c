//! Authenticated encryption of note payloads.
//!
//! Notes are sealed with XChaCha20-Poly1305 under a passkey-derived
//! [`SymmetricKey`]. Each call draws a fresh random 24-byte nonce, so
//! encrypting the same text twice yields different blobs.
//!
//! Blob layout:
//!
//! ```text
//! [ nonce (24 bytes) | ciphertext + tag (N + 16 bytes) ]
//! ```

use std::fmt;

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use zeroize::Zeroize;

use super::kdf::SymmetricKey;
use crate::error::{Result, VaultError};

/// XChaCha20 nonce length in bytes.
pub const NONCE_LENGTH: usize = 24;

/// Poly1305 tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// Opaque encrypted blob with the nonce and tag embedded.
#[derive(Clone, PartialEq, Eq)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    /// Wrap raw blob bytes (nonce followed by sealed payload).
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ciphertext")
            .field("len", &self.0.len())
            .finish()
    }
}

/// Encrypt a note under the given key.
///
/// # Errors
///
/// Returns `VaultError::Crypto` if the system RNG is unavailable or the
/// cipher rejects the input.
///
/// # Examples
///
/// ```
/// use notevault_core::crypto::{decrypt, encrypt, KdfParams, KeyDeriver};
///
/// let kdf = KeyDeriver::new(KdfParams::new(1024, 1, 1).unwrap());
/// let key = kdf.encryption_key("my-passkey").unwrap();
/// let sealed = encrypt("secret note", &key).unwrap();
/// assert_eq!(decrypt(&sealed, &key).unwrap(), "secret note");
/// ```
pub fn encrypt(plaintext: &str, key: &SymmetricKey) -> Result<Ciphertext> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));

    let mut nonce = [0u8; NONCE_LENGTH];
    getrandom::getrandom(&mut nonce)
        .map_err(|e| VaultError::Crypto(format!("Failed to generate nonce: {}", e)))?;

    let sealed = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|e| VaultError::Crypto(format!("Encryption failed: {}", e)))?;

    let mut blob = Vec::with_capacity(NONCE_LENGTH + sealed.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&sealed);
    Ok(Ciphertext(blob))
}

/// Decrypt a note sealed by [`encrypt`].
///
/// # Errors
///
/// Returns `VaultError::Decryption` if:
/// - The key is wrong
/// - The blob is truncated, corrupted, or tampered with
/// - The recovered bytes are not UTF-8
///
/// No plaintext is returned on any failure.
pub fn decrypt(ciphertext: &Ciphertext, key: &SymmetricKey) -> Result<String> {
    let blob = ciphertext.as_bytes();
    if blob.len() < NONCE_LENGTH + TAG_LENGTH {
        return Err(VaultError::Decryption);
    }
    let (nonce, sealed) = blob.split_at(NONCE_LENGTH);

    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let opened = cipher
        .decrypt(XNonce::from_slice(nonce), sealed)
        .map_err(|_| VaultError::Decryption)?;

    String::from_utf8(opened).map_err(|err| {
        err.into_bytes().zeroize();
        VaultError::Decryption
    })
}
