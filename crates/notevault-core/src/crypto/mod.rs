//! Cryptographic operations for NoteVault.
//!
//! This module provides key derivation and encryption services using
//! well-audited libraries:
//! - **Argon2id**: Memory-hard passkey stretching and master password hashing
//! - **BLAKE3**: Domain separation of the stretched passkey
//! - **XChaCha20-Poly1305**: Authenticated encryption of notes
//!
//! ## Security Model
//!
//! - Passkeys are never stored; records keep only a verification hash
//! - The verification hash and the encryption key come from the same passkey
//! - Key material is zeroized from memory on drop
//! - Hash comparisons are constant time
//!
//! ## Threat Model
//!
//! We defend against:
//! - Guessing a passkey through repeated retrievals (lockout)
//! - Tampered or swapped ciphertext (authenticated encryption)
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to process memory

pub mod cipher;
pub mod kdf;
pub mod master;

pub use cipher::{decrypt, encrypt, Ciphertext};
pub use kdf::{KdfParams, KeyDeriver, PasskeyMaterial, SymmetricKey, VerificationHash};
pub use master::{hash_master_password, MasterSecret};
