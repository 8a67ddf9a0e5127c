//! Core data types for the record store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::{Ciphertext, VerificationHash};
use crate::error::{Result, VaultError};

/// Number of characters shown by [`RecordId::short`].
const SHORT_ID_LEN: usize = 8;

/// Opaque record identifier (random UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Leading characters of the id, for logs.
    pub fn short(&self) -> String {
        self.0.to_string().chars().take(SHORT_ID_LEN).collect()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| VaultError::Validation(format!("Invalid record id: {}", e)))
    }
}

/// A stored note.
///
/// Records are immutable once created. The passkey itself is never kept;
/// only the verification hash and the ciphertext sealed under the
/// passkey-derived key.
#[derive(Debug, Clone)]
pub struct Record {
    id: RecordId,
    ciphertext: Ciphertext,
    verification_hash: VerificationHash,
    created_at: DateTime<Utc>,
}

impl Record {
    pub fn new(
        id: RecordId,
        ciphertext: Ciphertext,
        verification_hash: VerificationHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            ciphertext,
            verification_hash,
            created_at,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn ciphertext(&self) -> &Ciphertext {
        &self.ciphertext
    }

    pub fn verification_hash(&self) -> &VerificationHash {
        &self.verification_hash
    }

    /// When this record was stored (informational)
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
