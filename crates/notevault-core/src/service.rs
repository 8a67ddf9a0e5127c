//! Vault service: the store / retrieve / reauthorize workflow.
//!
//! `VaultService` owns the record store and the attempt guard behind one
//! mutex. `retrieve` and `reauthorize` hold that mutex for their whole
//! duration so the lock check, verification and counter update happen as
//! one step. `store` derives and encrypts before taking the mutex.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::crypto::kdf::KEY_LENGTH;
use crate::crypto::{
    decrypt, encrypt, KdfParams, KeyDeriver, MasterSecret, VerificationHash,
};
use crate::error::{Result, VaultError};
use crate::guard::{AttemptGuard, LockoutPolicy};
use crate::storage::{MemoryStore, Record, RecordId, RecordStore};

/// Read-only snapshot of the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultStatus {
    pub record_count: usize,
    pub attempts_remaining: u32,
    pub max_attempts: u32,
    pub is_locked: bool,
    pub cooldown_remaining: Duration,
    pub failed_attempts: u32,
    pub last_failure_at: Option<DateTime<Utc>>,
}

impl VaultStatus {
    /// Cooldown in whole seconds, rounded up.
    pub fn cooldown_remaining_secs(&self) -> u64 {
        crate::error::ceil_secs(self.cooldown_remaining)
    }
}

#[derive(Debug)]
struct VaultInner<S> {
    store: S,
    guard: AttemptGuard,
}

/// Encrypted note vault.
#[derive(Debug)]
pub struct VaultService<S: RecordStore = MemoryStore> {
    kdf: KeyDeriver,
    master: MasterSecret,
    inner: Mutex<VaultInner<S>>,
}

impl VaultService<MemoryStore> {
    /// Vault with the default policy, KDF cost and system clock.
    pub fn new(master: MasterSecret) -> Self {
        Self::builder(master).build()
    }

    pub fn builder(master: MasterSecret) -> VaultServiceBuilder<MemoryStore> {
        VaultServiceBuilder {
            master,
            policy: LockoutPolicy::default(),
            kdf_params: KdfParams::default(),
            clock: Arc::new(SystemClock),
            store: MemoryStore::new(),
        }
    }
}

impl<S: RecordStore> VaultService<S> {
    /// Lock the vault state, returning an error if the mutex is poisoned.
    fn lock_inner(&self) -> Result<MutexGuard<'_, VaultInner<S>>> {
        self.inner
            .lock()
            .map_err(|_| VaultError::Storage("Vault state poisoned".to_string()))
    }

    /// Encrypt a note under a passkey and return its new id.
    ///
    /// Storing is allowed while the vault is locked; it reveals nothing.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Validation` if any input is empty or the
    /// passkey and confirmation differ.
    pub fn store(&self, plaintext: &str, passkey: &str, confirm_passkey: &str) -> Result<RecordId> {
        if plaintext.is_empty() || passkey.is_empty() || confirm_passkey.is_empty() {
            return Err(VaultError::Validation(
                "Note, passkey and confirmation are all required".to_string(),
            ));
        }
        if passkey != confirm_passkey {
            return Err(VaultError::Validation("Passkeys do not match".to_string()));
        }

        let id = RecordId::generate();
        let material = self.kdf.derive(passkey)?;
        let ciphertext = encrypt(plaintext, &material.key)?;

        let mut inner = self.lock_inner()?;
        let created_at = inner.guard.now();
        inner
            .store
            .put(Record::new(id, ciphertext, material.verification, created_at))?;
        tracing::info!(id = %id.short(), records = inner.store.len(), "stored note");

        Ok(id)
    }

    /// Decrypt the note with the given id.
    ///
    /// # Errors
    ///
    /// - `VaultError::Locked` if the vault is locked (not counted)
    /// - `VaultError::Validation` if the id or passkey is empty (not counted)
    /// - `VaultError::NotFound` if the id is unparseable or unknown
    /// - `VaultError::PasskeyMismatch` if the passkey does not verify or decrypt
    pub fn retrieve(&self, id: &str, passkey: &str) -> Result<String> {
        let mut inner = self.lock_inner()?;
        let VaultInner { store, guard } = &mut *inner;

        if guard.is_locked() {
            return Err(VaultError::Locked {
                cooldown_remaining: guard.cooldown_remaining(),
            });
        }
        if id.trim().is_empty() || passkey.is_empty() {
            return Err(VaultError::Validation(
                "Record id and passkey are both required".to_string(),
            ));
        }

        let record = id.parse::<RecordId>().ok().and_then(|id| store.get(&id));
        let material = self.kdf.derive(passkey)?;

        let Some(record) = record else {
            // Same derivation and comparison cost as a wrong passkey.
            std::hint::black_box(material.verification == unknown_record_hash());
            guard.record_failure();
            tracing::warn!(
                failed_count = guard.failed_count(),
                "retrieval failed: unknown record id"
            );
            return Err(VaultError::NotFound {
                attempts_remaining: guard.attempts_remaining(),
            });
        };

        let opened = if &material.verification == record.verification_hash() {
            decrypt(record.ciphertext(), &material.key).ok()
        } else {
            None
        };

        match opened {
            Some(plaintext) => {
                guard.record_success();
                tracing::info!(id = %record.id().short(), "retrieved note");
                Ok(plaintext)
            }
            None => {
                guard.record_failure();
                tracing::warn!(
                    id = %record.id().short(),
                    failed_count = guard.failed_count(),
                    "retrieval failed: passkey rejected"
                );
                Err(VaultError::PasskeyMismatch {
                    attempts_remaining: guard.attempts_remaining(),
                })
            }
        }
    }

    /// Clear the failed-attempt state with the master password.
    ///
    /// # Errors
    ///
    /// - `VaultError::TooSoon` while the cooldown is running, whatever the password
    /// - `VaultError::Auth` if the master password is wrong (state unchanged)
    pub fn reauthorize(&self, master_password: &str) -> Result<()> {
        let mut inner = self.lock_inner()?;

        let cooldown_remaining = inner.guard.cooldown_remaining();
        if !cooldown_remaining.is_zero() {
            return Err(VaultError::TooSoon { cooldown_remaining });
        }

        if !self.master.verify(master_password) {
            tracing::warn!("reauthorization rejected: incorrect master password");
            return Err(VaultError::Auth);
        }

        inner.guard.record_success();
        tracing::info!("vault reauthorized");
        Ok(())
    }

    pub fn status(&self) -> Result<VaultStatus> {
        let inner = self.lock_inner()?;
        let state = inner.guard.state();
        Ok(VaultStatus {
            record_count: inner.store.len(),
            attempts_remaining: inner.guard.attempts_remaining(),
            max_attempts: inner.guard.policy().max_attempts(),
            is_locked: inner.guard.is_locked(),
            cooldown_remaining: inner.guard.cooldown_remaining(),
            failed_attempts: state.failed_count,
            last_failure_at: state.last_failure_at,
        })
    }

    pub fn kdf_params(&self) -> &KdfParams {
        self.kdf.params()
    }
}

/// Stand-in verifier compared against when no record matches the id.
fn unknown_record_hash() -> VerificationHash {
    VerificationHash::from_bytes([0u8; KEY_LENGTH])
}

/// Builder for [`VaultService`].
#[derive(Debug)]
pub struct VaultServiceBuilder<S> {
    master: MasterSecret,
    policy: LockoutPolicy,
    kdf_params: KdfParams,
    clock: Arc<dyn Clock>,
    store: S,
}

impl<S: RecordStore> VaultServiceBuilder<S> {
    pub fn policy(mut self, policy: LockoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn kdf_params(mut self, params: KdfParams) -> Self {
        self.kdf_params = params;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a different record store.
    pub fn store<T: RecordStore>(self, store: T) -> VaultServiceBuilder<T> {
        VaultServiceBuilder {
            master: self.master,
            policy: self.policy,
            kdf_params: self.kdf_params,
            clock: self.clock,
            store,
        }
    }

    pub fn build(self) -> VaultService<S> {
        VaultService {
            kdf: KeyDeriver::new(self.kdf_params),
            master: self.master,
            inner: Mutex::new(VaultInner {
                store: self.store,
                guard: AttemptGuard::with_clock(self.policy, self.clock),
            }),
        }
    }
}
