//! In-memory record store.
//!
//! Records live for the lifetime of the process and are never written to
//! disk.

use std::collections::HashMap;

use super::traits::RecordStore;
use super::types::{Record, RecordId};
use crate::error::{Result, VaultError};

/// `HashMap`-backed [`RecordStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<RecordId, Record>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn put(&mut self, record: Record) -> Result<()> {
        let id = record.id();
        if self.records.contains_key(&id) {
            return Err(VaultError::DuplicateId(id));
        }
        self.records.insert(id, record);
        Ok(())
    }

    fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{encrypt, KdfParams, KeyDeriver};
    use chrono::Utc;

    fn record(id: RecordId, passkey: &str) -> Record {
        let material = KeyDeriver::new(KdfParams::new(1024, 1, 1).unwrap())
            .derive(passkey)
            .unwrap();
        let ciphertext = encrypt("note", &material.key).unwrap();
        Record::new(id, ciphertext, material.verification, Utc::now())
    }

    #[test]
    fn test_put_then_get() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());

        let id = RecordId::generate();
        store.put(record(id, "pw1")).unwrap();

        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert_eq!(store.get(&id).map(Record::id), Some(id));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = MemoryStore::new();
        assert!(store.get(&RecordId::generate()).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store = MemoryStore::new();
        let id = RecordId::generate();
        store.put(record(id, "pw1")).unwrap();

        let result = store.put(record(id, "pw2"));
        assert!(matches!(result, Err(VaultError::DuplicateId(dup)) if dup == id));
        assert_eq!(store.len(), 1);

        let kept = store.get(&id).unwrap();
        let expected = KeyDeriver::new(KdfParams::new(1024, 1, 1).unwrap())
            .verification_hash("pw1")
            .unwrap();
        assert_eq!(kept.verification_hash(), &expected);
    }
}
