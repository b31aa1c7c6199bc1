//! Persistence of (username → commitment) pairs.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use circuit::Commitment;

use crate::errors::StoreError;

/// Storage for enrolled commitments. One commitment per username.
pub trait CredentialStore: Send + Sync {
    /// Store `commitment` for `username`, replacing any previous enrollment.
    fn put(&self, username: &str, commitment: Commitment) -> Result<(), StoreError>;

    /// The commitment enrolled for `username`, or [`StoreError::NotFound`].
    fn get(&self, username: &str) -> Result<Commitment, StoreError>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for Arc<S> {
    fn put(&self, username: &str, commitment: Commitment) -> Result<(), StoreError> {
        (**self).put(username, commitment)
    }

    fn get(&self, username: &str) -> Result<Commitment, StoreError> {
        (**self).get(username)
    }
}

/// In-process credential store.
///
/// Snapshots are `bincode`-encoded and ordered by username, so equal contents
/// produce equal bytes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Commitment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of enrolled users. A poisoned lock still reports its contents;
    /// writers never leave the map half-updated.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Result<Vec<u8>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        bincode::serialize(&*entries).map_err(|e| StoreError::Snapshot(e.to_string()))
    }

    pub fn restore(bytes: &[u8]) -> Result<Self, StoreError> {
        let entries: BTreeMap<String, Commitment> =
            bincode::deserialize(bytes).map_err(|e| StoreError::Snapshot(e.to_string()))?;
        if entries.keys().any(|name| name.is_empty()) {
            return Err(StoreError::EmptyUsername);
        }
        Ok(Self {
            entries: RwLock::new(entries),
        })
    }
}

impl CredentialStore for MemoryStore {
    fn put(&self, username: &str, commitment: Commitment) -> Result<(), StoreError> {
        if username.is_empty() {
            return Err(StoreError::EmptyUsername);
        }
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.insert(username.to_string(), commitment);
        Ok(())
    }

    fn get(&self, username: &str) -> Result<Commitment, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        entries.get(username).cloned().ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field::Fr;

    fn commitment(value: u64) -> Commitment {
        Commitment::new(vec![Fr::from(value)])
    }

    #[test]
    fn test_put_get_overwrite() {
        let store = MemoryStore::new();
        assert_eq!(store.get("alice"), Err(StoreError::NotFound));

        store.put("alice", commitment(49)).expect("put");
        assert_eq!(store.get("alice"), Ok(commitment(49)));

        store.put("alice", commitment(64)).expect("put");
        assert_eq!(store.get("alice"), Ok(commitment(64)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_rejects_empty_username() {
        let store = MemoryStore::new();
        assert_eq!(store.put("", commitment(1)), Err(StoreError::EmptyUsername));
        assert!(store.is_empty());
    }

    #[test]
    fn test_snapshot_restore() {
        let store = MemoryStore::new();
        store.put("bob", commitment(4)).expect("put");
        store.put("alice", commitment(9)).expect("put");

        let bytes = store.snapshot().expect("snapshot");
        let restored = MemoryStore::restore(&bytes).expect("restore");
        assert_eq!(restored.get("alice"), Ok(commitment(9)));
        assert_eq!(restored.get("bob"), Ok(commitment(4)));
        assert_eq!(restored.snapshot().expect("snapshot"), bytes);

        assert!(matches!(
            MemoryStore::restore(&[0xff, 0x01]),
            Err(StoreError::Snapshot(_))
        ));
    }

    #[test]
    fn test_len_survives_poisoned_lock() {
        let store = Arc::new(MemoryStore::new());
        store.put("alice", commitment(49)).expect("put");
        store.put("bob", commitment(64)).expect("put");

        let poisoner = Arc::clone(&store);
        let result = std::thread::spawn(move || {
            let _guard = poisoner.entries.write().expect("lock");
            panic!("writer died while holding the lock");
        })
        .join();
        assert!(result.is_err());
        assert!(store.entries.is_poisoned());

        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
        assert_eq!(store.get("alice"), Err(StoreError::Poisoned));
    }

    #[test]
    fn test_shared_through_arc() {
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::new());
        store.put("carol", commitment(16)).expect("put");
        assert_eq!(store.get("carol"), Ok(commitment(16)));
    }
}
