//! # Governance State
//!
//! Registry state and coordinator bookkeeping live in a third store next to
//! the two ledgers, so a restart resumes where the last run stopped instead
//! of re-reading them from the configuration file.
//!
//! | Key | Value |
//! |-----|-------|
//! | `registry:snapshot` | bincode `RegistrySnapshot` |
//! | `meta:nonce` | u64, big-endian |
//! | `exec:{request_id}` | marker, insert-only |

use qm_02_signer_registry::RegistrySnapshot;
use shared_types::{BatchOperation, Hash, KVStoreError, KeyValueStore};
use thiserror::Error;

pub const REGISTRY_KEY: &[u8] = b"registry:snapshot";
pub const NONCE_KEY: &[u8] = b"meta:nonce";
pub const EXECUTED_PREFIX: &[u8] = b"exec:";

const EXECUTED_MARKER: &[u8] = &[1];

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Governance store error: {0}")]
    Storage(#[from] KVStoreError),

    #[error("Corrupt governance state: {0}")]
    Corrupt(String),
}

/// Request bookkeeping carried across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bookkeeping {
    pub nonce: u64,
    pub executed: Vec<Hash>,
}

/// Persistent registry and request bookkeeping.
pub struct GovernanceStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> GovernanceStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The persisted registry, or `None` before the first run.
    pub fn load_registry(&self) -> Result<Option<RegistrySnapshot>, StateError> {
        match self.store.get(REGISTRY_KEY)? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map(Some)
                .map_err(|e| StateError::Corrupt(format!("registry snapshot: {}", e))),
            None => Ok(None),
        }
    }

    pub fn save_registry(&mut self, snapshot: &RegistrySnapshot) -> Result<(), StateError> {
        let bytes = bincode::serialize(snapshot)
            .map_err(|e| StateError::Corrupt(format!("registry snapshot: {}", e)))?;
        self.store.put(REGISTRY_KEY, &bytes)?;
        Ok(())
    }

    pub fn load_bookkeeping(&self) -> Result<Bookkeeping, StateError> {
        let nonce = match self.store.get(NONCE_KEY)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| StateError::Corrupt("nonce is not 8 bytes".to_string()))?;
                u64::from_be_bytes(raw)
            }
            None => 0,
        };
        let executed = self
            .store
            .prefix_scan(EXECUTED_PREFIX)?
            .into_iter()
            .map(|(key, _)| {
                key[EXECUTED_PREFIX.len()..]
                    .try_into()
                    .map_err(|_| StateError::Corrupt("request id is not 32 bytes".to_string()))
            })
            .collect::<Result<Vec<Hash>, _>>()?;
        Ok(Bookkeeping { nonce, executed })
    }

    /// Record an executed request together with the nonce that follows it.
    pub fn record_execution(&mut self, nonce: u64, request_id: &Hash) -> Result<(), StateError> {
        self.store.atomic_batch_write(vec![
            BatchOperation::put(executed_key(request_id), EXECUTED_MARKER),
            BatchOperation::put(NONCE_KEY, nonce.to_be_bytes().to_vec()),
        ])?;
        Ok(())
    }
}

fn executed_key(request_id: &Hash) -> Vec<u8> {
    let mut key = Vec::with_capacity(EXECUTED_PREFIX.len() + 32);
    key.extend_from_slice(EXECUTED_PREFIX);
    key.extend_from_slice(request_id);
    key
}
