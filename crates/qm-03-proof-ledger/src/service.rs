//! # Proof Ledger Service
//!
//! `ProofLedger` owns its `KeyValueStore`. Registration is split into
//! `prepare_registration` (validation, no writes) and `commit_registration`
//! (re-validation, one atomic batch) so the request coordinator can commit a
//! proof and a mint as one unit of work. The receipt returned by a commit is
//! the only handle that can undo it.

use crate::domain::keys::{proof_key, PROOF_COUNT_KEY, PROOF_PREFIX};
use crate::domain::{PreparedRegistration, ProofLedgerError, ProofRecord, RegistrationReceipt};
use crate::ports::ProofLedgerApi;
use shared_types::{
    address_to_hex, hash_to_hex, is_zero_address, is_zero_hash, Address, AuditEvent,
    BatchOperation, EventSink, Hash, KVStoreError, KeyValueStore, Timestamp,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Append-only proof store.
pub struct ProofLedger<S: KeyValueStore> {
    store: S,
    owner: Address,
    oracle: Address,
    events: Arc<dyn EventSink>,
}

impl<S: KeyValueStore> ProofLedger<S> {
    /// Create a ledger administered by `owner` that accepts registrations
    /// from `oracle`.
    pub fn new(
        store: S,
        owner: Address,
        oracle: Address,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, ProofLedgerError> {
        if is_zero_address(&owner) || is_zero_address(&oracle) {
            return Err(ProofLedgerError::NullAddress);
        }
        Ok(Self {
            store,
            owner,
            oracle,
            events,
        })
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Identity allowed to register proofs.
    pub fn oracle(&self) -> Address {
        self.oracle
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of registered proofs.
    pub fn proof_count(&self) -> Result<u64, ProofLedgerError> {
        match self.store.get(PROOF_COUNT_KEY)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    KVStoreError::CorruptionError {
                        message: "proof count is not 8 bytes".to_string(),
                    }
                })?;
                Ok(u64::from_be_bytes(raw))
            }
            None => Ok(0),
        }
    }

    /// All registered commitments with their records.
    pub fn proofs(&self) -> Result<Vec<(Hash, ProofRecord)>, ProofLedgerError> {
        self.store
            .prefix_scan(PROOF_PREFIX)?
            .into_iter()
            .map(|(key, value)| {
                let commitment: Hash =
                    key[PROOF_PREFIX.len()..]
                        .try_into()
                        .map_err(|_| KVStoreError::CorruptionError {
                            message: "proof key is not 32 bytes".to_string(),
                        })?;
                Ok((commitment, decode_record(&value)?))
            })
            .collect()
    }

    /// Validate a registration without writing it.
    pub fn prepare_registration(
        &self,
        caller: Address,
        commitment: Hash,
        actor: Address,
        action_type: &str,
        timestamp: Timestamp,
    ) -> Result<PreparedRegistration, ProofLedgerError> {
        let record = ProofRecord {
            actor,
            action_type: action_type.to_string(),
            timestamp,
            exists: true,
        };
        self.validate_registration(caller, &commitment, &record)?;
        Ok(PreparedRegistration {
            caller,
            commitment,
            record,
        })
    }

    /// Write a prepared registration.
    ///
    /// Every check of `prepare_registration` runs again against the current
    /// state, so a registration prepared before the oracle changed or before
    /// the same commitment was registered elsewhere is rejected. The
    /// `ProofRegistered` event is carried by the receipt, not published.
    pub fn commit_registration(
        &mut self,
        prepared: PreparedRegistration,
    ) -> Result<RegistrationReceipt, ProofLedgerError> {
        let PreparedRegistration {
            caller,
            commitment,
            record,
        } = prepared;
        self.validate_registration(caller, &commitment, &record)?;

        let count = self.proof_count()?.saturating_add(1);
        self.store.atomic_batch_write(vec![
            BatchOperation::put(proof_key(&commitment), encode_record(&record)?),
            BatchOperation::put(PROOF_COUNT_KEY, count.to_be_bytes().to_vec()),
        ])?;
        Ok(RegistrationReceipt { commitment, record })
    }

    /// Remove a registration whose unit of work failed before its events were
    /// published.
    pub fn rollback_registration(
        &mut self,
        receipt: RegistrationReceipt,
    ) -> Result<(), ProofLedgerError> {
        let stored = match self.store.get(&proof_key(&receipt.commitment))? {
            Some(bytes) => decode_record(&bytes)?,
            None => {
                return Err(KVStoreError::CorruptionError {
                    message: "rolled-back proof is not stored".to_string(),
                }
                .into())
            }
        };
        if stored != receipt.record {
            return Err(KVStoreError::CorruptionError {
                message: "rolled-back proof does not match its receipt".to_string(),
            }
            .into());
        }
        let count = self.proof_count()?.checked_sub(1).ok_or_else(|| {
            KVStoreError::CorruptionError {
                message: "proof count is zero with a stored proof".to_string(),
            }
        })?;

        self.store.atomic_batch_write(vec![
            BatchOperation::delete(proof_key(&receipt.commitment)),
            BatchOperation::put(PROOF_COUNT_KEY, count.to_be_bytes().to_vec()),
        ])?;
        debug!(proof_hash = %hash_to_hex(&receipt.commitment), "Proof registration rolled back");
        Ok(())
    }

    /// Change the identity allowed to register proofs. Owner only, no timelock.
    pub fn update_oracle(
        &mut self,
        caller: Address,
        new_oracle: Address,
    ) -> Result<(), ProofLedgerError> {
        self.ensure_owner(caller)?;
        if is_zero_address(&new_oracle) {
            return Err(ProofLedgerError::NullAddress);
        }
        let old_oracle = std::mem::replace(&mut self.oracle, new_oracle);
        info!(
            old_oracle = %address_to_hex(&old_oracle),
            new_oracle = %address_to_hex(&new_oracle),
            "Proof ledger oracle updated"
        );
        self.events.publish(AuditEvent::OracleUpdated {
            old_oracle,
            new_oracle,
        });
        Ok(())
    }

    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), ProofLedgerError> {
        self.ensure_owner(caller)?;
        if is_zero_address(&new_owner) {
            return Err(ProofLedgerError::NullAddress);
        }
        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        self.events.publish(AuditEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    fn validate_registration(
        &self,
        caller: Address,
        commitment: &Hash,
        record: &ProofRecord,
    ) -> Result<(), ProofLedgerError> {
        if caller != self.oracle {
            return Err(ProofLedgerError::Unauthorized { caller });
        }
        if is_zero_hash(commitment) {
            return Err(ProofLedgerError::ZeroProofHash);
        }
        if is_zero_address(&record.actor) {
            return Err(ProofLedgerError::NullAddress);
        }
        if record.action_type.is_empty() {
            return Err(ProofLedgerError::EmptyActionType);
        }
        if self.is_registered(commitment)? {
            return Err(ProofLedgerError::ProofAlreadyRegistered(*commitment));
        }
        Ok(())
    }

    fn ensure_owner(&self, caller: Address) -> Result<(), ProofLedgerError> {
        if caller != self.owner {
            warn!(caller = %address_to_hex(&caller), "Rejected proof ledger admin call");
            return Err(ProofLedgerError::Unauthorized { caller });
        }
        Ok(())
    }
}

impl<S: KeyValueStore> ProofLedgerApi for ProofLedger<S> {
    fn register_proof(
        &mut self,
        caller: Address,
        commitment: Hash,
        actor: Address,
        action_type: &str,
        timestamp: Timestamp,
    ) -> Result<(), ProofLedgerError> {
        let prepared = self
            .prepare_registration(caller, commitment, actor, action_type, timestamp)
            .inspect_err(|e| {
                warn!(proof_hash = %hash_to_hex(&commitment), error = %e, "Proof registration rejected");
            })?;
        let receipt = self.commit_registration(prepared)?;
        info!(proof_hash = %hash_to_hex(&commitment), "Proof registered");
        for event in receipt.into_events() {
            self.events.publish(event);
        }
        Ok(())
    }

    fn get_proof(&self, commitment: &Hash) -> Result<Option<ProofRecord>, ProofLedgerError> {
        match self.store.get(&proof_key(commitment))? {
            Some(bytes) => Ok(Some(decode_record(&bytes)?)),
            None => Ok(None),
        }
    }

    fn is_registered(&self, commitment: &Hash) -> Result<bool, ProofLedgerError> {
        if is_zero_hash(commitment) {
            return Ok(false);
        }
        let registered = self.store.exists(&proof_key(commitment))?;
        debug!(proof_hash = %hash_to_hex(commitment), registered, "Proof lookup");
        Ok(registered)
    }
}

fn encode_record(record: &ProofRecord) -> Result<Vec<u8>, KVStoreError> {
    bincode::serialize(record).map_err(|e| KVStoreError::CorruptionError {
        message: format!("failed to encode proof record: {}", e),
    })
}

fn decode_record(bytes: &[u8]) -> Result<ProofRecord, KVStoreError> {
    bincode::deserialize(bytes).map_err(|e| KVStoreError::CorruptionError {
        message: format!("failed to decode proof record: {}", e),
    })
}
