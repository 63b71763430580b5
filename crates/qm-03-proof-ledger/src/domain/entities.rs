//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::{Address, AuditEvent, Hash, Timestamp};

/// Metadata stored under a proof commitment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRecord {
    /// Who performed the attested action.
    pub actor: Address,
    /// Action category label. Never empty.
    pub action_type: String,
    /// When the proof was registered.
    pub timestamp: Timestamp,
    /// Always true for a stored record.
    pub exists: bool,
}

/// A registration that passed validation and has not been written yet.
///
/// Built only by `ProofLedger::prepare_registration`. Committing it
/// re-validates against the ledger's current state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedRegistration {
    pub(crate) caller: Address,
    pub(crate) commitment: Hash,
    pub(crate) record: ProofRecord,
}

impl PreparedRegistration {
    pub fn commitment(&self) -> Hash {
        self.commitment
    }

    pub fn record(&self) -> &ProofRecord {
        &self.record
    }
}

/// Handle to a registration written by `ProofLedger::commit_registration`.
///
/// Holds the unpublished `ProofRegistered` event. Consumed either by
/// `into_events` once the surrounding unit of work succeeds, or by
/// `ProofLedger::rollback_registration` when it fails.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a committed registration must be published or rolled back"]
pub struct RegistrationReceipt {
    pub(crate) commitment: Hash,
    pub(crate) record: ProofRecord,
}

impl RegistrationReceipt {
    pub fn commitment(&self) -> Hash {
        self.commitment
    }

    pub fn into_events(self) -> Vec<AuditEvent> {
        vec![AuditEvent::ProofRegistered {
            proof_hash: self.commitment,
            actor: self.record.actor,
            action_type: self.record.action_type,
            timestamp: self.record.timestamp,
        }]
    }
}
