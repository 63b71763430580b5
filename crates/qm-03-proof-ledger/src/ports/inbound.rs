//! # Inbound Ports (Driving Ports / API)

use crate::domain::{ProofLedgerError, ProofRecord};
use shared_types::{Address, Hash, Timestamp};

/// Proof ledger API.
pub trait ProofLedgerApi {
    /// Record a commitment. Only the oracle identity may call this.
    fn register_proof(
        &mut self,
        caller: Address,
        commitment: Hash,
        actor: Address,
        action_type: &str,
        timestamp: Timestamp,
    ) -> Result<(), ProofLedgerError>;

    /// Metadata for a registered commitment.
    fn get_proof(&self, commitment: &Hash) -> Result<Option<ProofRecord>, ProofLedgerError>;

    /// Whether a commitment is registered.
    fn is_registered(&self, commitment: &Hash) -> Result<bool, ProofLedgerError>;
}
