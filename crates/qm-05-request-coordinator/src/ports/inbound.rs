//! # Inbound Ports

use crate::domain::CoordinatorError;
use shared_types::{Address, Amount, Hash};

/// Request coordinator API.
pub trait RequestCoordinatorApi {
    /// Verify a quorum of signatures over `(actor, amount, proof_commitment)`
    /// and, if met, register the proof and mint `amount` to `actor`.
    ///
    /// Returns the request id. On any error no state is changed.
    fn verify_and_mint(
        &mut self,
        caller: Address,
        actor: Address,
        amount: Amount,
        proof_commitment: Hash,
        signatures: &[Vec<u8>],
    ) -> Result<Hash, CoordinatorError>;

    fn is_request_executed(&self, request_id: &Hash) -> bool;

    /// Number of committed `verify_and_mint` calls.
    fn nonce(&self) -> u64;
}
