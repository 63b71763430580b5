//! Key layout inside the proof store.

use shared_types::Hash;

/// Prefix for proof records: `proof:{commitment}`.
pub const PROOF_PREFIX: &[u8] = b"proof:";

/// Number of registered proofs.
pub const PROOF_COUNT_KEY: &[u8] = b"meta:proof_count";

pub fn proof_key(commitment: &Hash) -> Vec<u8> {
    let mut key = Vec::with_capacity(PROOF_PREFIX.len() + commitment.len());
    key.extend_from_slice(PROOF_PREFIX);
    key.extend_from_slice(commitment);
    key
}
