//! Digests signed by verifiers and the per-call request id.

use qm_01_signature_recovery::keccak256;
use shared_types::{amount_to_be_bytes, Address, Amount, Hash, Timestamp};

/// Digest a verifier signs: `keccak256(actor ‖ amount ‖ proof_commitment)`.
///
/// `amount` is encoded as 32 big-endian bytes. Signers wrap this digest in
/// the signed-message envelope before signing.
pub fn message_hash(actor: &Address, amount: &Amount, proof_commitment: &Hash) -> Hash {
    let mut buf = Vec::with_capacity(20 + 32 + 32);
    buf.extend_from_slice(actor);
    buf.extend_from_slice(&amount_to_be_bytes(amount));
    buf.extend_from_slice(proof_commitment);
    keccak256(&buf)
}

/// `keccak256(actor ‖ amount ‖ proof_commitment ‖ nonce ‖ now)`, with nonce
/// and time widened to 32 big-endian bytes.
pub fn request_id(
    actor: &Address,
    amount: &Amount,
    proof_commitment: &Hash,
    nonce: u64,
    now: Timestamp,
) -> Hash {
    let mut buf = Vec::with_capacity(20 + 32 * 4);
    buf.extend_from_slice(actor);
    buf.extend_from_slice(&amount_to_be_bytes(amount));
    buf.extend_from_slice(proof_commitment);
    buf.extend_from_slice(&amount_to_be_bytes(&Amount::from(nonce)));
    buf.extend_from_slice(&amount_to_be_bytes(&Amount::from(now)));
    keccak256(&buf)
}
