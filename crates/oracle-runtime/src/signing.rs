//! Off-chain signing helpers for verifiers.

use k256::ecdsa::SigningKey;
use qm_01_signature_recovery::{address_from_pubkey, sign_prehash, SignatureError};
use qm_05_request_coordinator::message_hash;
use shared_types::{Address, Amount, Hash};
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Private key must be 32 bytes of hex")]
    InvalidKeyEncoding,

    #[error("Private key is not a valid secp256k1 scalar")]
    InvalidKey,

    #[error("Signing failed: {0}")]
    Signature(#[from] SignatureError),
}

/// Parse a hex-encoded secp256k1 private key.
pub fn signing_key_from_hex(input: &str) -> Result<SigningKey, SigningError> {
    let bytes = Zeroizing::new(
        hex::decode(input.trim().trim_start_matches("0x"))
            .map_err(|_| SigningError::InvalidKeyEncoding)?,
    );
    if bytes.len() != 32 {
        return Err(SigningError::InvalidKeyEncoding);
    }
    SigningKey::from_slice(&bytes).map_err(|_| SigningError::InvalidKey)
}

/// Address that `key` signs as.
pub fn signer_address(key: &SigningKey) -> Address {
    address_from_pubkey(key.verifying_key())
}

/// Produce the 65-byte attestation a verifier submits for a claim.
pub fn sign_claim(
    key: &SigningKey,
    actor: &Address,
    amount: &Amount,
    proof: &Hash,
) -> Result<[u8; 65], SigningError> {
    let digest = message_hash(actor, amount, proof);
    Ok(sign_prehash(&digest, key)?.to_bytes())
}
