//! # Signature Recovery Subsystem (QM-01)
//!
//! Recovers verifier identities from secp256k1 attestations.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure cryptographic logic, no I/O
//! - **Ports Layer** (`ports/`): `SignatureRecoveryApi`, the seam the request
//!   coordinator depends on
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: Signatures with high S values are rejected
//! - **Envelope**: digests are wrapped in the `"\x19Ethereum Signed Message:\n32"`
//!   envelope before recovery, matching what off-chain signers produce
//! - Recovery arithmetic is delegated to the `k256` crate

pub mod domain;
pub mod ports;

// Re-export public API
pub use domain::ecdsa::{
    address_from_pubkey, keccak256, recover_address, sign_prehash, to_eth_signed_message_hash,
    validate_signature, EcdsaRecoverer,
};
pub use domain::entities::{EcdsaSignature, SIGNATURE_LENGTH};
pub use domain::errors::SignatureError;
pub use ports::inbound::SignatureRecoveryApi;
