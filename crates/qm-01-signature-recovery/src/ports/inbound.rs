//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use crate::domain::entities::EcdsaSignature;
use crate::domain::errors::SignatureError;
use shared_types::{Address, Hash};

/// Signature recovery API.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait SignatureRecoveryApi: Send + Sync {
    /// Decode and validate a 65-byte `r || s || v` signature.
    ///
    /// # Security
    /// - Rejects signatures with high S values (EIP-2 malleability protection)
    fn decode(&self, bytes: &[u8]) -> Result<EcdsaSignature, SignatureError>;

    /// Recover the signer of `digest`.
    ///
    /// `digest` is the raw message digest; implementations apply the signed
    /// message envelope before recovery.
    fn recover_signer(
        &self,
        digest: &Hash,
        signature: &EcdsaSignature,
    ) -> Result<Address, SignatureError>;
}
