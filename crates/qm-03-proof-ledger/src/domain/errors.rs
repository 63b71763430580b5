//! # Proof Ledger Errors

use shared_types::{Address, ErrorKind, Hash, KVStoreError};
use thiserror::Error;

/// Proof ledger errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProofLedgerError {
    /// Caller is neither the oracle (for registration) nor the owner (for
    /// administration).
    #[error("Unauthorized caller: {caller:?}")]
    Unauthorized { caller: Address },

    /// Zero-valued commitment.
    #[error("Invalid proof hash: zero commitment")]
    ZeroProofHash,

    /// Null actor or null administrative identity.
    #[error("Invalid address: null identity")]
    NullAddress,

    /// Empty action-type label.
    #[error("Invalid action type: empty label")]
    EmptyActionType,

    /// Commitment already registered.
    #[error("Proof already registered: {0:?}")]
    ProofAlreadyRegistered(Hash),

    /// Backing store failed or held an undecodable value.
    #[error("Proof store error: {0}")]
    Storage(#[from] KVStoreError),
}

impl ProofLedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProofLedgerError::Unauthorized { .. } => ErrorKind::AccessControl,
            ProofLedgerError::ZeroProofHash
            | ProofLedgerError::NullAddress
            | ProofLedgerError::EmptyActionType => ErrorKind::Validation,
            ProofLedgerError::ProofAlreadyRegistered(_) => ErrorKind::StateConflict,
            ProofLedgerError::Storage(_) => ErrorKind::Storage,
        }
    }
}
