//! # Token Ledger Errors

use shared_types::{Address, Amount, ErrorKind, Hash, KVStoreError};
use thiserror::Error;

/// Token ledger errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Unauthorized caller: {caller:?}")]
    Unauthorized { caller: Address },

    /// Null recipient, spender or administrative identity.
    #[error("Invalid address: null identity")]
    NullAddress,

    #[error("Invalid proof hash: zero commitment")]
    ZeroProofHash,

    /// Commitment already consumed by an earlier mint.
    #[error("Proof already used: {0:?}")]
    ProofAlreadyUsed(Hash),

    #[error("Insufficient balance: have {balance}, need {needed}")]
    InsufficientBalance { balance: Amount, needed: Amount },

    #[error("Insufficient allowance: have {allowance}, need {needed}")]
    InsufficientAllowance { allowance: Amount, needed: Amount },

    /// Supply or a balance would exceed 2^256 - 1.
    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Token store error: {0}")]
    Storage(#[from] KVStoreError),
}

impl TokenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenError::Unauthorized { .. } => ErrorKind::AccessControl,
            TokenError::NullAddress | TokenError::ZeroProofHash => ErrorKind::Validation,
            TokenError::ProofAlreadyUsed(_)
            | TokenError::InsufficientBalance { .. }
            | TokenError::InsufficientAllowance { .. }
            | TokenError::Overflow => ErrorKind::StateConflict,
            TokenError::Storage(_) => ErrorKind::Storage,
        }
    }
}
