//! # Coordinator Errors

use qm_01_signature_recovery::SignatureError;
use qm_03_proof_ledger::ProofLedgerError;
use qm_04_token_ledger::TokenError;
use shared_types::{Address, ErrorKind, Hash};
use thiserror::Error;

/// Errors returned by `verify_and_mint` and coordinator administration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("Unauthorized caller: {caller:?}")]
    Unauthorized { caller: Address },

    #[error("Invalid actor: null identity")]
    NullActor,

    #[error("Invalid address: null identity")]
    NullAddress,

    #[error("Invalid proof hash: zero commitment")]
    ZeroProofHash,

    /// Fewer signatures supplied than the threshold requires.
    #[error("Insufficient signatures: {provided} provided, threshold {threshold}")]
    InsufficientSignatures { provided: usize, threshold: usize },

    #[error("Malformed signature at index {index}: {source}")]
    MalformedSignature {
        index: usize,
        #[source]
        source: SignatureError,
    },

    /// Not enough distinct active signers among the recovered identities.
    #[error("Insufficient votes: {have} of {need}")]
    InsufficientVotes { have: usize, need: usize },

    #[error("Proof already registered: {0:?}")]
    ProofAlreadyRegistered(Hash),

    #[error("Proof already used: {0:?}")]
    ProofAlreadyUsed(Hash),

    #[error("Request already executed: {0:?}")]
    RequestAlreadyExecuted(Hash),

    /// The ledgers do not accept this coordinator's identity.
    #[error("Coordinator identity {identity:?} is not the oracle of both ledgers")]
    OracleMismatch { identity: Address },

    #[error("Proof ledger error: {0}")]
    ProofLedger(#[from] ProofLedgerError),

    #[error("Token ledger error: {0}")]
    TokenLedger(#[from] TokenError),

    /// The mint failed after the proof was written and the proof could not be
    /// removed again. The two stores may have diverged.
    #[error("Rollback failed after {commit}: {rollback}")]
    RollbackFailed {
        commit: TokenError,
        rollback: ProofLedgerError,
    },
}

impl CoordinatorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoordinatorError::Unauthorized { .. } | CoordinatorError::OracleMismatch { .. } => {
                ErrorKind::AccessControl
            }
            CoordinatorError::NullActor
            | CoordinatorError::NullAddress
            | CoordinatorError::ZeroProofHash
            | CoordinatorError::MalformedSignature { .. } => ErrorKind::Validation,
            CoordinatorError::InsufficientSignatures { .. }
            | CoordinatorError::InsufficientVotes { .. }
            | CoordinatorError::ProofAlreadyRegistered(_)
            | CoordinatorError::ProofAlreadyUsed(_)
            | CoordinatorError::RequestAlreadyExecuted(_) => ErrorKind::StateConflict,
            CoordinatorError::ProofLedger(e) => e.kind(),
            CoordinatorError::TokenLedger(e) => e.kind(),
            CoordinatorError::RollbackFailed { .. } => ErrorKind::Storage,
        }
    }
}
