//! # Registry Errors

use shared_types::{Address, ErrorKind, Timestamp};
use thiserror::Error;

/// Signer registry errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller is not the registry owner.
    #[error("Unauthorized caller: {caller:?}")]
    Unauthorized { caller: Address },

    /// The null identity was supplied.
    #[error("Invalid signer: null identity")]
    NullSigner,

    /// The null identity was supplied as owner.
    #[error("Invalid owner: null identity")]
    NullOwner,

    /// Signer is already active.
    #[error("Signer already active: {0:?}")]
    AlreadySigner(Address),

    /// Signer is not active.
    #[error("Not an active signer: {0:?}")]
    NotSigner(Address),

    /// Removal would leave fewer active signers than the threshold.
    #[error("Removal would breach threshold: {remaining} signers left, threshold {threshold}")]
    BelowThreshold { remaining: usize, threshold: usize },

    /// Threshold outside `[1, signer_count]`.
    #[error("Invalid threshold {threshold}: must be between 1 and {signer_count}")]
    InvalidThreshold { threshold: usize, signer_count: usize },

    /// No threshold change is pending.
    #[error("No pending threshold change")]
    NoPendingProposal,

    /// Timelock has not elapsed.
    #[error("Timelock active: effective at {effective_time}, now {now}")]
    TimelockActive { effective_time: Timestamp, now: Timestamp },

    /// Signers were removed during the timelock window and the proposal no
    /// longer fits the active set.
    #[error("Stale threshold proposal: {proposed} exceeds {signer_count} active signers")]
    StaleThresholdProposal { proposed: usize, signer_count: usize },
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::Unauthorized { .. } => ErrorKind::AccessControl,
            RegistryError::NullSigner
            | RegistryError::NullOwner
            | RegistryError::InvalidThreshold { .. } => ErrorKind::Validation,
            RegistryError::AlreadySigner(_) | RegistryError::NotSigner(_) => {
                ErrorKind::StateConflict
            }
            RegistryError::NoPendingProposal | RegistryError::TimelockActive { .. } => {
                ErrorKind::Temporal
            }
            RegistryError::BelowThreshold { .. }
            | RegistryError::StaleThresholdProposal { .. } => ErrorKind::InvariantGuard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_threshold_message() {
        let err = RegistryError::BelowThreshold {
            remaining: 1,
            threshold: 2,
        };
        assert!(err.to_string().contains("threshold 2"));
        assert_eq!(err.kind(), ErrorKind::InvariantGuard);
    }

    #[test]
    fn test_timelock_kind() {
        let err = RegistryError::TimelockActive {
            effective_time: 100,
            now: 50,
        };
        assert_eq!(err.kind(), ErrorKind::Temporal);
    }
}
