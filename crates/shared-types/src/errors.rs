//! # Error Types
//!
//! Error types shared across subsystems.

use thiserror::Error;

/// Errors raised by a `KeyValueStore` implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Data corruption in the store (undecodable value).
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
}

/// Classification of every failure a call can end with.
///
/// Every failure is synchronous and rolls the call back in full; retrying is
/// only meaningful for `Validation`, `StateConflict` and `Temporal` after the
/// underlying condition changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller lacks the required role.
    AccessControl,
    /// Null identity, zero commitment, empty label, malformed signature.
    Validation,
    /// Duplicate proof or signer, insufficient balance, allowance or votes.
    StateConflict,
    /// Timelock not yet elapsed, no pending proposal.
    Temporal,
    /// Operation would breach the signer/threshold floor.
    InvariantGuard,
    /// The backing store failed.
    Storage,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorKind::AccessControl => "access-control",
            ErrorKind::Validation => "validation",
            ErrorKind::StateConflict => "state-conflict",
            ErrorKind::Temporal => "temporal",
            ErrorKind::InvariantGuard => "invariant-guard",
            ErrorKind::Storage => "storage",
        };
        f.write_str(label)
    }
}
