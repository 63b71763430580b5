//! # QM-03 Proof Ledger
//!
//! Persistent map from a 256-bit proof commitment to immutable metadata
//! (actor, action category, timestamp).
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Commitments are globally unique | existence check before every write |
//! | Records are immutable | no update operation; only an unpublished `RegistrationReceipt` can be rolled back |
//! | Zero commitment is never a key | rejected at validation |
//! | Only the oracle identity registers | caller check |
//!
//! ## Module Structure
//!
//! ```text
//! qm-03-proof-ledger/
//! ├── domain/          # ProofRecord, key layout, errors
//! ├── ports/           # ProofLedgerApi
//! └── service.rs       # ProofLedger over a KeyValueStore
//! ```

#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{PreparedRegistration, ProofLedgerError, ProofRecord, RegistrationReceipt};
pub use ports::ProofLedgerApi;
pub use service::ProofLedger;
