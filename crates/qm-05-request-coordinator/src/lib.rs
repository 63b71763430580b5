//! # QM-05 Request Coordinator
//!
//! Entry point of the mint path. `verify_and_mint` recovers the signers of an
//! action claim, counts distinct active verifiers against the registry
//! threshold and, only when quorum is met, registers the proof and mints the
//! credits as one unit of work.
//!
//! ## Flow
//!
//! ```text
//! verify_and_mint
//!   ├── owner check, argument validation
//!   ├── message digest + request id
//!   ├── decode every signature (malformed => whole call fails)
//!   ├── recover + registry membership => distinct votes
//!   ├── dual dedup check (proof ledger, token ledger)
//!   └── MintUnitOfWork: proofs → tokens, revert proofs on failure
//! ```
//!
//! Nothing becomes visible (nonce, executed request ids, audit events) until
//! both ledgers have committed.

#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;
pub mod unit_of_work;

pub use domain::{
    message_hash, request_id, CoordinatorConfig, CoordinatorError, VoteTally,
    DEFAULT_ACTION_TYPE,
};
pub use ports::RequestCoordinatorApi;
pub use service::RequestCoordinator;
pub use unit_of_work::MintUnitOfWork;
