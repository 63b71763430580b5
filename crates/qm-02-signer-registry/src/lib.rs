//! # QM-02 Signer Registry
//!
//! Holds the authorized verifier identities and the quorum threshold.
//!
//! ## Purpose
//!
//! - Owner-gated add/remove of verifiers
//! - Two-phase threshold change behind a 48 hour timelock, so a
//!   quorum-lowering change is observable before it takes effect
//! - Floor invariant: active signers never drop below the threshold
//!
//! ## Module Structure
//!
//! ```text
//! qm-02-signer-registry/
//! ├── domain/          # SignerSet state machine, proposal, errors
//! ├── ports/           # SignerRegistryApi
//! └── service.rs       # SignerRegistry (ownership, clock, audit events)
//! ```

#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use domain::{
    RegistryConfig, RegistryError, RegistrySnapshot, SignerRecord, SignerSet,
    ThresholdChangeProposal, DEFAULT_TIMELOCK_DELAY_SECS,
};
pub use ports::SignerRegistryApi;
pub use service::SignerRegistry;
