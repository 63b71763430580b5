//! # Domain Layer
//!
//! Verifier set bookkeeping with no clock, ownership or event concerns.

pub mod entities;
pub mod errors;
pub mod signer_set;

pub use entities::{
    RegistryConfig, RegistrySnapshot, SignerRecord, ThresholdChangeProposal,
    DEFAULT_TIMELOCK_DELAY_SECS,
};
pub use errors::RegistryError;
pub use signer_set::SignerSet;
