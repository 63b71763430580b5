//! # Domain Layer

pub mod entities;
pub mod errors;
pub mod keys;

pub use entities::{PreparedRegistration, ProofRecord, RegistrationReceipt};
pub use errors::ProofLedgerError;
