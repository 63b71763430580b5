//! # Cross-Crate Integration Tests

pub mod governance;
pub mod invariants;
pub mod quorum;
pub mod scenarios;
