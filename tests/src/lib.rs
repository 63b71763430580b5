//! # Quorum-Mint Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Harness: signer keys, coordinator, clock, event log
//! └── integration/      # Cross-crate scenarios
//!     ├── scenarios.rs  # End-to-end mint, repeat, insufficient votes, burn
//!     ├── quorum.rs     # Distinct voters, ordering, malformed signatures
//!     ├── governance.rs # Signer rotation and the threshold timelock
//!     └── invariants.rs # Supply accounting, dedup, rollback, audit stream
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qm-tests
//! cargo test -p qm-tests integration::quorum
//!
//! # Benchmarks
//! cargo bench -p qm-tests
//! ```

pub mod fixtures;
pub mod integration;
