//! # QM-04 Token Ledger
//!
//! Account balances and total supply. The only way supply grows is `mint`,
//! which consumes a proof commitment and is callable only by the oracle
//! identity (the request coordinator). Anyone may `burn` their own credits.
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | `total_supply == Σ balance_of` | every mutation writes balance and supply in one batch |
//! | Balances never go negative | checked subtraction before staging |
//! | A commitment mints at most once | `used:` set consulted before every mint |
//!
//! ## Module Structure
//!
//! ```text
//! qm-04-token-ledger/
//! ├── domain/          # metadata, key layout, errors
//! ├── ports/           # TokenLedgerApi
//! └── service.rs       # TokenLedger over a KeyValueStore
//! ```

#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{MintReceipt, PreparedMint, TokenError, TokenMetadata};
pub use ports::TokenLedgerApi;
pub use service::TokenLedger;
