//! # Quorum-Mint Oracle Runtime
//!
//! Library half of the `oracle-runtime` binary.
//!
//! ## Modular Structure
//!
//! - `admin` - signer rotation and threshold commands
//! - `config` - JSON configuration with environment overrides
//! - `requests` - request file format and per-request outcomes
//! - `signing` - helpers verifiers use to produce attestations
//! - `state` - persisted registry and request bookkeeping
//! - `storage` - in-memory and RocksDB stores
//! - `wiring` - builds the coordinator and drives requests through it

pub mod admin;
pub mod config;
pub mod requests;
pub mod signing;
pub mod state;
pub mod storage;
pub mod wiring;

pub use admin::{run_admin, AdminCommand, RegistryStatus};
pub use config::{ConfigError, OracleConfig, ResolvedIdentities};
pub use requests::{MintRequest, RequestOutcome};
pub use state::{Bookkeeping, GovernanceStore, StateError};
pub use wiring::{build_coordinator, open_registry, process_request};
