//! # Storage Adapters
//!
//! The proof ledger, the token ledger and the governance state each get their
//! own store. With the `rocksdb` feature they are RocksDB databases under the
//! data directory:
//!
//! ```text
//! {data_dir}/proofs/
//! {data_dir}/tokens/
//! {data_dir}/governance/
//! ```
//!
//! Without it every store is an `InMemoryKVStore`.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};

pub use shared_types::InMemoryKVStore;

/// Subdirectory of the proof store.
pub const PROOF_STORE_DIR: &str = "proofs";

/// Subdirectory of the token store.
pub const TOKEN_STORE_DIR: &str = "tokens";

/// Subdirectory of the registry and bookkeeping store.
pub const GOVERNANCE_STORE_DIR: &str = "governance";
