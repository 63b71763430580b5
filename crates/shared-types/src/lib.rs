//! # Shared Types Crate
//!
//! Primitives and driven ports shared by every Quorum-Mint subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identities, hashes and amounts are defined here.
//! - **Explicit Stores**: ledgers own a `KeyValueStore`; nothing lives in
//!   ambient globals.
//! - **Audit Trail**: every provenance-relevant transition becomes an
//!   `AuditEvent` published through an `EventSink`.

pub mod entities;
pub mod errors;
pub mod events;
pub mod storage;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use events::{AuditEvent, EventSink, InMemoryEventLog, TracingEventSink};
pub use storage::{BatchOperation, InMemoryKVStore, KeyValueStore};
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource};
