//! # Audit Events
//!
//! Every state transition that matters for provenance is published as an
//! `AuditEvent`. Off-chain indexers and auditors consume this stream, so the
//! variant names and field order below are part of the external contract.

use crate::entities::{address_to_hex, hash_to_hex, Address, Amount, Hash, Timestamp};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// All events emitted by the registry, the ledgers and the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum AuditEvent {
    // =========================================================================
    // SIGNER REGISTRY
    // =========================================================================
    /// A verifier identity was activated.
    SignerAdded { signer: Address },

    /// A verifier identity was deactivated.
    SignerRemoved { signer: Address },

    /// A threshold change entered its timelock window.
    ThresholdUpdateProposed {
        old_threshold: usize,
        new_threshold: usize,
        effective_time: Timestamp,
    },

    /// A proposed threshold became active.
    ThresholdUpdated {
        old_threshold: usize,
        new_threshold: usize,
    },

    // =========================================================================
    // REQUEST COORDINATOR
    // =========================================================================
    /// A recovered signer counted towards quorum for a request.
    VoteAccepted { request_id: Hash, signer: Address },

    /// A quorum-backed request committed its proof and mint.
    MintRequestCompleted {
        request_id: Hash,
        actor: Address,
        amount: Amount,
        proof_hash: Hash,
    },

    // =========================================================================
    // PROOF LEDGER
    // =========================================================================
    /// A proof commitment was recorded.
    ProofRegistered {
        proof_hash: Hash,
        actor: Address,
        action_type: String,
        timestamp: Timestamp,
    },

    // =========================================================================
    // TOKEN LEDGER
    // =========================================================================
    /// New credits were created against a proof commitment.
    TokensMinted {
        to: Address,
        amount: Amount,
        proof_hash: Hash,
    },

    /// Balance moved between accounts (zero address for mint/burn legs).
    Transfer {
        from: Address,
        to: Address,
        value: Amount,
    },

    /// An allowance was set.
    Approval {
        owner: Address,
        spender: Address,
        value: Amount,
    },

    /// Credits were destroyed by their holder.
    TokensBurned { from: Address, amount: Amount },

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================
    /// The identity allowed to call gated ledger operations changed.
    OracleUpdated {
        old_oracle: Address,
        new_oracle: Address,
    },

    /// The administrative authority changed.
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

impl AuditEvent {
    /// Short event name, matching the serialized `event` tag.
    pub fn name(&self) -> &'static str {
        match self {
            AuditEvent::SignerAdded { .. } => "SignerAdded",
            AuditEvent::SignerRemoved { .. } => "SignerRemoved",
            AuditEvent::ThresholdUpdateProposed { .. } => "ThresholdUpdateProposed",
            AuditEvent::ThresholdUpdated { .. } => "ThresholdUpdated",
            AuditEvent::VoteAccepted { .. } => "VoteAccepted",
            AuditEvent::MintRequestCompleted { .. } => "MintRequestCompleted",
            AuditEvent::ProofRegistered { .. } => "ProofRegistered",
            AuditEvent::TokensMinted { .. } => "TokensMinted",
            AuditEvent::Transfer { .. } => "Transfer",
            AuditEvent::Approval { .. } => "Approval",
            AuditEvent::TokensBurned { .. } => "TokensBurned",
            AuditEvent::OracleUpdated { .. } => "OracleUpdated",
            AuditEvent::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }
}

/// Destination for audit events.
///
/// Implementations must be thread-safe (`Send + Sync`); components hold a
/// shared `Arc<dyn EventSink>`.
pub trait EventSink: Send + Sync {
    /// Publish one event. Publication cannot fail the originating call.
    fn publish(&self, event: AuditEvent);
}

/// Append-only in-memory event log.
///
/// Used by tests and by the runtime to print the event stream.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event published so far, in publication order.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.read().clone()
    }

    /// Events published at or after `offset`.
    pub fn events_since(&self, offset: usize) -> Vec<AuditEvent> {
        self.events.read().iter().skip(offset).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Count of events with the given name.
    pub fn count(&self, name: &str) -> usize {
        self.events.read().iter().filter(|e| e.name() == name).count()
    }
}

impl EventSink for InMemoryEventLog {
    fn publish(&self, event: AuditEvent) {
        self.events.write().push(event);
    }
}

/// Event sink that writes one structured log line per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, event: AuditEvent) {
        match &event {
            AuditEvent::ProofRegistered {
                proof_hash, actor, ..
            } => tracing::info!(
                target: "audit",
                event = event.name(),
                proof_hash = %hash_to_hex(proof_hash),
                actor = %address_to_hex(actor),
            ),
            AuditEvent::MintRequestCompleted {
                request_id,
                actor,
                amount,
                ..
            } => tracing::info!(
                target: "audit",
                event = event.name(),
                request_id = %hash_to_hex(request_id),
                actor = %address_to_hex(actor),
                amount = %amount,
            ),
            _ => tracing::info!(target: "audit", event = event.name(), detail = ?event),
        }
    }
}
