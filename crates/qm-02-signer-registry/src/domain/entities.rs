//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::{Address, Timestamp};

/// Timelock between proposing and executing a threshold change (48 hours).
pub const DEFAULT_TIMELOCK_DELAY_SECS: u64 = 48 * 3600;

/// A verifier identity and whether it currently counts towards quorum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerRecord {
    pub identity: Address,
    pub active: bool,
}

/// A pending change of the quorum threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdChangeProposal {
    pub proposed_threshold: usize,
    pub effective_time: Timestamp,
    pub pending: bool,
}

impl ThresholdChangeProposal {
    /// Whether the timelock has elapsed at `now`.
    pub fn is_ready(&self, now: Timestamp) -> bool {
        self.pending && now >= self.effective_time
    }
}

/// Registry state in a persistable form.
///
/// Produced by `SignerRegistry::snapshot` and accepted by
/// `SignerRegistry::restore`, which re-checks every set invariant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub owner: Address,
    /// Active signers in enumeration order.
    pub signers: Vec<Address>,
    /// Identities that were registered and later removed.
    pub removed: Vec<Address>,
    pub threshold: usize,
    pub proposal: ThresholdChangeProposal,
}

/// Registry configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Delay applied to every threshold proposal.
    pub timelock_delay_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            timelock_delay_secs: DEFAULT_TIMELOCK_DELAY_SECS,
        }
    }
}
