//! Signer set state machine
//!
//! Lookup map plus an enumeration list, in the same shape as a validator
//! set: `records` answers membership in O(1), `active` enumerates.

use super::entities::{SignerRecord, ThresholdChangeProposal};
use super::errors::RegistryError;
use shared_types::{is_zero_address, Address, Timestamp};
use std::collections::HashMap;

/// Active verifiers, the quorum threshold and the pending threshold change.
///
/// Invariant: `active.len() >= threshold >= 1`.
#[derive(Clone, Debug)]
pub struct SignerSet {
    records: HashMap<Address, SignerRecord>,
    active: Vec<Address>,
    threshold: usize,
    proposal: ThresholdChangeProposal,
}

impl SignerSet {
    /// Build a set from its initial members.
    pub fn new(initial: &[Address], threshold: usize) -> Result<Self, RegistryError> {
        let mut set = Self {
            records: HashMap::with_capacity(initial.len()),
            active: Vec::with_capacity(initial.len()),
            threshold: 0,
            proposal: ThresholdChangeProposal {
                proposed_threshold: 0,
                effective_time: 0,
                pending: false,
            },
        };
        for id in initial {
            set.add(*id)?;
        }
        if threshold == 0 || threshold > set.active.len() {
            return Err(RegistryError::InvalidThreshold {
                threshold,
                signer_count: set.active.len(),
            });
        }
        set.threshold = threshold;
        Ok(set)
    }

    /// Rebuild a set from persisted parts.
    ///
    /// Applies the same checks as `new`; `removed` identities come back
    /// inactive and must not overlap the active list. The proposal is taken
    /// as is, since a stale one is a legitimate persisted state.
    pub fn from_parts(
        active: &[Address],
        removed: &[Address],
        threshold: usize,
        proposal: ThresholdChangeProposal,
    ) -> Result<Self, RegistryError> {
        let mut set = Self::new(active, threshold)?;
        for id in removed {
            if is_zero_address(id) {
                return Err(RegistryError::NullSigner);
            }
            if set.records.contains_key(id) {
                return Err(RegistryError::AlreadySigner(*id));
            }
            set.records.insert(
                *id,
                SignerRecord {
                    identity: *id,
                    active: false,
                },
            );
        }
        set.proposal = proposal;
        Ok(set)
    }

    /// Identities that were registered and later removed, in byte order.
    pub fn removed(&self) -> Vec<Address> {
        let mut removed: Vec<Address> = self
            .records
            .values()
            .filter(|r| !r.active)
            .map(|r| r.identity)
            .collect();
        removed.sort();
        removed
    }

    /// The proposal slot, pending or not.
    pub fn proposal(&self) -> ThresholdChangeProposal {
        self.proposal
    }

    pub fn is_signer(&self, id: &Address) -> bool {
        self.records.get(id).map(|r| r.active).unwrap_or(false)
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Active signers in enumeration order. Order is not stable across removals.
    pub fn signers(&self) -> &[Address] {
        &self.active
    }

    /// Record for an identity that was ever registered.
    pub fn record(&self, id: &Address) -> Option<&SignerRecord> {
        self.records.get(id)
    }

    /// The pending proposal, if any.
    pub fn pending_proposal(&self) -> Option<&ThresholdChangeProposal> {
        self.proposal.pending.then_some(&self.proposal)
    }

    pub fn add(&mut self, id: Address) -> Result<(), RegistryError> {
        if is_zero_address(&id) {
            return Err(RegistryError::NullSigner);
        }
        if self.is_signer(&id) {
            return Err(RegistryError::AlreadySigner(id));
        }
        self.records.insert(
            id,
            SignerRecord {
                identity: id,
                active: true,
            },
        );
        self.active.push(id);
        Ok(())
    }

    pub fn remove(&mut self, id: &Address) -> Result<(), RegistryError> {
        if !self.is_signer(id) {
            return Err(RegistryError::NotSigner(*id));
        }
        let remaining = self.active.len() - 1;
        if remaining < self.threshold {
            return Err(RegistryError::BelowThreshold {
                remaining,
                threshold: self.threshold,
            });
        }
        if let Some(record) = self.records.get_mut(id) {
            record.active = false;
        }
        if let Some(pos) = self.active.iter().position(|a| a == id) {
            self.active.swap_remove(pos);
        }
        Ok(())
    }

    /// Start (or overwrite) a threshold change effective at `now + delay`.
    pub fn propose(
        &mut self,
        new_threshold: usize,
        now: Timestamp,
        delay: u64,
    ) -> Result<ThresholdChangeProposal, RegistryError> {
        if new_threshold == 0 || new_threshold > self.active.len() {
            return Err(RegistryError::InvalidThreshold {
                threshold: new_threshold,
                signer_count: self.active.len(),
            });
        }
        self.proposal = ThresholdChangeProposal {
            proposed_threshold: new_threshold,
            effective_time: now.saturating_add(delay),
            pending: true,
        };
        Ok(self.proposal)
    }

    /// Commit the pending change. Returns `(old, new)`.
    ///
    /// The proposal is re-checked against the current signer count; a stale
    /// proposal is left pending so it can be overwritten.
    pub fn execute(&mut self, now: Timestamp) -> Result<(usize, usize), RegistryError> {
        if !self.proposal.pending {
            return Err(RegistryError::NoPendingProposal);
        }
        if now < self.proposal.effective_time {
            return Err(RegistryError::TimelockActive {
                effective_time: self.proposal.effective_time,
                now,
            });
        }
        let proposed = self.proposal.proposed_threshold;
        if proposed > self.active.len() {
            return Err(RegistryError::StaleThresholdProposal {
                proposed,
                signer_count: self.active.len(),
            });
        }
        let old = self.threshold;
        self.threshold = proposed;
        self.proposal.pending = false;
        Ok((old, proposed))
    }
}
