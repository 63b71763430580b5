//! # Signer Registry Service
//!
//! Wraps the `SignerSet` state machine with the owner check, the clock used
//! for the timelock and the audit event stream.

use crate::domain::{
    RegistryConfig, RegistryError, RegistrySnapshot, SignerSet, ThresholdChangeProposal,
};
use crate::ports::SignerRegistryApi;
use shared_types::{
    address_to_hex, is_zero_address, Address, AuditEvent, EventSink, TimeSource,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Owner-administered verifier registry.
pub struct SignerRegistry {
    owner: Address,
    signers: SignerSet,
    config: RegistryConfig,
    clock: Arc<dyn TimeSource>,
    events: Arc<dyn EventSink>,
}

impl SignerRegistry {
    /// Create a registry with its initial verifier set.
    ///
    /// Fails if `owner` is null, an initial signer is null or duplicated, or
    /// `threshold` is outside `[1, initial_signers.len()]`.
    pub fn new(
        owner: Address,
        initial_signers: &[Address],
        threshold: usize,
        config: RegistryConfig,
        clock: Arc<dyn TimeSource>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, RegistryError> {
        if is_zero_address(&owner) {
            return Err(RegistryError::NullOwner);
        }
        let signers = SignerSet::new(initial_signers, threshold)?;
        for signer in signers.signers() {
            events.publish(AuditEvent::SignerAdded { signer: *signer });
        }
        info!(
            signers = signers.len(),
            threshold, "Signer registry initialized"
        );
        Ok(Self {
            owner,
            signers,
            config,
            clock,
            events,
        })
    }

    /// Rebuild a registry from a snapshot taken by `snapshot`.
    ///
    /// No events are published; the restored state was audited when it was
    /// first reached.
    pub fn restore(
        snapshot: RegistrySnapshot,
        config: RegistryConfig,
        clock: Arc<dyn TimeSource>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, RegistryError> {
        if is_zero_address(&snapshot.owner) {
            return Err(RegistryError::NullOwner);
        }
        let signers = SignerSet::from_parts(
            &snapshot.signers,
            &snapshot.removed,
            snapshot.threshold,
            snapshot.proposal,
        )?;
        info!(
            signers = signers.len(),
            threshold = signers.threshold(),
            pending = signers.pending_proposal().is_some(),
            "Signer registry restored"
        );
        Ok(Self {
            owner: snapshot.owner,
            signers,
            config,
            clock,
            events,
        })
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            owner: self.owner,
            signers: self.signers.signers().to_vec(),
            removed: self.signers.removed(),
            threshold: self.signers.threshold(),
            proposal: self.signers.proposal(),
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Active signers in enumeration order.
    pub fn signers(&self) -> &[Address] {
        self.signers.signers()
    }

    pub fn pending_threshold_change(&self) -> Option<ThresholdChangeProposal> {
        self.signers.pending_proposal().copied()
    }

    /// Hand the registry to a new administrative authority.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), RegistryError> {
        self.ensure_owner(caller)?;
        if is_zero_address(&new_owner) {
            return Err(RegistryError::NullOwner);
        }
        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        info!(new_owner = %address_to_hex(&new_owner), "Registry ownership transferred");
        self.events.publish(AuditEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    fn ensure_owner(&self, caller: Address) -> Result<(), RegistryError> {
        if caller != self.owner {
            warn!(caller = %address_to_hex(&caller), "Rejected registry call from non-owner");
            return Err(RegistryError::Unauthorized { caller });
        }
        Ok(())
    }
}

impl SignerRegistryApi for SignerRegistry {
    fn add_signer(&mut self, caller: Address, id: Address) -> Result<(), RegistryError> {
        self.ensure_owner(caller)?;
        self.signers.add(id)?;
        info!(signer = %address_to_hex(&id), count = self.signers.len(), "Signer added");
        self.events.publish(AuditEvent::SignerAdded { signer: id });
        Ok(())
    }

    fn remove_signer(&mut self, caller: Address, id: Address) -> Result<(), RegistryError> {
        self.ensure_owner(caller)?;
        self.signers.remove(&id).inspect_err(|e| {
            warn!(signer = %address_to_hex(&id), error = %e, "Signer removal rejected");
        })?;
        info!(signer = %address_to_hex(&id), count = self.signers.len(), "Signer removed");
        self.events.publish(AuditEvent::SignerRemoved { signer: id });
        Ok(())
    }

    fn propose_threshold_update(
        &mut self,
        caller: Address,
        new_threshold: usize,
    ) -> Result<ThresholdChangeProposal, RegistryError> {
        self.ensure_owner(caller)?;
        let old_threshold = self.signers.threshold();
        let proposal = self.signers.propose(
            new_threshold,
            self.clock.now(),
            self.config.timelock_delay_secs,
        )?;
        info!(
            old_threshold,
            new_threshold,
            effective_time = proposal.effective_time,
            "Threshold update proposed"
        );
        self.events.publish(AuditEvent::ThresholdUpdateProposed {
            old_threshold,
            new_threshold,
            effective_time: proposal.effective_time,
        });
        Ok(proposal)
    }

    fn execute_threshold_update(&mut self, caller: Address) -> Result<usize, RegistryError> {
        self.ensure_owner(caller)?;
        let (old_threshold, new_threshold) =
            self.signers.execute(self.clock.now()).inspect_err(|e| {
                warn!(error = %e, "Threshold update not executed");
            })?;
        info!(old_threshold, new_threshold, "Threshold updated");
        self.events.publish(AuditEvent::ThresholdUpdated {
            old_threshold,
            new_threshold,
        });
        Ok(new_threshold)
    }

    fn is_signer(&self, id: &Address) -> bool {
        self.signers.is_signer(id)
    }

    fn threshold(&self) -> usize {
        self.signers.threshold()
    }

    fn signer_count(&self) -> usize {
        self.signers.len()
    }
}
