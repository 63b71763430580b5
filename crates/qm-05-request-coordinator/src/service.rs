//! # Request Coordinator Service

use crate::domain::{message_hash, request_id, CoordinatorConfig, CoordinatorError, VoteTally};
use crate::ports::RequestCoordinatorApi;
use crate::unit_of_work::MintUnitOfWork;
use qm_01_signature_recovery::{EcdsaRecoverer, EcdsaSignature, SignatureRecoveryApi};
use qm_02_signer_registry::{SignerRegistry, SignerRegistryApi};
use qm_03_proof_ledger::{ProofLedger, ProofLedgerApi};
use qm_04_token_ledger::{TokenLedger, TokenLedgerApi};
use shared_types::{
    address_to_hex, hash_to_hex, is_zero_address, is_zero_hash, Address, Amount, AuditEvent,
    EventSink, Hash, KeyValueStore, TimeSource,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Orchestrates quorum verification and the proof-and-mint unit of work.
///
/// The coordinator acts on both ledgers as their oracle identity; that
/// identity is taken from the ledgers at construction and must agree.
pub struct RequestCoordinator<P: KeyValueStore, T: KeyValueStore> {
    owner: Address,
    identity: Address,
    registry: SignerRegistry,
    proofs: ProofLedger<P>,
    tokens: TokenLedger<T>,
    recoverer: Arc<dyn SignatureRecoveryApi>,
    config: CoordinatorConfig,
    clock: Arc<dyn TimeSource>,
    events: Arc<dyn EventSink>,
    nonce: u64,
    executed: HashSet<Hash>,
}

impl<P: KeyValueStore, T: KeyValueStore> RequestCoordinator<P, T> {
    pub fn new(
        owner: Address,
        registry: SignerRegistry,
        proofs: ProofLedger<P>,
        tokens: TokenLedger<T>,
        config: CoordinatorConfig,
        clock: Arc<dyn TimeSource>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, CoordinatorError> {
        if is_zero_address(&owner) {
            return Err(CoordinatorError::NullAddress);
        }
        let identity = proofs.oracle();
        if tokens.oracle() != identity {
            return Err(CoordinatorError::OracleMismatch { identity });
        }
        info!(
            identity = %address_to_hex(&identity),
            threshold = registry.threshold(),
            action_type = %config.action_type,
            "Request coordinator initialized"
        );
        Ok(Self {
            owner,
            identity,
            registry,
            proofs,
            tokens,
            recoverer: Arc::new(EcdsaRecoverer::new()),
            config,
            clock,
            events,
            nonce: 0,
            executed: HashSet::new(),
        })
    }

    /// Replace the signature recovery backend.
    pub fn with_recoverer(mut self, recoverer: Arc<dyn SignatureRecoveryApi>) -> Self {
        self.recoverer = recoverer;
        self
    }

    /// Resume request bookkeeping persisted by an earlier run.
    pub fn with_bookkeeping(mut self, nonce: u64, executed: impl IntoIterator<Item = Hash>) -> Self {
        self.nonce = nonce;
        self.executed.extend(executed);
        debug!(nonce, executed = self.executed.len(), "Request bookkeeping restored");
        self
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Identity the coordinator presents to both ledgers.
    pub fn identity(&self) -> Address {
        self.identity
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &SignerRegistry {
        &self.registry
    }

    /// Registry administration. The registry enforces its own owner.
    pub fn registry_mut(&mut self) -> &mut SignerRegistry {
        &mut self.registry
    }

    pub fn proof_ledger(&self) -> &ProofLedger<P> {
        &self.proofs
    }

    pub fn proof_ledger_mut(&mut self) -> &mut ProofLedger<P> {
        &mut self.proofs
    }

    pub fn token_ledger(&self) -> &TokenLedger<T> {
        &self.tokens
    }

    /// Burn, transfer and approve go straight to the token ledger.
    pub fn token_ledger_mut(&mut self) -> &mut TokenLedger<T> {
        &mut self.tokens
    }

    /// Number of request ids recorded as executed.
    pub fn executed_count(&self) -> usize {
        self.executed.len()
    }

    /// Executed request ids, in no particular order.
    pub fn executed_requests(&self) -> impl Iterator<Item = &Hash> + '_ {
        self.executed.iter()
    }

    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), CoordinatorError> {
        self.ensure_owner(caller)?;
        if is_zero_address(&new_owner) {
            return Err(CoordinatorError::NullAddress);
        }
        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        info!(new_owner = %address_to_hex(&new_owner), "Coordinator ownership transferred");
        self.events.publish(AuditEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    fn ensure_owner(&self, caller: Address) -> Result<(), CoordinatorError> {
        if caller != self.owner {
            return Err(CoordinatorError::Unauthorized { caller });
        }
        Ok(())
    }

    /// Decode every signature before any recovery, so a malformed entry
    /// fails the call regardless of its position.
    fn decode_all(&self, signatures: &[Vec<u8>]) -> Result<Vec<EcdsaSignature>, CoordinatorError> {
        signatures
            .iter()
            .enumerate()
            .map(|(index, bytes)| {
                self.recoverer
                    .decode(bytes)
                    .map_err(|source| CoordinatorError::MalformedSignature { index, source })
            })
            .collect()
    }

    fn count_votes(&self, digest: &Hash, signatures: &[EcdsaSignature]) -> VoteTally {
        let mut tally = VoteTally::new(self.registry.threshold());
        for (index, signature) in signatures.iter().enumerate() {
            if tally.is_met() {
                break;
            }
            match self.recoverer.recover_signer(digest, signature) {
                Ok(signer) if !self.registry.is_signer(&signer) => {
                    debug!(index, signer = %address_to_hex(&signer), "Recovered identity is not an active signer");
                }
                Ok(signer) => {
                    if tally.record(signer) {
                        debug!(index, signer = %address_to_hex(&signer), votes = tally.count(), "Vote accepted");
                    } else {
                        debug!(index, signer = %address_to_hex(&signer), "Duplicate vote ignored");
                    }
                }
                Err(e) => {
                    debug!(index, error = %e, "Signature did not recover; no vote");
                }
            }
        }
        tally
    }

    /// Consult both dedup stores. A commitment known to only one of them is
    /// a consistency fault.
    fn check_unused(&self, proof_commitment: &Hash) -> Result<(), CoordinatorError> {
        let registered = self.proofs.is_registered(proof_commitment)?;
        let used = self.tokens.is_proof_used(proof_commitment)?;
        if registered != used {
            error!(
                proof_hash = %hash_to_hex(proof_commitment),
                registered,
                used,
                "Proof ledger and token ledger disagree on commitment"
            );
        }
        if registered {
            return Err(CoordinatorError::ProofAlreadyRegistered(*proof_commitment));
        }
        if used {
            return Err(CoordinatorError::ProofAlreadyUsed(*proof_commitment));
        }
        Ok(())
    }

    fn try_verify_and_mint(
        &mut self,
        caller: Address,
        actor: Address,
        amount: Amount,
        proof_commitment: Hash,
        signatures: &[Vec<u8>],
    ) -> Result<Hash, CoordinatorError> {
        self.ensure_owner(caller)?;
        if is_zero_address(&actor) {
            return Err(CoordinatorError::NullActor);
        }
        if is_zero_hash(&proof_commitment) {
            return Err(CoordinatorError::ZeroProofHash);
        }
        let threshold = self.registry.threshold();
        if signatures.len() < threshold {
            return Err(CoordinatorError::InsufficientSignatures {
                provided: signatures.len(),
                threshold,
            });
        }

        let now = self.clock.now();
        let digest = message_hash(&actor, &amount, &proof_commitment);
        let request_id = request_id(&actor, &amount, &proof_commitment, self.nonce, now);
        if self.executed.contains(&request_id) {
            return Err(CoordinatorError::RequestAlreadyExecuted(request_id));
        }

        let decoded = self.decode_all(signatures)?;
        let tally = self.count_votes(&digest, &decoded);
        if !tally.is_met() {
            return Err(CoordinatorError::InsufficientVotes {
                have: tally.count(),
                need: threshold,
            });
        }

        self.check_unused(&proof_commitment)?;

        let unit = MintUnitOfWork::stage(
            &self.proofs,
            &self.tokens,
            self.identity,
            actor,
            amount,
            proof_commitment,
            &self.config.action_type,
            now,
        )?;
        let ledger_events = unit.commit(&mut self.proofs, &mut self.tokens)?;

        self.nonce += 1;
        self.executed.insert(request_id);

        for signer in tally.voters() {
            self.events.publish(AuditEvent::VoteAccepted {
                request_id,
                signer: *signer,
            });
        }
        for event in ledger_events {
            self.events.publish(event);
        }
        self.events.publish(AuditEvent::MintRequestCompleted {
            request_id,
            actor,
            amount,
            proof_hash: proof_commitment,
        });

        info!(
            request_id = %hash_to_hex(&request_id),
            actor = %address_to_hex(&actor),
            %amount,
            proof_hash = %hash_to_hex(&proof_commitment),
            votes = tally.count(),
            "Mint request completed"
        );
        Ok(request_id)
    }
}

impl<P: KeyValueStore, T: KeyValueStore> RequestCoordinatorApi for RequestCoordinator<P, T> {
    fn verify_and_mint(
        &mut self,
        caller: Address,
        actor: Address,
        amount: Amount,
        proof_commitment: Hash,
        signatures: &[Vec<u8>],
    ) -> Result<Hash, CoordinatorError> {
        self.try_verify_and_mint(caller, actor, amount, proof_commitment, signatures)
            .inspect_err(|e| {
                warn!(
                    kind = %e.kind(),
                    error = %e,
                    proof_hash = %hash_to_hex(&proof_commitment),
                    "Mint request rejected"
                );
            })
    }

    fn is_request_executed(&self, request_id: &Hash) -> bool {
        self.executed.contains(request_id)
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }
}
