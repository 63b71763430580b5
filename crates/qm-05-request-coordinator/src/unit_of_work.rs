//! # Mint Unit of Work
//!
//! The proof store and the token store are independent `KeyValueStore`s, so
//! neither can include the other's writes in its atomic batch. The unit of
//! work prepares both sides first (all validation, no writes), then commits
//! the registration, then the mint. If the mint fails the registration is
//! rolled back through its receipt. Events are returned to the caller rather
//! than published, so a rolled-back unit leaves no trace in the audit stream.

use crate::domain::CoordinatorError;
use qm_03_proof_ledger::{PreparedRegistration, ProofLedger};
use qm_04_token_ledger::{PreparedMint, TokenLedger};
use shared_types::{hash_to_hex, Address, Amount, AuditEvent, Hash, KeyValueStore, Timestamp};
use tracing::{debug, error};

/// Prepared proof registration and mint for one request.
#[derive(Debug, Clone)]
pub struct MintUnitOfWork {
    proof_commitment: Hash,
    registration: PreparedRegistration,
    mint: PreparedMint,
}

impl MintUnitOfWork {
    /// Validate both writes against the current ledger state.
    ///
    /// `identity` is the coordinator's own identity, which both ledgers must
    /// accept as their oracle.
    #[allow(clippy::too_many_arguments)]
    pub fn stage<P: KeyValueStore, T: KeyValueStore>(
        proofs: &ProofLedger<P>,
        tokens: &TokenLedger<T>,
        identity: Address,
        actor: Address,
        amount: Amount,
        proof_commitment: Hash,
        action_type: &str,
        now: Timestamp,
    ) -> Result<Self, CoordinatorError> {
        let registration =
            proofs.prepare_registration(identity, proof_commitment, actor, action_type, now)?;
        let mint = tokens.prepare_mint(identity, actor, amount, proof_commitment)?;
        Ok(Self {
            proof_commitment,
            registration,
            mint,
        })
    }

    /// Commit both sides. On success returns the ledger events in commit
    /// order (proof registration first, then mint).
    pub fn commit<P: KeyValueStore, T: KeyValueStore>(
        self,
        proofs: &mut ProofLedger<P>,
        tokens: &mut TokenLedger<T>,
    ) -> Result<Vec<AuditEvent>, CoordinatorError> {
        let registration = proofs.commit_registration(self.registration)?;
        debug!(proof_hash = %hash_to_hex(&self.proof_commitment), "Proof registration committed");

        let mint = match tokens.commit_mint(self.mint) {
            Ok(mint) => mint,
            Err(commit) => {
                return match proofs.rollback_registration(registration) {
                    Ok(()) => {
                        debug!(
                            proof_hash = %hash_to_hex(&self.proof_commitment),
                            "Mint failed, proof registration rolled back"
                        );
                        Err(commit.into())
                    }
                    Err(rollback) => {
                        error!(
                            proof_hash = %hash_to_hex(&self.proof_commitment),
                            commit_error = %commit,
                            rollback_error = %rollback,
                            "Proof registration could not be rolled back; stores may have diverged"
                        );
                        Err(CoordinatorError::RollbackFailed { commit, rollback })
                    }
                };
            }
        };

        let mut events = registration.into_events();
        events.extend(mint.into_events());
        Ok(events)
    }
}
