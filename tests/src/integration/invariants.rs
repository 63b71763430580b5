//! # Ledger Invariants
//!
//! Supply accounting, single use of every commitment, all-or-nothing
//! commits across both stores and the shape of the audit stream.

#[cfg(test)]
mod tests {
    use crate::fixtures::{amount, FaultyStore, Harness, ACTOR_X, H1, H2, IDENTITY, OWNER};
    use qm_03_proof_ledger::{ProofLedgerApi, ProofLedgerError};
    use qm_04_token_ledger::{TokenError, TokenLedgerApi};
    use qm_05_request_coordinator::{CoordinatorError, RequestCoordinatorApi};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use shared_types::{Address, AuditEvent, Hash, InMemoryKVStore};
    use std::sync::atomic::Ordering;

    fn commitment(i: u64) -> Hash {
        let mut h = [0u8; 32];
        h[24..].copy_from_slice(&(i + 1).to_be_bytes());
        h
    }

    #[test]
    fn test_supply_equals_sum_of_balances_under_random_operations() {
        let mut h = Harness::new(3, 2);
        let accounts: [Address; 4] = [[0xA0; 20], [0xA1; 20], [0xA2; 20], [0xA3; 20]];
        let mut rng = StdRng::seed_from_u64(7);

        for step in 0..200u64 {
            let from = accounts[rng.gen_range(0..accounts.len())];
            let to = accounts[rng.gen_range(0..accounts.len())];
            let value = rng.gen_range(0..50u64);
            match rng.gen_range(0..4) {
                0 => {
                    let _ = h.submit(&[0, 1], to, value, commitment(step));
                }
                1 => {
                    let _ = h.coordinator.token_ledger_mut().burn(from, amount(value));
                }
                2 => {
                    let _ = h
                        .coordinator
                        .token_ledger_mut()
                        .transfer(from, to, amount(value));
                }
                _ => {
                    let ledger = h.coordinator.token_ledger_mut();
                    let _ = ledger.approve(from, to, amount(value));
                    let _ = ledger.transfer_from(to, from, to, amount(value / 2));
                }
            }
            assert!(h.supply_matches_balances(), "diverged at step {}", step);
        }
    }

    #[test]
    fn test_each_commitment_mints_at_most_once() {
        let mut h = Harness::new(3, 2);
        let mut successes = 0;
        for signers in [[0, 1], [1, 2], [0, 2], [2, 0]] {
            if h.submit(&signers, ACTOR_X, 25, H1).is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(h.balance(&ACTOR_X), amount(25));
        assert_eq!(h.coordinator.proof_ledger().proof_count().unwrap(), 1);
        assert_eq!(h.log.count("TokensMinted"), 1);
    }

    #[test]
    fn test_direct_registration_blocks_coordinator_mint() {
        let mut h = Harness::new(3, 2);
        h.coordinator
            .proof_ledger_mut()
            .register_proof(IDENTITY, H2, ACTOR_X, "manual", 1)
            .unwrap();
        assert_eq!(
            h.submit(&[0, 1], ACTOR_X, 10, H2),
            Err(CoordinatorError::ProofAlreadyRegistered(H2))
        );
        assert_eq!(h.total_supply(), amount(0));
    }

    #[test]
    fn test_writes_prepared_before_a_mint_are_rejected_after_it() {
        let mut h = Harness::new(3, 2);
        let intruder: Address = [0xEE; 20];
        let stale_mint = h
            .coordinator
            .token_ledger()
            .prepare_mint(IDENTITY, intruder, amount(1_000_000), H1)
            .unwrap();
        let stale_registration = h
            .coordinator
            .proof_ledger()
            .prepare_registration(IDENTITY, H1, intruder, "forged", 1)
            .unwrap();

        h.submit(&[0, 1], ACTOR_X, 100, H1).unwrap();

        assert_eq!(
            h.coordinator.token_ledger_mut().commit_mint(stale_mint),
            Err(TokenError::ProofAlreadyUsed(H1))
        );
        assert_eq!(
            h.coordinator
                .proof_ledger_mut()
                .commit_registration(stale_registration),
            Err(ProofLedgerError::ProofAlreadyRegistered(H1))
        );

        assert_eq!(h.balance(&intruder), amount(0));
        assert_eq!(h.total_supply(), amount(100));
        assert!(h.supply_matches_balances());
        let record = h.coordinator.proof_ledger().get_proof(&H1).unwrap().unwrap();
        assert_eq!(record.actor, ACTOR_X);
        assert!(h.coordinator.token_ledger().is_proof_used(&H1).unwrap());
    }

    #[test]
    fn test_failed_mint_leaves_both_stores_untouched() {
        let token_store = FaultyStore::default();
        let fail = token_store.fail_writes.clone();
        let mut h = Harness::with_stores(3, 2, InMemoryKVStore::new(), token_store);
        let events_before = h.log.len();

        fail.store(true, Ordering::SeqCst);
        let err = h.submit(&[0, 1], ACTOR_X, 100, H1).unwrap_err();
        assert!(matches!(err, CoordinatorError::TokenLedger(_)));

        assert!(!h.coordinator.proof_ledger().is_registered(&H1).unwrap());
        assert!(!h.coordinator.token_ledger().is_proof_used(&H1).unwrap());
        assert_eq!(h.coordinator.nonce(), 0);
        assert_eq!(h.coordinator.executed_count(), 0);
        assert_eq!(h.log.len(), events_before);

        fail.store(false, Ordering::SeqCst);
        h.submit(&[0, 1], ACTOR_X, 100, H1).unwrap();
        assert_eq!(h.balance(&ACTOR_X), amount(100));
    }

    #[test]
    fn test_request_ids_are_unique_per_call() {
        let mut h = Harness::new(3, 2);
        let first = h.submit(&[0, 1], ACTOR_X, 1, H1).unwrap();
        let second = h.submit(&[0, 1], ACTOR_X, 1, H2).unwrap();
        assert_ne!(first, second);
        assert!(h.coordinator.is_request_executed(&first));
        assert!(h.coordinator.is_request_executed(&second));
        assert_eq!(h.coordinator.nonce(), 2);
    }

    #[test]
    fn test_completion_event_shape() {
        let mut h = Harness::new(3, 2);
        let before = h.log.len();
        let request_id = h.submit(&[0, 1], ACTOR_X, 100, H1).unwrap();

        let events = h.log.events_since(before);
        assert_eq!(
            events.last(),
            Some(&AuditEvent::MintRequestCompleted {
                request_id,
                actor: ACTOR_X,
                amount: amount(100),
                proof_hash: H1,
            })
        );

        let json = serde_json::to_value(events.last().unwrap()).unwrap();
        let keys: Vec<&str> = json
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        for key in ["event", "request_id", "actor", "amount", "proof_hash"] {
            assert!(keys.contains(&key), "missing {}", key);
        }
    }

    #[test]
    fn test_oracle_rotation_locks_out_coordinator() {
        let mut h = Harness::new(3, 2);
        h.coordinator
            .token_ledger_mut()
            .update_oracle(OWNER, [0x0D; 20])
            .unwrap();
        assert!(matches!(
            h.submit(&[0, 1], ACTOR_X, 5, H1),
            Err(CoordinatorError::TokenLedger(_))
        ));
        assert!(!h.coordinator.proof_ledger().is_registered(&H1).unwrap());
    }
}
