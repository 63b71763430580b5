//! # End-to-End Scenarios
//!
//! Signer set {A, B, C} with threshold 2 throughout.

#[cfg(test)]
mod tests {
    use crate::fixtures::{amount, key_address, random_key, sign_claim, Harness, ACTOR_X, H1, OWNER};
    use qm_03_proof_ledger::ProofLedgerApi;
    use qm_04_token_ledger::{TokenError, TokenLedgerApi};
    use qm_05_request_coordinator::{CoordinatorError, RequestCoordinatorApi};
    use shared_types::TimeSource;

    const A: usize = 0;
    const B: usize = 1;
    const C: usize = 2;

    #[test]
    fn test_quorum_of_two_mints_and_registers() {
        let mut h = Harness::new(3, 2);

        let request_id = h.submit(&[A, B], ACTOR_X, 100, H1).unwrap();

        assert_eq!(h.balance(&ACTOR_X), amount(100));
        assert!(h.coordinator.token_ledger().is_proof_used(&H1).unwrap());
        assert!(h.coordinator.proof_ledger().is_registered(&H1).unwrap());
        assert!(h.coordinator.is_request_executed(&request_id));

        let record = h.coordinator.proof_ledger().get_proof(&H1).unwrap().unwrap();
        assert_eq!(record.actor, ACTOR_X);
        assert_eq!(record.timestamp, h.clock.now());
    }

    #[test]
    fn test_repeat_with_same_proof_fails() {
        let mut h = Harness::new(3, 2);
        h.submit(&[A, B], ACTOR_X, 100, H1).unwrap();

        // Fresh, valid signatures from a different pair.
        assert_eq!(
            h.submit(&[B, C], ACTOR_X, 100, H1),
            Err(CoordinatorError::ProofAlreadyRegistered(H1))
        );
        assert_eq!(h.balance(&ACTOR_X), amount(100));
        assert_eq!(h.total_supply(), amount(100));
    }

    #[test]
    fn test_single_valid_signature_is_insufficient() {
        let mut h = Harness::new(3, 2);
        let events_before = h.log.len();

        let mut signatures = h.signatures(&[A], ACTOR_X, 100, H1);
        signatures.push(sign_claim(&random_key(), ACTOR_X, amount(100), H1));

        assert_eq!(
            h.coordinator
                .verify_and_mint(OWNER, ACTOR_X, amount(100), H1, &signatures),
            Err(CoordinatorError::InsufficientVotes { have: 1, need: 2 })
        );
        assert_eq!(h.balance(&ACTOR_X), amount(0));
        assert!(!h.coordinator.proof_ledger().is_registered(&H1).unwrap());
        assert!(!h.coordinator.token_ledger().is_proof_used(&H1).unwrap());
        assert_eq!(h.coordinator.nonce(), 0);
        assert_eq!(h.log.len(), events_before);
    }

    #[test]
    fn test_single_signature_bundle_rejected_up_front() {
        let mut h = Harness::new(3, 2);
        assert_eq!(
            h.submit(&[A], ACTOR_X, 100, H1),
            Err(CoordinatorError::InsufficientSignatures {
                provided: 1,
                threshold: 2
            })
        );
    }

    #[test]
    fn test_burn_after_mint() {
        let mut h = Harness::new(3, 2);
        h.submit(&[A, B], ACTOR_X, 100, H1).unwrap();
        let supply_before = h.total_supply();

        h.coordinator
            .token_ledger_mut()
            .burn(ACTOR_X, amount(30))
            .unwrap();

        assert_eq!(h.balance(&ACTOR_X), amount(70));
        assert_eq!(h.total_supply(), supply_before - amount(30));
        assert!(h.supply_matches_balances());
    }

    #[test]
    fn test_burn_more_than_balance_fails() {
        let mut h = Harness::new(3, 2);
        h.submit(&[A, B], ACTOR_X, 100, H1).unwrap();
        assert!(matches!(
            h.coordinator.token_ledger_mut().burn(ACTOR_X, amount(101)),
            Err(TokenError::InsufficientBalance { .. })
        ));
        assert_eq!(h.balance(&ACTOR_X), amount(100));
    }

    #[test]
    fn test_only_owner_may_submit() {
        let mut h = Harness::new(3, 2);
        let signatures = h.signatures(&[A, B], ACTOR_X, 100, H1);
        let stranger = key_address(&random_key());
        assert_eq!(
            h.coordinator
                .verify_and_mint(stranger, ACTOR_X, amount(100), H1, &signatures),
            Err(CoordinatorError::Unauthorized { caller: stranger })
        );
    }
}
