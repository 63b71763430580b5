//! # Quorum Counting
//!
//! Distinct voters only, order independence and signature validation.

#[cfg(test)]
mod tests {
    use crate::fixtures::{amount, random_key, sign_claim, Harness, ACTOR_X, H1, H2, OWNER};
    use qm_01_signature_recovery::SignatureError;
    use qm_05_request_coordinator::{CoordinatorError, RequestCoordinatorApi};
    use shared_types::AuditEvent;

    #[test]
    fn test_same_signer_twice_is_one_vote() {
        let mut h = Harness::new(3, 2);
        assert_eq!(
            h.submit(&[0, 0], ACTOR_X, 100, H1),
            Err(CoordinatorError::InsufficientVotes { have: 1, need: 2 })
        );
        assert_eq!(
            h.submit(&[1, 1, 1], ACTOR_X, 100, H1),
            Err(CoordinatorError::InsufficientVotes { have: 1, need: 2 })
        );
        h.submit(&[1, 1, 2], ACTOR_X, 100, H1).unwrap();
    }

    #[test]
    fn test_signature_order_does_not_change_outcome() {
        let orders: [&[usize]; 3] = [&[0, 1, 2], &[2, 1, 0], &[1, 2, 0]];
        for order in orders {
            let mut h = Harness::new(3, 3);
            h.submit(order, ACTOR_X, 10, H1).unwrap();
            assert_eq!(h.balance(&ACTOR_X), amount(10));
        }
    }

    #[test]
    fn test_malformed_signature_fails_in_any_position() {
        let out_of_range = {
            let mut bytes = vec![0u8; 65];
            bytes[0] = 1;
            bytes[32..64].copy_from_slice(&[0xFF; 32]);
            bytes[64] = 27;
            bytes
        };
        for position in 0..3 {
            let mut h = Harness::new(3, 2);
            let mut signatures = h.signatures(&[0, 1], ACTOR_X, 100, H1);
            signatures.insert(position, out_of_range.clone());

            let err = h
                .coordinator
                .verify_and_mint(OWNER, ACTOR_X, amount(100), H1, &signatures)
                .unwrap_err();
            assert!(matches!(
                err,
                CoordinatorError::MalformedSignature { index, .. } if index == position
            ));
            assert_eq!(h.balance(&ACTOR_X), amount(0));
        }
    }

    #[test]
    fn test_bad_recovery_id_is_malformed() {
        let mut h = Harness::new(2, 1);
        let mut signature = h.signatures(&[0], ACTOR_X, 5, H1).remove(0);
        signature[64] = 30;
        assert_eq!(
            h.coordinator
                .verify_and_mint(OWNER, ACTOR_X, amount(5), H1, &[signature]),
            Err(CoordinatorError::MalformedSignature {
                index: 0,
                source: SignatureError::InvalidRecoveryId(30)
            })
        );
    }

    #[test]
    fn test_signature_over_other_claim_is_not_a_vote() {
        let mut h = Harness::new(3, 2);
        let signatures = vec![
            sign_claim(&h.keys[0], ACTOR_X, amount(100), H1),
            // Same signer set, but signed for a different commitment.
            sign_claim(&h.keys[1], ACTOR_X, amount(100), H2),
        ];
        assert_eq!(
            h.coordinator
                .verify_and_mint(OWNER, ACTOR_X, amount(100), H1, &signatures),
            Err(CoordinatorError::InsufficientVotes { have: 1, need: 2 })
        );
    }

    #[test]
    fn test_outsiders_cannot_reach_quorum() {
        let mut h = Harness::new(3, 2);
        let outsiders = [random_key(), random_key(), random_key()];
        let signatures: Vec<Vec<u8>> = outsiders
            .iter()
            .map(|k| sign_claim(k, ACTOR_X, amount(100), H1))
            .collect();
        assert_eq!(
            h.coordinator
                .verify_and_mint(OWNER, ACTOR_X, amount(100), H1, &signatures),
            Err(CoordinatorError::InsufficientVotes { have: 0, need: 2 })
        );
    }

    #[test]
    fn test_votes_stop_at_threshold() {
        let mut h = Harness::new(5, 3);
        let before = h.log.len();
        let request_id = h.submit(&[4, 3, 2, 1, 0], ACTOR_X, 1, H1).unwrap();

        let voters: Vec<_> = h
            .log
            .events_since(before)
            .into_iter()
            .filter_map(|e| match e {
                AuditEvent::VoteAccepted { request_id: id, signer } => {
                    assert_eq!(id, request_id);
                    Some(signer)
                }
                _ => None,
            })
            .collect();
        assert_eq!(voters, vec![h.address(4), h.address(3), h.address(2)]);
    }
}
