//! # Signer Rotation and Threshold Timelock
//!
//! Registry changes made through the coordinator's registry take effect on
//! the very next `verify_and_mint`.

#[cfg(test)]
mod tests {
    use crate::fixtures::{amount, key_address, random_key, Harness, ACTOR_X, H1, H2, OWNER};
    use qm_02_signer_registry::{RegistryError, SignerRegistryApi, DEFAULT_TIMELOCK_DELAY_SECS};
    use qm_05_request_coordinator::CoordinatorError;
    use shared_types::TimeSource;

    #[test]
    fn test_timelock_window() {
        let mut h = Harness::new(3, 2);
        let proposed_at = h.clock.now();
        h.coordinator
            .registry_mut()
            .propose_threshold_update(OWNER, 3)
            .unwrap();

        h.clock.set(proposed_at + DEFAULT_TIMELOCK_DELAY_SECS - 1);
        assert!(matches!(
            h.coordinator.registry_mut().execute_threshold_update(OWNER),
            Err(RegistryError::TimelockActive { .. })
        ));
        assert_eq!(h.coordinator.registry().threshold(), 2);

        h.clock.set(proposed_at + DEFAULT_TIMELOCK_DELAY_SECS);
        assert_eq!(
            h.coordinator.registry_mut().execute_threshold_update(OWNER),
            Ok(3)
        );
        assert_eq!(
            h.coordinator.registry_mut().execute_threshold_update(OWNER),
            Err(RegistryError::NoPendingProposal)
        );
        assert_eq!(h.log.count("ThresholdUpdated"), 1);
    }

    #[test]
    fn test_raised_threshold_applies_to_next_request() {
        let mut h = Harness::new(3, 2);
        h.coordinator
            .registry_mut()
            .propose_threshold_update(OWNER, 3)
            .unwrap();

        // Still the old threshold during the window.
        h.submit(&[0, 1], ACTOR_X, 10, H1).unwrap();

        h.clock.advance(DEFAULT_TIMELOCK_DELAY_SECS);
        h.coordinator
            .registry_mut()
            .execute_threshold_update(OWNER)
            .unwrap();
        assert_eq!(
            h.submit(&[0, 1], ACTOR_X, 10, H2),
            Err(CoordinatorError::InsufficientSignatures {
                provided: 2,
                threshold: 3
            })
        );
        h.submit(&[0, 1, 2], ACTOR_X, 10, H2).unwrap();
        assert_eq!(h.balance(&ACTOR_X), amount(20));
    }

    #[test]
    fn test_removal_floor() {
        let mut h = Harness::new(3, 2);
        let (a, b, c) = (h.address(0), h.address(1), h.address(2));
        let registry = h.coordinator.registry_mut();

        registry.remove_signer(OWNER, c).unwrap();
        assert_eq!(
            registry.remove_signer(OWNER, b),
            Err(RegistryError::BelowThreshold {
                remaining: 1,
                threshold: 2
            })
        );
        assert!(registry.is_signer(&a));
        assert!(registry.is_signer(&b));
        assert_eq!(registry.signer_count(), 2);
    }

    #[test]
    fn test_removed_signer_loses_vote_and_added_signer_gains_one() {
        let mut h = Harness::new(3, 2);
        let removed = h.address(2);
        h.coordinator
            .registry_mut()
            .remove_signer(OWNER, removed)
            .unwrap();
        assert_eq!(
            h.submit(&[0, 2], ACTOR_X, 1, H1),
            Err(CoordinatorError::InsufficientVotes { have: 1, need: 2 })
        );

        let newcomer = random_key();
        h.coordinator
            .registry_mut()
            .add_signer(OWNER, key_address(&newcomer))
            .unwrap();
        h.keys.push(newcomer);
        h.submit(&[0, 3], ACTOR_X, 1, H1).unwrap();
    }

    #[test]
    fn test_stale_proposal_is_not_executed() {
        let mut h = Harness::new(3, 1);
        let c = h.address(2);
        h.coordinator
            .registry_mut()
            .propose_threshold_update(OWNER, 3)
            .unwrap();
        h.coordinator.registry_mut().remove_signer(OWNER, c).unwrap();

        h.clock.advance(DEFAULT_TIMELOCK_DELAY_SECS);
        assert_eq!(
            h.coordinator.registry_mut().execute_threshold_update(OWNER),
            Err(RegistryError::StaleThresholdProposal {
                proposed: 3,
                signer_count: 2
            })
        );
        assert_eq!(h.coordinator.registry().threshold(), 1);
    }

    #[test]
    fn test_registry_administration_is_owner_only() {
        let mut h = Harness::new(3, 2);
        let signer = h.address(0);
        assert_eq!(
            h.coordinator
                .registry_mut()
                .add_signer(signer, key_address(&random_key())),
            Err(RegistryError::Unauthorized { caller: signer })
        );
        assert!(h
            .coordinator
            .registry_mut()
            .propose_threshold_update(signer, 1)
            .is_err());
    }
}
