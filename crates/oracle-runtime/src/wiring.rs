//! # Component Wiring
//!
//! Builds the registry, both ledgers and the coordinator from a validated
//! configuration, and drives mint requests through the coordinator.
//!
//! The signer registry and the request bookkeeping come from the
//! `GovernanceStore`. The configuration seeds the registry only on the first
//! run; afterwards signer and threshold changes go through the registry
//! operations and their timelock.

use crate::config::{OracleConfig, ResolvedIdentities};
use crate::requests::{MintRequest, RequestOutcome};
use crate::state::GovernanceStore;
use anyhow::{Context, Result};
use qm_02_signer_registry::{RegistryConfig, SignerRegistry};
use qm_03_proof_ledger::ProofLedger;
use qm_04_token_ledger::TokenLedger;
use qm_05_request_coordinator::{CoordinatorConfig, RequestCoordinator, RequestCoordinatorApi};
use shared_types::{hash_to_hex, Address, EventSink, KeyValueStore, TimeSource};
use std::sync::Arc;
use tracing::{info, warn};

/// Load the persisted registry, or seed it from `config` on first run.
pub fn open_registry<G: KeyValueStore>(
    config: &OracleConfig,
    ids: &ResolvedIdentities,
    state: &mut GovernanceStore<G>,
    clock: Arc<dyn TimeSource>,
    events: Arc<dyn EventSink>,
) -> Result<SignerRegistry> {
    let registry_config = RegistryConfig {
        timelock_delay_secs: config.timelock_secs,
    };

    if let Some(snapshot) = state.load_registry()? {
        let mut configured = ids.signers.clone();
        let mut persisted = snapshot.signers.clone();
        configured.sort();
        persisted.sort();
        if configured != persisted || config.threshold != snapshot.threshold {
            warn!(
                persisted_signers = persisted.len(),
                persisted_threshold = snapshot.threshold,
                "Configured signers differ from the persisted registry; using persisted state"
            );
        }
        return SignerRegistry::restore(snapshot, registry_config, clock, events)
            .context("persisted signer registry is invalid");
    }

    let registry = SignerRegistry::new(
        ids.owner,
        &ids.signers,
        config.threshold,
        registry_config,
        clock,
        events,
    )
    .context("failed to build signer registry")?;
    state
        .save_registry(&registry.snapshot())
        .context("failed to persist seeded registry")?;
    info!("Signer registry seeded from configuration");
    Ok(registry)
}

/// Construct a coordinator over the given stores.
///
/// Every component shares `clock` and `events`.
pub fn build_coordinator<P: KeyValueStore, T: KeyValueStore, G: KeyValueStore>(
    config: &OracleConfig,
    state: &mut GovernanceStore<G>,
    proof_store: P,
    token_store: T,
    clock: Arc<dyn TimeSource>,
    events: Arc<dyn EventSink>,
) -> Result<RequestCoordinator<P, T>> {
    let ids = config.validate().context("invalid configuration")?;
    let registry = open_registry(config, &ids, state, clock.clone(), events.clone())?;
    let signers = registry.signers().len();

    let proofs = ProofLedger::new(proof_store, ids.owner, ids.oracle_identity, events.clone())
        .context("failed to open proof ledger")?;
    let tokens = TokenLedger::new(
        token_store,
        ids.owner,
        ids.oracle_identity,
        config.token.clone(),
        events.clone(),
    )
    .context("failed to open token ledger")?;

    let bookkeeping = state
        .load_bookkeeping()
        .context("failed to load request bookkeeping")?;
    let coordinator = RequestCoordinator::new(
        ids.owner,
        registry,
        proofs,
        tokens,
        CoordinatorConfig {
            action_type: config.action_type.clone(),
        },
        clock,
        events,
    )
    .context("failed to build request coordinator")?
    .with_bookkeeping(bookkeeping.nonce, bookkeeping.executed);

    info!(
        signers,
        nonce = coordinator.nonce(),
        "Oracle runtime wired"
    );
    Ok(coordinator)
}

/// Decode and submit one request on behalf of `caller`.
///
/// A rejected request is an outcome, not an error. The error path is a
/// completed mint whose bookkeeping could not be persisted.
pub fn process_request<P: KeyValueStore, T: KeyValueStore, G: KeyValueStore>(
    coordinator: &mut RequestCoordinator<P, T>,
    state: &mut GovernanceStore<G>,
    caller: Address,
    index: usize,
    request: &MintRequest,
) -> Result<RequestOutcome> {
    let decoded = match request.decode() {
        Ok(decoded) => decoded,
        Err(e) => return Ok(RequestOutcome::rejected(index, "validation", e)),
    };
    match coordinator.verify_and_mint(
        caller,
        decoded.actor,
        decoded.amount,
        decoded.proof,
        &decoded.signatures,
    ) {
        Ok(request_id) => {
            state
                .record_execution(coordinator.nonce(), &request_id)
                .with_context(|| {
                    format!("failed to persist execution of {}", hash_to_hex(&request_id))
                })?;
            Ok(RequestOutcome::completed(index, hash_to_hex(&request_id)))
        }
        Err(e) => Ok(RequestOutcome::rejected(index, e.kind(), e)),
    }
}
