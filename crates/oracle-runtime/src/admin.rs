//! # Registry Administration
//!
//! Signer rotation and threshold governance against the persisted registry.
//! Each command runs as the configured owner and the registry is written back
//! only when the command succeeds.

use crate::config::OracleConfig;
use crate::state::GovernanceStore;
use crate::wiring::open_registry;
use anyhow::{Context, Result};
use qm_02_signer_registry::{SignerRegistry, SignerRegistryApi};
use serde::Serialize;
use shared_types::{address_to_hex, Address, EventSink, KeyValueStore, TimeSource, Timestamp};
use std::sync::Arc;
use tracing::info;

/// A registry change requested from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    AddSigner(Address),
    RemoveSigner(Address),
    ProposeThreshold(usize),
    ExecuteThreshold,
}

/// Registry state as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryStatus {
    pub owner: String,
    pub signers: Vec<String>,
    pub threshold: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_threshold: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_time: Option<Timestamp>,
}

impl RegistryStatus {
    pub fn of(registry: &SignerRegistry) -> Self {
        let pending = registry.pending_threshold_change();
        Self {
            owner: address_to_hex(&registry.owner()),
            signers: registry.signers().iter().map(address_to_hex).collect(),
            threshold: registry.threshold(),
            pending_threshold: pending.map(|p| p.proposed_threshold),
            effective_time: pending.map(|p| p.effective_time),
        }
    }
}

/// Open the registry, apply `command` if given, persist, and report the
/// resulting state.
pub fn run_admin<G: KeyValueStore>(
    config: &OracleConfig,
    state: &mut GovernanceStore<G>,
    clock: Arc<dyn TimeSource>,
    events: Arc<dyn EventSink>,
    command: Option<AdminCommand>,
) -> Result<RegistryStatus> {
    let ids = config.validate().context("invalid configuration")?;
    let mut registry = open_registry(config, &ids, state, clock, events)?;

    if let Some(command) = command {
        apply(&mut registry, ids.owner, command)?;
        state
            .save_registry(&registry.snapshot())
            .context("failed to persist signer registry")?;
        info!(?command, "Registry change persisted");
    }
    Ok(RegistryStatus::of(&registry))
}

fn apply(registry: &mut SignerRegistry, caller: Address, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::AddSigner(id) => registry
            .add_signer(caller, id)
            .with_context(|| format!("cannot add signer {}", address_to_hex(&id))),
        AdminCommand::RemoveSigner(id) => registry
            .remove_signer(caller, id)
            .with_context(|| format!("cannot remove signer {}", address_to_hex(&id))),
        AdminCommand::ProposeThreshold(threshold) => registry
            .propose_threshold_update(caller, threshold)
            .map(|_| ())
            .with_context(|| format!("cannot propose threshold {}", threshold)),
        AdminCommand::ExecuteThreshold => registry
            .execute_threshold_update(caller)
            .map(|_| ())
            .context("cannot execute threshold update"),
    }
}
