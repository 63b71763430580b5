//! # Inbound Ports (Driving Ports / API)

use crate::domain::{RegistryError, ThresholdChangeProposal};
use shared_types::Address;

/// Signer registry API.
///
/// Mutating operations take the calling identity and are restricted to the
/// registry owner.
pub trait SignerRegistryApi {
    /// Activate a verifier.
    fn add_signer(&mut self, caller: Address, id: Address) -> Result<(), RegistryError>;

    /// Deactivate a verifier. Fails if the active set would drop below the
    /// current threshold.
    fn remove_signer(&mut self, caller: Address, id: Address) -> Result<(), RegistryError>;

    /// Start the timelock for a new threshold, replacing any pending one.
    fn propose_threshold_update(
        &mut self,
        caller: Address,
        new_threshold: usize,
    ) -> Result<ThresholdChangeProposal, RegistryError>;

    /// Commit the pending threshold once its timelock has elapsed.
    fn execute_threshold_update(&mut self, caller: Address) -> Result<usize, RegistryError>;

    fn is_signer(&self, id: &Address) -> bool;

    fn threshold(&self) -> usize;

    fn signer_count(&self) -> usize;
}
