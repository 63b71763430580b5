//! Coordinator configuration.

use serde::{Deserialize, Serialize};

/// Action-type label recorded for proofs registered by the coordinator.
pub const DEFAULT_ACTION_TYPE: &str = "oracle-verified";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Label stored in every `ProofRecord` this coordinator writes.
    pub action_type: String,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            action_type: DEFAULT_ACTION_TYPE.to_string(),
        }
    }
}
