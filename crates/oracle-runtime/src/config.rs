//! # Runtime Configuration
//!
//! Loaded from a JSON file, then overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `QM_TIMELOCK_SECS` | `timelock_secs` |
//! | `QM_DATA_DIR` | `data_dir` |
//! | `QM_ACTION_TYPE` | `action_type` |
//!
//! Identities are 0x-prefixed hex strings in the file and are parsed during
//! validation.

use qm_02_signer_registry::DEFAULT_TIMELOCK_DELAY_SECS;
use qm_04_token_ledger::TokenMetadata;
use qm_05_request_coordinator::DEFAULT_ACTION_TYPE;
use serde::{Deserialize, Serialize};
use shared_types::{is_zero_address, parse_address, Address};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const ENV_TIMELOCK_SECS: &str = "QM_TIMELOCK_SECS";
pub const ENV_DATA_DIR: &str = "QM_DATA_DIR";
pub const ENV_ACTION_TYPE: &str = "QM_ACTION_TYPE";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid address in `{field}`: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("Threshold {threshold} must be between 1 and the signer count {signer_count}")]
    InvalidThreshold { threshold: usize, signer_count: usize },

    #[error("Action type must not be empty")]
    EmptyActionType,

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Administrative authority of the registry, ledgers and coordinator.
    pub owner: String,
    /// Identity the coordinator presents to the ledgers.
    pub oracle_identity: String,
    /// Initial verifier set.
    pub signers: Vec<String>,
    pub threshold: usize,
    pub timelock_secs: u64,
    /// Label recorded on coordinator-registered proofs.
    pub action_type: String,
    /// Root of the persistent stores. In-memory when unset.
    pub data_dir: Option<PathBuf>,
    pub token: TokenMetadata,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            oracle_identity: String::new(),
            signers: Vec::new(),
            threshold: 1,
            timelock_secs: DEFAULT_TIMELOCK_DELAY_SECS,
            action_type: DEFAULT_ACTION_TYPE.to_string(),
            data_dir: None,
            token: TokenMetadata::default(),
        }
    }
}

/// Identities parsed out of an `OracleConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentities {
    pub owner: Address,
    pub oracle_identity: Address,
    pub signers: Vec<Address>,
}

impl OracleConfig {
    /// Read a JSON config file and apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: OracleConfig = serde_json::from_str(&raw)?;
        config.apply_env_overrides(|var| std::env::var(var).ok())?;
        info!(path = %path.display(), signers = config.signers.len(), "Loaded configuration");
        Ok(config)
    }

    /// Apply overrides from `lookup` (the process environment in production).
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_TIMELOCK_SECS) {
            self.timelock_secs = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_TIMELOCK_SECS,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup(ENV_ACTION_TYPE) {
            self.action_type = value;
        }
        Ok(())
    }

    /// Check the configuration and parse its identities.
    pub fn validate(&self) -> Result<ResolvedIdentities, ConfigError> {
        let owner = parse_identity("owner", &self.owner)?;
        let oracle_identity = parse_identity("oracle_identity", &self.oracle_identity)?;
        let signers = self
            .signers
            .iter()
            .map(|s| parse_identity("signers", s))
            .collect::<Result<Vec<_>, _>>()?;

        if self.threshold == 0 || self.threshold > signers.len() {
            return Err(ConfigError::InvalidThreshold {
                threshold: self.threshold,
                signer_count: signers.len(),
            });
        }
        if self.action_type.is_empty() {
            return Err(ConfigError::EmptyActionType);
        }
        Ok(ResolvedIdentities {
            owner,
            oracle_identity,
            signers,
        })
    }
}

fn parse_identity(field: &'static str, value: &str) -> Result<Address, ConfigError> {
    match parse_address(value) {
        Some(address) if !is_zero_address(&address) => Ok(address),
        _ => Err(ConfigError::InvalidAddress {
            field,
            value: value.to_string(),
        }),
    }
}
