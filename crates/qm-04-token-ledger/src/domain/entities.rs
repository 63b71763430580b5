//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, AuditEvent, Hash, ZERO_ADDRESS};

/// Display metadata for the credit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self {
            name: "Quorum Mint Credit".to_string(),
            symbol: "QMC".to_string(),
            decimals: 18,
        }
    }
}

/// A mint that passed validation and has not been written yet.
///
/// Built only by `TokenLedger::prepare_mint`. Committing it re-validates and
/// recomputes the balance and supply from the ledger's current state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedMint {
    pub(crate) caller: Address,
    pub(crate) to: Address,
    pub(crate) amount: Amount,
    pub(crate) commitment: Hash,
}

impl PreparedMint {
    pub fn to(&self) -> Address {
        self.to
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn commitment(&self) -> Hash {
        self.commitment
    }
}

/// A mint written by `TokenLedger::commit_mint`, with its unpublished events.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "the mint events must be published"]
pub struct MintReceipt {
    pub(crate) to: Address,
    pub(crate) amount: Amount,
    pub(crate) commitment: Hash,
}

impl MintReceipt {
    /// `Transfer` from the zero address, then `TokensMinted`.
    pub fn into_events(self) -> Vec<AuditEvent> {
        vec![
            AuditEvent::Transfer {
                from: ZERO_ADDRESS,
                to: self.to,
                value: self.amount,
            },
            AuditEvent::TokensMinted {
                to: self.to,
                amount: self.amount,
                proof_hash: self.commitment,
            },
        ]
    }
}
