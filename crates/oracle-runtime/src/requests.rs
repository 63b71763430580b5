//! # Mint Request Files
//!
//! A request file is a JSON array of claims. Identities, commitments and
//! signatures are hex; the amount is a decimal string or `0x` hex.

use serde::{Deserialize, Serialize};
use shared_types::{parse_address, parse_hash, Address, Amount, Hash};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Invalid actor: {0}")]
    InvalidActor(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid proof commitment: {0}")]
    InvalidProof(String),

    #[error("Signature {index} is not hex: {value}")]
    InvalidSignatureHex { index: usize, value: String },
}

/// One claim as it appears in a request file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    pub actor: String,
    pub amount: String,
    pub proof: String,
    #[serde(default)]
    pub signatures: Vec<String>,
}

/// A claim with its fields decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRequest {
    pub actor: Address,
    pub amount: Amount,
    pub proof: Hash,
    pub signatures: Vec<Vec<u8>>,
}

impl MintRequest {
    pub fn decode(&self) -> Result<DecodedRequest, RequestError> {
        let actor =
            parse_address(&self.actor).ok_or_else(|| RequestError::InvalidActor(self.actor.clone()))?;
        let amount = parse_amount(&self.amount)?;
        let proof =
            parse_hash(&self.proof).ok_or_else(|| RequestError::InvalidProof(self.proof.clone()))?;
        let signatures = self
            .signatures
            .iter()
            .enumerate()
            .map(|(index, sig)| {
                hex::decode(sig.trim_start_matches("0x")).map_err(|_| {
                    RequestError::InvalidSignatureHex {
                        index,
                        value: sig.clone(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DecodedRequest {
            actor,
            amount,
            proof,
            signatures,
        })
    }
}

/// Parse a decimal or `0x`-prefixed hex amount.
pub fn parse_amount(input: &str) -> Result<Amount, RequestError> {
    let parsed = match input.strip_prefix("0x") {
        Some(hex_digits) => Amount::from_str_radix(hex_digits, 16).ok(),
        None => Amount::from_dec_str(input).ok(),
    };
    parsed.ok_or_else(|| RequestError::InvalidAmount(input.to_string()))
}

/// Result line printed for each processed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestOutcome {
    pub index: usize,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RequestOutcome {
    pub fn completed(index: usize, request_id: String) -> Self {
        Self {
            index,
            status: "completed",
            request_id: Some(request_id),
            error_kind: None,
            error: None,
        }
    }

    pub fn rejected(index: usize, kind: impl ToString, error: impl ToString) -> Self {
        Self {
            index,
            status: "rejected",
            request_id: None,
            error_kind: Some(kind.to_string()),
            error: Some(error.to_string()),
        }
    }
}
