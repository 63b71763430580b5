//! # Inbound Ports
//!
//! Entry points of the credit ledger. `mint` is the proof-gated core
//! operation; the transfer family is the conventional fungible-token surface.

use crate::domain::TokenError;
use shared_types::{Address, Amount, Hash};

/// Token ledger API.
pub trait TokenLedgerApi {
    /// Create `amount` credits for `to` against an unused proof commitment.
    ///
    /// Only the oracle identity may call this.
    fn mint(
        &mut self,
        caller: Address,
        to: Address,
        amount: Amount,
        commitment: Hash,
    ) -> Result<(), TokenError>;

    /// Destroy `amount` of the caller's credits. No proof is involved.
    fn burn(&mut self, caller: Address, amount: Amount) -> Result<(), TokenError>;

    fn transfer(&mut self, caller: Address, to: Address, amount: Amount)
        -> Result<(), TokenError>;

    /// Set the allowance of `spender` over the caller's credits.
    fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), TokenError>;

    /// Move credits from `from` to `to`, spending the caller's allowance.
    fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), TokenError>;

    fn total_supply(&self) -> Result<Amount, TokenError>;

    fn balance_of(&self, account: &Address) -> Result<Amount, TokenError>;

    fn allowance(&self, owner: &Address, spender: &Address) -> Result<Amount, TokenError>;

    fn is_proof_used(&self, commitment: &Hash) -> Result<bool, TokenError>;
}
