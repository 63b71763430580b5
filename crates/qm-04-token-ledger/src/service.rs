//! # Token Ledger Service
//!
//! Every mutation reads the affected balances, computes the new values with
//! checked arithmetic and writes them together with the supply in a single
//! `atomic_batch_write`, so `total_supply == Σ balances` holds between calls.

use crate::domain::keys::{
    allowance_key, balance_key, used_proof_key, BALANCE_PREFIX, TOTAL_SUPPLY_KEY, USED_MARKER,
};
use crate::domain::{MintReceipt, PreparedMint, TokenError, TokenMetadata};
use crate::ports::TokenLedgerApi;
use shared_types::{
    address_to_hex, amount_from_be_bytes, amount_to_be_bytes, hash_to_hex, is_zero_address,
    is_zero_hash, Address, Amount, AuditEvent, BatchOperation, EventSink, Hash, KVStoreError,
    KeyValueStore, ZERO_ADDRESS,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fungible credit ledger over a `KeyValueStore`.
pub struct TokenLedger<S: KeyValueStore> {
    store: S,
    owner: Address,
    oracle: Address,
    metadata: TokenMetadata,
    events: Arc<dyn EventSink>,
}

impl<S: KeyValueStore> TokenLedger<S> {
    pub fn new(
        store: S,
        owner: Address,
        oracle: Address,
        metadata: TokenMetadata,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, TokenError> {
        if is_zero_address(&owner) || is_zero_address(&oracle) {
            return Err(TokenError::NullAddress);
        }
        Ok(Self {
            store,
            owner,
            oracle,
            metadata,
            events,
        })
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Identity allowed to mint.
    pub fn oracle(&self) -> Address {
        self.oracle
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every account with a stored balance.
    pub fn balances(&self) -> Result<Vec<(Address, Amount)>, TokenError> {
        self.store
            .prefix_scan(BALANCE_PREFIX)?
            .into_iter()
            .map(|(key, value)| {
                let account: Address = key[BALANCE_PREFIX.len()..].try_into().map_err(|_| {
                    KVStoreError::CorruptionError {
                        message: "balance key is not 20 bytes".to_string(),
                    }
                })?;
                Ok((account, decode_amount(&value)?))
            })
            .collect()
    }

    /// Validate a mint without writing it.
    pub fn prepare_mint(
        &self,
        caller: Address,
        to: Address,
        amount: Amount,
        commitment: Hash,
    ) -> Result<PreparedMint, TokenError> {
        self.mint_batch(caller, to, amount, commitment)?;
        Ok(PreparedMint {
            caller,
            to,
            amount,
            commitment,
        })
    }

    /// Write a prepared mint.
    ///
    /// Validation runs again and the new balance and supply are computed from
    /// the current state, so a mint prepared before other writes neither
    /// reuses a commitment nor overwrites a newer balance. Events are carried
    /// by the receipt, not published.
    pub fn commit_mint(&mut self, prepared: PreparedMint) -> Result<MintReceipt, TokenError> {
        let PreparedMint {
            caller,
            to,
            amount,
            commitment,
        } = prepared;
        let operations = self.mint_batch(caller, to, amount, commitment)?;
        self.store.atomic_batch_write(operations)?;
        Ok(MintReceipt {
            to,
            amount,
            commitment,
        })
    }

    /// Change the identity allowed to mint. Owner only, no timelock.
    pub fn update_oracle(&mut self, caller: Address, new_oracle: Address) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        if is_zero_address(&new_oracle) {
            return Err(TokenError::NullAddress);
        }
        let old_oracle = std::mem::replace(&mut self.oracle, new_oracle);
        info!(
            old_oracle = %address_to_hex(&old_oracle),
            new_oracle = %address_to_hex(&new_oracle),
            "Token ledger oracle updated"
        );
        self.events.publish(AuditEvent::OracleUpdated {
            old_oracle,
            new_oracle,
        });
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        if is_zero_address(&new_owner) {
            return Err(TokenError::NullAddress);
        }
        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        self.events.publish(AuditEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    fn ensure_owner(&self, caller: Address) -> Result<(), TokenError> {
        if caller != self.owner {
            warn!(caller = %address_to_hex(&caller), "Rejected token ledger admin call");
            return Err(TokenError::Unauthorized { caller });
        }
        Ok(())
    }

    /// Checks a mint and returns its writes against the current state.
    fn mint_batch(
        &self,
        caller: Address,
        to: Address,
        amount: Amount,
        commitment: Hash,
    ) -> Result<Vec<BatchOperation>, TokenError> {
        if caller != self.oracle {
            return Err(TokenError::Unauthorized { caller });
        }
        if is_zero_address(&to) {
            return Err(TokenError::NullAddress);
        }
        if is_zero_hash(&commitment) {
            return Err(TokenError::ZeroProofHash);
        }
        if self.is_proof_used(&commitment)? {
            return Err(TokenError::ProofAlreadyUsed(commitment));
        }

        let supply = self
            .total_supply()?
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let balance = self
            .balance_of(&to)?
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        Ok(vec![
            BatchOperation::put(used_proof_key(&commitment), USED_MARKER),
            BatchOperation::put(balance_key(&to), amount_to_be_bytes(&balance).to_vec()),
            BatchOperation::put(TOTAL_SUPPLY_KEY, amount_to_be_bytes(&supply).to_vec()),
        ])
    }

    fn read_amount(&self, key: &[u8]) -> Result<Amount, TokenError> {
        match self.store.get(key)? {
            Some(bytes) => Ok(decode_amount(&bytes)?),
            None => Ok(Amount::zero()),
        }
    }

    /// Balance writes for moving `amount` from `from` to `to`.
    ///
    /// A self-transfer only checks the balance and writes nothing.
    fn stage_move(
        &self,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<Vec<BatchOperation>, TokenError> {
        let from_balance = self.balance_of(from)?;
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance {
                balance: from_balance,
                needed: amount,
            });
        }
        if from == to {
            return Ok(Vec::new());
        }
        let to_balance = self
            .balance_of(to)?
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        Ok(vec![
            BatchOperation::put(
                balance_key(from),
                amount_to_be_bytes(&(from_balance - amount)).to_vec(),
            ),
            BatchOperation::put(balance_key(to), amount_to_be_bytes(&to_balance).to_vec()),
        ])
    }

    fn commit(
        &mut self,
        operations: Vec<BatchOperation>,
        events: Vec<AuditEvent>,
    ) -> Result<(), TokenError> {
        if !operations.is_empty() {
            self.store.atomic_batch_write(operations)?;
        }
        for event in events {
            self.events.publish(event);
        }
        Ok(())
    }
}

impl<S: KeyValueStore> TokenLedgerApi for TokenLedger<S> {
    fn mint(
        &mut self,
        caller: Address,
        to: Address,
        amount: Amount,
        commitment: Hash,
    ) -> Result<(), TokenError> {
        let prepared = self
            .prepare_mint(caller, to, amount, commitment)
            .inspect_err(|e| {
                warn!(proof_hash = %hash_to_hex(&commitment), error = %e, "Mint rejected");
            })?;
        let receipt = self.commit_mint(prepared)?;
        for event in receipt.into_events() {
            self.events.publish(event);
        }
        info!(
            to = %address_to_hex(&to),
            %amount,
            proof_hash = %hash_to_hex(&commitment),
            "Tokens minted"
        );
        Ok(())
    }

    fn burn(&mut self, caller: Address, amount: Amount) -> Result<(), TokenError> {
        let balance = self.balance_of(&caller)?;
        if balance < amount {
            warn!(account = %address_to_hex(&caller), %balance, %amount, "Burn rejected");
            return Err(TokenError::InsufficientBalance {
                balance,
                needed: amount,
            });
        }
        let supply = self.total_supply()?.checked_sub(amount).ok_or_else(|| {
            KVStoreError::CorruptionError {
                message: "total supply below account balance".to_string(),
            }
        })?;

        self.commit(
            vec![
                BatchOperation::put(
                    balance_key(&caller),
                    amount_to_be_bytes(&(balance - amount)).to_vec(),
                ),
                BatchOperation::put(TOTAL_SUPPLY_KEY, amount_to_be_bytes(&supply).to_vec()),
            ],
            vec![
                AuditEvent::Transfer {
                    from: caller,
                    to: ZERO_ADDRESS,
                    value: amount,
                },
                AuditEvent::TokensBurned {
                    from: caller,
                    amount,
                },
            ],
        )?;
        info!(account = %address_to_hex(&caller), %amount, "Tokens burned");
        Ok(())
    }

    fn transfer(&mut self, caller: Address, to: Address, amount: Amount) -> Result<(), TokenError> {
        if is_zero_address(&to) {
            return Err(TokenError::NullAddress);
        }
        let operations = self.stage_move(&caller, &to, amount)?;
        self.commit(
            operations,
            vec![AuditEvent::Transfer {
                from: caller,
                to,
                value: amount,
            }],
        )?;
        debug!(from = %address_to_hex(&caller), to = %address_to_hex(&to), %amount, "Transfer");
        Ok(())
    }

    fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        if is_zero_address(&spender) {
            return Err(TokenError::NullAddress);
        }
        self.commit(
            vec![BatchOperation::put(
                allowance_key(&caller, &spender),
                amount_to_be_bytes(&amount).to_vec(),
            )],
            vec![AuditEvent::Approval {
                owner: caller,
                spender,
                value: amount,
            }],
        )
    }

    fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        if is_zero_address(&from) || is_zero_address(&to) {
            return Err(TokenError::NullAddress);
        }
        let allowance = self.allowance(&from, &caller)?;
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                allowance,
                needed: amount,
            });
        }
        let mut operations = self.stage_move(&from, &to, amount)?;
        // A maximal allowance is never decremented.
        if allowance != Amount::MAX {
            operations.push(BatchOperation::put(
                allowance_key(&from, &caller),
                amount_to_be_bytes(&(allowance - amount)).to_vec(),
            ));
        }
        self.commit(
            operations,
            vec![AuditEvent::Transfer {
                from,
                to,
                value: amount,
            }],
        )
    }

    fn total_supply(&self) -> Result<Amount, TokenError> {
        self.read_amount(TOTAL_SUPPLY_KEY)
    }

    fn balance_of(&self, account: &Address) -> Result<Amount, TokenError> {
        self.read_amount(&balance_key(account))
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Result<Amount, TokenError> {
        self.read_amount(&allowance_key(owner, spender))
    }

    fn is_proof_used(&self, commitment: &Hash) -> Result<bool, TokenError> {
        Ok(self.store.exists(&used_proof_key(commitment))?)
    }
}

fn decode_amount(bytes: &[u8]) -> Result<Amount, KVStoreError> {
    if bytes.len() != 32 {
        return Err(KVStoreError::CorruptionError {
            message: format!("amount is {} bytes, expected 32", bytes.len()),
        });
    }
    Ok(amount_from_be_bytes(bytes))
}
