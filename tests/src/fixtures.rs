//! # Test Fixtures
//!
//! `Harness` wires a registry of freshly generated secp256k1 signers, both
//! ledgers and a coordinator over a manual clock and a shared event log.

use k256::ecdsa::SigningKey;
use qm_01_signature_recovery::{address_from_pubkey, sign_prehash};
use qm_02_signer_registry::{RegistryConfig, SignerRegistry};
use qm_03_proof_ledger::ProofLedger;
use qm_04_token_ledger::{TokenLedger, TokenLedgerApi, TokenMetadata};
use qm_05_request_coordinator::{
    message_hash, CoordinatorConfig, CoordinatorError, RequestCoordinator, RequestCoordinatorApi,
};
use shared_types::{
    Address, Amount, BatchOperation, Hash, InMemoryEventLog, InMemoryKVStore, KVStoreError,
    KeyValueStore, ManualTimeSource,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Administrative authority in every harness.
pub const OWNER: Address = [0x01; 20];

/// Identity the coordinator presents to the ledgers.
pub const IDENTITY: Address = [0x0C; 20];

/// Default claimant.
pub const ACTOR_X: Address = [0xAA; 20];

pub const H1: Hash = [0x11; 32];
pub const H2: Hash = [0x22; 32];

/// Start of the manual clock.
pub const GENESIS_TIME: u64 = 1_700_000_000;

pub fn amount(value: u64) -> Amount {
    Amount::from(value)
}

pub fn random_key() -> SigningKey {
    SigningKey::random(&mut rand::thread_rng())
}

pub fn key_address(key: &SigningKey) -> Address {
    address_from_pubkey(key.verifying_key())
}

/// 65-byte attestation of `key` over `(actor, amount, proof)`.
pub fn sign_claim(key: &SigningKey, actor: Address, value: Amount, proof: Hash) -> Vec<u8> {
    let digest = message_hash(&actor, &value, &proof);
    sign_prehash(&digest, key)
        .expect("signing never fails for a valid key")
        .to_bytes()
        .to_vec()
}

/// Store whose batch writes fail while `fail_writes` is set.
#[derive(Default)]
pub struct FaultyStore {
    inner: InMemoryKVStore,
    pub fail_writes: Arc<AtomicBool>,
}

impl KeyValueStore for FaultyStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.inner.get(key)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.inner.put(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.inner.delete(key)
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KVStoreError::IOError {
                message: "injected write failure".to_string(),
            });
        }
        self.inner.atomic_batch_write(operations)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
        self.inner.prefix_scan(prefix)
    }
}

/// A fully wired system.
pub struct Harness<P: KeyValueStore = InMemoryKVStore, T: KeyValueStore = InMemoryKVStore> {
    pub coordinator: RequestCoordinator<P, T>,
    pub keys: Vec<SigningKey>,
    pub clock: Arc<ManualTimeSource>,
    pub log: Arc<InMemoryEventLog>,
}

impl Harness {
    /// `signers` fresh keys, quorum `threshold`, in-memory stores.
    pub fn new(signers: usize, threshold: usize) -> Self {
        Self::with_stores(
            signers,
            threshold,
            InMemoryKVStore::new(),
            InMemoryKVStore::new(),
        )
    }
}

impl<P: KeyValueStore, T: KeyValueStore> Harness<P, T> {
    pub fn with_stores(signers: usize, threshold: usize, proof_store: P, token_store: T) -> Self {
        let keys: Vec<SigningKey> = (0..signers).map(|_| random_key()).collect();
        let addresses: Vec<Address> = keys.iter().map(key_address).collect();
        let clock = Arc::new(ManualTimeSource::new(GENESIS_TIME));
        let log = Arc::new(InMemoryEventLog::new());

        let registry = SignerRegistry::new(
            OWNER,
            &addresses,
            threshold,
            RegistryConfig::default(),
            clock.clone(),
            log.clone(),
        )
        .expect("valid registry");
        let proofs =
            ProofLedger::new(proof_store, OWNER, IDENTITY, log.clone()).expect("valid proof ledger");
        let tokens = TokenLedger::new(
            token_store,
            OWNER,
            IDENTITY,
            TokenMetadata::default(),
            log.clone(),
        )
        .expect("valid token ledger");
        let coordinator = RequestCoordinator::new(
            OWNER,
            registry,
            proofs,
            tokens,
            CoordinatorConfig::default(),
            clock.clone(),
            log.clone(),
        )
        .expect("valid coordinator");

        Self {
            coordinator,
            keys,
            clock,
            log,
        }
    }

    pub fn address(&self, signer: usize) -> Address {
        key_address(&self.keys[signer])
    }

    /// Attestations from the signers at `indices`, in that order.
    pub fn signatures(
        &self,
        indices: &[usize],
        actor: Address,
        value: u64,
        proof: Hash,
    ) -> Vec<Vec<u8>> {
        indices
            .iter()
            .map(|&i| sign_claim(&self.keys[i], actor, amount(value), proof))
            .collect()
    }

    /// Submit a claim signed by the signers at `indices`.
    pub fn submit(
        &mut self,
        indices: &[usize],
        actor: Address,
        value: u64,
        proof: Hash,
    ) -> Result<Hash, CoordinatorError> {
        let signatures = self.signatures(indices, actor, value, proof);
        self.coordinator
            .verify_and_mint(OWNER, actor, amount(value), proof, &signatures)
    }

    pub fn balance(&self, account: &Address) -> Amount {
        self.coordinator
            .token_ledger()
            .balance_of(account)
            .expect("readable balance")
    }

    pub fn total_supply(&self) -> Amount {
        self.coordinator
            .token_ledger()
            .total_supply()
            .expect("readable supply")
    }

    /// `total_supply == Σ balances`.
    pub fn supply_matches_balances(&self) -> bool {
        let sum = self
            .coordinator
            .token_ledger()
            .balances()
            .expect("readable balances")
            .into_iter()
            .fold(Amount::zero(), |acc, (_, balance)| acc + balance);
        sum == self.total_supply()
    }
}
