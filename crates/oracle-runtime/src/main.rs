//! # Quorum-Mint Oracle Runtime
//!
//! ```text
//! oracle-runtime process --config oracle.json --requests batch.json
//! oracle-runtime status --config oracle.json
//! oracle-runtime add-signer --config oracle.json --id <addr>
//! oracle-runtime remove-signer --config oracle.json --id <addr>
//! oracle-runtime propose-threshold --config oracle.json --threshold 3
//! oracle-runtime execute-threshold --config oracle.json
//! oracle-runtime sign --key <hex> --actor <addr> --amount 100 --proof <hash>
//! oracle-runtime address --key <hex>
//! ```
//!
//! `process` prints every audit event and one outcome per request as JSON
//! lines on stdout and forwards the events to the `audit` log target. The
//! registry commands act as the configured owner against the governance store
//! under `data_dir` and print the resulting registry state. Logs go to stderr
//! (`RUST_LOG`, default `info`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use oracle_runtime::admin::{run_admin, AdminCommand};
use oracle_runtime::requests::parse_amount;
use oracle_runtime::signing::{sign_claim, signer_address, signing_key_from_hex};
use oracle_runtime::state::GovernanceStore;
use oracle_runtime::storage::InMemoryKVStore;
use oracle_runtime::{build_coordinator, process_request, MintRequest, OracleConfig};
use shared_types::{
    address_to_hex, parse_address, parse_hash, EventSink, InMemoryEventLog, KeyValueStore,
    SystemTimeSource, TracingEventSink,
};

/// Quorum-gated proof registration and minting.
#[derive(Parser, Debug)]
#[command(name = "oracle-runtime")]
#[command(about = "Quorum-verified proof registration and credit minting")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a batch of mint requests through the coordinator
    Process {
        /// JSON configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// JSON array of mint requests
        #[arg(short, long)]
        requests: PathBuf,
    },

    /// Print the persisted signer registry
    Status {
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Add a verifier to the registry
    AddSigner {
        #[arg(short, long)]
        config: PathBuf,

        /// Verifier address (20-byte hex)
        #[arg(long)]
        id: String,
    },

    /// Remove a verifier from the registry
    RemoveSigner {
        #[arg(short, long)]
        config: PathBuf,

        /// Verifier address (20-byte hex)
        #[arg(long)]
        id: String,
    },

    /// Propose a new threshold, effective after the timelock
    ProposeThreshold {
        #[arg(short, long)]
        config: PathBuf,

        #[arg(long)]
        threshold: usize,
    },

    /// Apply the pending threshold once its timelock has elapsed
    ExecuteThreshold {
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Sign a claim as a verifier
    Sign {
        /// secp256k1 private key (hex)
        #[arg(short, long)]
        key: String,

        #[arg(long)]
        actor: String,

        /// Decimal or 0x-prefixed hex
        #[arg(long)]
        amount: String,

        /// Proof commitment (32-byte hex)
        #[arg(long)]
        proof: String,
    },

    /// Print the signer address of a private key
    Address {
        /// secp256k1 private key (hex)
        #[arg(short, long)]
        key: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_requests(path: &Path) -> Result<Vec<MintRequest>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read requests from {}", path.display()))?;
    serde_json::from_str(&raw).context("failed to parse request file")
}

fn run_batch<P: KeyValueStore, T: KeyValueStore, G: KeyValueStore>(
    config: &OracleConfig,
    state: &mut GovernanceStore<G>,
    proof_store: P,
    token_store: T,
    requests: &[MintRequest],
) -> Result<()> {
    let log = Arc::new(InMemoryEventLog::new());
    let audit = TracingEventSink;
    let mut coordinator = build_coordinator(
        config,
        state,
        proof_store,
        token_store,
        Arc::new(SystemTimeSource),
        log.clone(),
    )?;
    let caller = coordinator.owner();

    let emit = |offset: usize| -> Result<()> {
        for event in log.events_since(offset) {
            println!("{}", serde_json::to_string(&event)?);
            audit.publish(event);
        }
        Ok(())
    };

    emit(0)?;
    let mut completed = 0usize;
    for (index, request) in requests.iter().enumerate() {
        let offset = log.len();
        let outcome = process_request(&mut coordinator, state, caller, index, request)?;
        emit(offset)?;
        if outcome.status == "completed" {
            completed += 1;
        }
        println!("{}", serde_json::to_string(&outcome)?);
    }

    info!(
        total = requests.len(),
        completed,
        rejected = requests.len() - completed,
        "Batch processed"
    );
    Ok(())
}

#[cfg(feature = "rocksdb")]
fn open_governance(
    data_dir: &Path,
) -> Result<GovernanceStore<oracle_runtime::storage::RocksDbStore>> {
    use oracle_runtime::storage::{RocksDbStore, GOVERNANCE_STORE_DIR};

    let store = RocksDbStore::open_default(data_dir.join(GOVERNANCE_STORE_DIR))
        .context("failed to open governance store")?;
    Ok(GovernanceStore::new(store))
}

#[cfg(feature = "rocksdb")]
fn run_persistent(config: &OracleConfig, data_dir: &Path, requests: &[MintRequest]) -> Result<()> {
    use oracle_runtime::storage::{RocksDbStore, PROOF_STORE_DIR, TOKEN_STORE_DIR};

    let mut state = open_governance(data_dir)?;
    let proofs = RocksDbStore::open_default(data_dir.join(PROOF_STORE_DIR))
        .context("failed to open proof store")?;
    let tokens = RocksDbStore::open_default(data_dir.join(TOKEN_STORE_DIR))
        .context("failed to open token store")?;
    info!(data_dir = %data_dir.display(), "Using RocksDB stores");
    run_batch(config, &mut state, proofs, tokens, requests)
}

#[cfg(feature = "rocksdb")]
fn admin_persistent(
    config: &OracleConfig,
    data_dir: &Path,
    command: Option<AdminCommand>,
) -> Result<()> {
    let mut state = open_governance(data_dir)?;
    let status = run_admin(
        config,
        &mut state,
        Arc::new(SystemTimeSource),
        Arc::new(TracingEventSink),
        command,
    )?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

#[cfg(not(feature = "rocksdb"))]
fn run_persistent(_config: &OracleConfig, data_dir: &Path, _requests: &[MintRequest]) -> Result<()> {
    bail!(
        "data_dir {} is set but this binary was built without the `rocksdb` feature",
        data_dir.display()
    )
}

#[cfg(not(feature = "rocksdb"))]
fn admin_persistent(
    _config: &OracleConfig,
    data_dir: &Path,
    _command: Option<AdminCommand>,
) -> Result<()> {
    bail!(
        "data_dir {} is set but this binary was built without the `rocksdb` feature",
        data_dir.display()
    )
}

fn process(config_path: &Path, requests_path: &Path) -> Result<()> {
    let config = OracleConfig::load(config_path)?;
    let requests = load_requests(requests_path)?;
    info!(requests = requests.len(), "Processing batch");

    match &config.data_dir {
        Some(dir) => run_persistent(&config, dir, &requests),
        None => run_batch(
            &config,
            &mut GovernanceStore::new(InMemoryKVStore::new()),
            InMemoryKVStore::new(),
            InMemoryKVStore::new(),
            &requests,
        ),
    }
}

fn admin(config_path: &Path, command: Option<AdminCommand>) -> Result<()> {
    let config = OracleConfig::load(config_path)?;
    let Some(dir) = &config.data_dir else {
        bail!("registry commands need data_dir; without it the registry is rebuilt on every run");
    };
    admin_persistent(&config, dir, command)
}

fn signer_id(id: &str) -> Result<shared_types::Address> {
    parse_address(id).context("signer id must be a 20-byte hex address")
}

fn sign(key: &str, actor: &str, amount: &str, proof: &str) -> Result<()> {
    let key = signing_key_from_hex(key)?;
    let Some(actor) = parse_address(actor) else {
        bail!("actor must be a 20-byte hex address");
    };
    let Some(proof) = parse_hash(proof) else {
        bail!("proof must be a 32-byte hex commitment");
    };
    let amount = parse_amount(amount)?;
    let signature = sign_claim(&key, &actor, &amount, &proof)?;
    println!("0x{}", hex::encode(signature));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Process { config, requests } => process(&config, &requests),
        Command::Status { config } => admin(&config, None),
        Command::AddSigner { config, id } => {
            admin(&config, Some(AdminCommand::AddSigner(signer_id(&id)?)))
        }
        Command::RemoveSigner { config, id } => {
            admin(&config, Some(AdminCommand::RemoveSigner(signer_id(&id)?)))
        }
        Command::ProposeThreshold { config, threshold } => {
            admin(&config, Some(AdminCommand::ProposeThreshold(threshold)))
        }
        Command::ExecuteThreshold { config } => {
            admin(&config, Some(AdminCommand::ExecuteThreshold))
        }
        Command::Sign {
            key,
            actor,
            amount,
            proof,
        } => sign(&key, &actor, &amount, &proof),
        Command::Address { key } => {
            let key = signing_key_from_hex(&key)?;
            println!("{}", address_to_hex(&signer_address(&key)));
            Ok(())
        }
    }
}
