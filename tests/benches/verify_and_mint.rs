//! # Quorum-Mint Benchmarks
//!
//! | Path | Work per call |
//! |------|---------------|
//! | signer recovery | one secp256k1 public key recovery |
//! | verify_and_mint | `threshold` recoveries plus two store commits |

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use qm_01_signature_recovery::{EcdsaRecoverer, SignatureRecoveryApi};
use qm_05_request_coordinator::{message_hash, RequestCoordinatorApi};
use qm_tests::fixtures::{amount, sign_claim, Harness, ACTOR_X, OWNER};
use shared_types::Hash;
use std::cell::Cell;
use std::time::Duration;

fn bench_signer_recovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("qm-01-signature-recovery");

    let harness = Harness::new(1, 1);
    let proof = [0x11; 32];
    let bytes = sign_claim(&harness.keys[0], ACTOR_X, amount(100), proof);
    let recoverer = EcdsaRecoverer::new();
    let signature = recoverer.decode(&bytes).unwrap();
    let digest = message_hash(&ACTOR_X, &amount(100), &proof);

    group.bench_function("decode", |b| {
        b.iter(|| black_box(recoverer.decode(black_box(&bytes)).is_ok()))
    });
    group.bench_function("recover_signer", |b| {
        b.iter(|| black_box(recoverer.recover_signer(&digest, &signature).is_ok()))
    });
    group.finish();
}

fn bench_verify_and_mint(c: &mut Criterion) {
    let mut group = c.benchmark_group("qm-05-verify-and-mint");
    group.measurement_time(Duration::from_secs(10));

    for threshold in [1usize, 3, 5, 7] {
        let mut harness = Harness::new(threshold, threshold);
        let keys = harness.keys.clone();
        let coordinator = &mut harness.coordinator;
        let counter = Cell::new(0u64);

        group.bench_with_input(
            BenchmarkId::new("threshold", threshold),
            &threshold,
            |b, _| {
                b.iter_batched(
                    || {
                        let n = counter.get() + 1;
                        counter.set(n);
                        let mut proof: Hash = [0u8; 32];
                        proof[24..].copy_from_slice(&n.to_be_bytes());
                        let signatures: Vec<Vec<u8>> = keys
                            .iter()
                            .map(|k| sign_claim(k, ACTOR_X, amount(1), proof))
                            .collect();
                        (proof, signatures)
                    },
                    |(proof, signatures)| {
                        black_box(
                            coordinator
                                .verify_and_mint(OWNER, ACTOR_X, amount(1), proof, &signatures)
                                .is_ok(),
                        )
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_signer_recovery, bench_verify_and_mint);
criterion_main!(benches);
