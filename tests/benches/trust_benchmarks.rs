//! # Trust Subsystem Benchmarks
//!
//! | Component | Operation | Expectation |
//! |-----------|-----------|-------------|
//! | qc-validators | add/remove | O(1) regardless of set size |
//! | qc-validators | canonicalize | O(n log n) |
//! | qc-throttling | acquire + release | Lock-bound, sub-microsecond |
//! | qc-warp | verify_canonical | One pairing check, independent of signer count |

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qc_tests::fixtures::{node, Subnet};
use qc_throttling::{MessageThrottler, MsgByteThrottlerConfig};
use qc_validators::{canonicalize, SharedValidatorSet, ValidatorSet};
use qc_warp::{verify_canonical, BitSetSignature, QuorumConfig, UnsignedMessage, WarpVerifier};

// ============================================================================
// qc-validators
// ============================================================================

fn bench_validator_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-validators");

    for size in [100u16, 1_000, 10_000] {
        let mut set = ValidatorSet::new();
        for i in 0..size {
            set.add(node(i), None, u64::from(i) + 1).unwrap();
        }
        group.bench_with_input(BenchmarkId::new("add_remove", size), &size, |b, _| {
            b.iter(|| {
                set.add(node(u16::MAX), None, 1).unwrap();
                black_box(set.remove(&node(u16::MAX)).unwrap());
            })
        });
    }

    for size in [10u16, 100, 500] {
        let weights: Vec<u64> = (1..=u64::from(size)).collect();
        let subnet = Subnet::with_weights(&weights);
        let snapshot = subnet.scope.validators.list();
        group.throughput(Throughput::Elements(u64::from(size)));
        group.bench_with_input(BenchmarkId::new("canonicalize", size), &snapshot, |b, s| {
            b.iter(|| black_box(canonicalize(s).unwrap()))
        });
    }

    group.finish();
}

// ============================================================================
// qc-throttling
// ============================================================================

fn bench_throttler(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-throttling");

    let validators = SharedValidatorSet::new();
    for i in 0..100u16 {
        validators.add(node(i), None, 10).unwrap();
    }
    let throttler =
        MessageThrottler::new(MsgByteThrottlerConfig::default(), validators.clone()).unwrap();

    group.bench_function("acquire_release_validator", |b| {
        b.iter(|| {
            let grant = throttler.acquire(node(7), black_box(4_096)).unwrap();
            throttler.release(node(7), grant.total()).unwrap();
        })
    });
    group.bench_function("acquire_release_at_large", |b| {
        b.iter(|| {
            let grant = throttler.acquire(node(5_000), black_box(4_096)).unwrap();
            throttler.release(node(5_000), grant.total()).unwrap();
        })
    });

    group.finish();
}

// ============================================================================
// qc-warp
// ============================================================================

fn bench_warp_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-warp");
    group.measurement_time(Duration::from_secs(10));

    for size in [4u16, 32, 128] {
        let weights = vec![100u64; usize::from(size)];
        let subnet = Subnet::with_weights(&weights);
        let canonical = subnet.canonical();
        let message = subnet.message(b"benchmark payload");
        let all: Vec<_> = (1..=size).map(node).collect();
        let signature = subnet.attest(&message, &all);

        group.bench_with_input(
            BenchmarkId::new("verify_canonical", size),
            &signature,
            |b, sig| {
                b.iter(|| {
                    verify_canonical(&message, sig, &canonical, 67, 100).unwrap();
                })
            },
        );
    }

    let subnet = Subnet::with_weights(&[100; 16]);
    let canonical = subnet.canonical();
    let all: Vec<_> = (1..=16).map(node).collect();
    let requests: Vec<(UnsignedMessage, BitSetSignature)> = (0..64u32)
        .map(|i| {
            let message = subnet.message(&i.to_be_bytes());
            let signature = subnet.attest(&message, &all);
            (message, signature)
        })
        .collect();
    let verifier = WarpVerifier::new(subnet.registry.clone(), QuorumConfig::default()).unwrap();

    group.throughput(Throughput::Elements(requests.len() as u64));
    group.bench_function("verify_batch_64", |b| {
        b.iter(|| black_box(verifier.verify_batch(&canonical, &requests)))
    });

    group.finish();
}

criterion_group!(benches, bench_validator_set, bench_throttler, bench_warp_verify);
criterion_main!(benches);
